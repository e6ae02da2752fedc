//! Integration tests for island reconnection

use auto_evo::hex::Hex;
use auto_evo::mutation::{find_islands, repair_islands, MutationWorkMemory};
use auto_evo::registry::SimulationRegistry;
use auto_evo::species::{OrganelleLayout, PlacedOrganelle};
use proptest::prelude::*;

fn scattered(registry: &SimulationRegistry, cells: &[(i32, i32, bool)]) -> OrganelleLayout {
    let mut layout = OrganelleLayout::new();
    for &(q, r, big) in cells {
        let name = if big { "mitochondrion" } else { "cytoplasm" };
        let definition = registry.organelle(name).unwrap().clone();
        let _ = layout.try_add(PlacedOrganelle::new(definition, Hex::new(q, r), 0));
    }
    layout
}

#[test]
fn test_repair_is_idempotent() {
    let registry = SimulationRegistry::with_defaults();
    let mut layout = scattered(&registry, &[(0, 0, false), (6, -2, true), (-4, 5, false), (0, -7, false)]);
    let mut memory = MutationWorkMemory::new();

    assert!(find_islands(&layout, &mut memory));
    repair_islands(&mut layout, &mut memory, 1000).unwrap();
    let repaired = layout.clone();

    assert_eq!(repair_islands(&mut layout, &mut memory, 1000).unwrap(), 0);
    assert_eq!(layout, repaired);
}

#[test]
fn test_repair_keeps_organelle_count_and_footprints() {
    let registry = SimulationRegistry::with_defaults();
    let mut layout = scattered(&registry, &[(0, 0, true), (5, 0, false), (-5, 0, false), (0, 6, true)]);
    let before_hexes = layout.hex_count();
    let before_len = layout.len();
    let mut memory = MutationWorkMemory::new();

    repair_islands(&mut layout, &mut memory, 1000).unwrap();
    assert_eq!(layout.len(), before_len);
    assert_eq!(layout.hex_count(), before_hexes);
    assert!(layout.is_overlap_free());
}

proptest! {
    #[test]
    fn proptest_repair_terminates_connected(
        cells in prop::collection::vec((-8i32..=8, -8i32..=8, any::<bool>()), 1..10),
    ) {
        let registry = SimulationRegistry::with_defaults();
        let mut layout = scattered(&registry, &cells);
        let mut memory = MutationWorkMemory::new();
        let organelles = layout.len();

        prop_assert!(repair_islands(&mut layout, &mut memory, 1000).is_ok());
        prop_assert!(!find_islands(&layout, &mut memory));
        prop_assert!(layout.is_overlap_free());
        prop_assert_eq!(layout.len(), organelles);
    }
}

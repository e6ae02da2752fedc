//! Island detection and reconnection
//!
//! Organelles are connected when any of their hexes are neighbours. The
//! largest connected mass (by hex count, earliest organelle on ties) is the
//! main body and everything else is an island. Repair pulls all island
//! organelles toward the main body until they touch it.

use crate::core::error::{EvoError, Result};
use crate::hex::{Hex, DIRECTIONS};
use crate::mutation::memory::MutationWorkMemory;
use crate::species::OrganelleLayout;

/// Label connected organelles and collect the islands into `memory`.
///
/// Returns whether any island exists.
pub fn find_islands(layout: &OrganelleLayout, memory: &mut MutationWorkMemory) -> bool {
    memory.owners.clear();
    for (index, organelle) in layout.iter().enumerate() {
        for hex in organelle.hexes() {
            memory.owners.insert(hex, index);
        }
    }

    memory.component.clear();
    memory.component.resize(layout.len(), None);
    memory.frontier.clear();

    // (label, hex count) of the largest component so far
    let mut main: Option<(usize, usize)> = None;
    let mut next_label = 0;

    for start in 0..layout.len() {
        if memory.component[start].is_some() {
            continue;
        }
        let label = next_label;
        next_label += 1;
        memory.component[start] = Some(label);
        memory.frontier.push_back(start);

        let mut size = 0;
        while let Some(index) = memory.frontier.pop_front() {
            let Some(organelle) = layout.get(index) else {
                continue;
            };
            size += organelle.definition.hex_count();
            for hex in organelle.hexes() {
                for neighbour in hex.neighbours() {
                    if let Some(&other) = memory.owners.get(&neighbour) {
                        if memory.component[other].is_none() {
                            memory.component[other] = Some(label);
                            memory.frontier.push_back(other);
                        }
                    }
                }
            }
        }

        if main.map_or(true, |(_, best)| size > best) {
            main = Some((label, size));
        }
    }

    memory.main_hexes.clear();
    memory.island_hexes.clear();
    memory.island_organelles.clear();
    let Some((main_label, _)) = main else {
        return false;
    };

    for (index, organelle) in layout.iter().enumerate() {
        if memory.component[index] == Some(main_label) {
            memory.main_hexes.extend(organelle.hexes());
        } else {
            memory.island_organelles.push(index);
            memory.island_hexes.extend(organelle.hexes());
        }
    }
    !memory.island_organelles.is_empty()
}

/// Closest (main hex, island hex) pair and its distance.
///
/// Stops early at distance 2, the smallest possible gap for an island.
fn closest_pair(memory: &MutationWorkMemory) -> (Hex, Hex, i32) {
    let mut best = (Hex::ORIGIN, Hex::ORIGIN, i32::MAX);
    'search: for &main in &memory.main_hexes {
        for &island in &memory.island_hexes {
            let distance = main.distance(&island);
            if distance < best.2 {
                best = (main, island, distance);
                if distance <= 2 {
                    break 'search;
                }
            }
        }
    }
    best
}

/// Offset that brings the islands one step closer to the main body.
///
/// The gap vector is scaled by (d - 1) / d. When truncation makes that
/// useless or it would overlap the main body, fall back to a single step.
fn approach_offset(main: Hex, island: Hex, distance: i32, memory: &mut MutationWorkMemory) -> Hex {
    memory.occupied.clear();
    memory.occupied.extend(memory.main_hexes.iter().copied());

    if distance > 1 {
        let gap = main - island;
        let scaled = Hex::new(
            gap.q * (distance - 1) / distance,
            gap.r * (distance - 1) / distance,
        );
        let closer = (island + scaled).distance(&main) < distance;
        let overlaps = memory
            .island_hexes
            .iter()
            .any(|h| memory.occupied.contains(&(*h + scaled)));
        if scaled != Hex::ORIGIN && closer && !overlaps {
            return scaled;
        }
    }

    // A single step cannot land on the main body while the gap is at least 2
    DIRECTIONS
        .iter()
        .copied()
        .find(|&step| (island + step).distance(&main) < distance)
        .unwrap_or(Hex::ORIGIN)
}

/// Move islands until the layout is one connected mass.
///
/// Returns the number of moves made; a connected layout is left untouched.
pub fn repair_islands(
    layout: &mut OrganelleLayout,
    memory: &mut MutationWorkMemory,
    max_iterations: usize,
) -> Result<usize> {
    let mut iterations = 0;
    while find_islands(layout, memory) {
        if iterations >= max_iterations {
            return Err(EvoError::IslandRepairDiverged(max_iterations));
        }

        let (main, island, distance) = closest_pair(memory);
        let offset = approach_offset(main, island, distance, memory);
        if offset == Hex::ORIGIN {
            return Err(EvoError::IslandRepairDiverged(iterations));
        }
        layout.translate(&memory.island_organelles, offset);
        iterations += 1;
    }

    if iterations > 0 {
        tracing::debug!(iterations, organelles = layout.len(), "islands reconnected");
    }
    Ok(iterations)
}

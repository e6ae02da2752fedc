//! Organelle layout - the hex-positioned organelles of one species

use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{EvoError, Result};
use crate::hex::Hex;
use crate::registry::OrganelleDefinition;

/// One organelle instance placed in a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrganelle {
    pub definition: Arc<OrganelleDefinition>,
    pub position: Hex,
    /// Rotation in 60° steps (0..5)
    pub orientation: u8,
}

impl PlacedOrganelle {
    pub fn new(definition: Arc<OrganelleDefinition>, position: Hex, orientation: u8) -> Self {
        Self {
            definition,
            position,
            orientation: orientation % 6,
        }
    }

    /// Absolute hexes covered by this organelle
    pub fn hexes(&self) -> impl Iterator<Item = Hex> + '_ {
        let position = self.position;
        self.definition
            .rotated_hexes(self.orientation)
            .iter()
            .map(move |h| *h + position)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganelleLayout {
    organelles: Vec<PlacedOrganelle>,
}

impl OrganelleLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedOrganelle> {
        self.organelles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PlacedOrganelle> {
        self.organelles.get(index)
    }

    pub fn len(&self) -> usize {
        self.organelles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organelles.is_empty()
    }

    /// Clear `into` and fill it with every occupied hex
    pub fn fill_occupied(&self, into: &mut AHashSet<Hex>) {
        into.clear();
        for organelle in &self.organelles {
            into.extend(organelle.hexes());
        }
    }

    /// Index of the organelle covering `hex`, if any
    pub fn organelle_at(&self, hex: Hex) -> Option<usize> {
        self.organelles
            .iter()
            .position(|o| o.hexes().any(|h| h == hex))
    }

    /// Whether the footprint fits without touching any hex in `occupied`
    pub fn fits(
        definition: &OrganelleDefinition,
        position: Hex,
        orientation: u8,
        occupied: &AHashSet<Hex>,
    ) -> bool {
        definition
            .rotated_hexes(orientation)
            .iter()
            .all(|h| !occupied.contains(&(*h + position)))
    }

    /// Add an organelle, rejecting any overlap with existing organelles
    pub fn try_add(&mut self, organelle: PlacedOrganelle) -> Result<()> {
        for hex in organelle.hexes() {
            if self.organelle_at(hex).is_some() {
                return Err(EvoError::OrganelleOverlap {
                    organelle: organelle.definition.name.clone(),
                    hex,
                });
            }
        }
        self.organelles.push(organelle);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<PlacedOrganelle> {
        (index < self.organelles.len()).then(|| self.organelles.remove(index))
    }

    /// Move the organelles at `indices` by `offset`
    pub fn translate(&mut self, indices: &[usize], offset: Hex) {
        for &index in indices {
            if let Some(organelle) = self.organelles.get_mut(index) {
                organelle.position += offset;
            }
        }
    }

    pub fn hex_count(&self) -> usize {
        self.organelles.iter().map(|o| o.definition.hex_count()).sum()
    }

    pub fn total_mass(&self) -> f32 {
        self.organelles.iter().map(|o| o.definition.mass).sum()
    }

    pub fn count_where(&self, predicate: impl Fn(&OrganelleDefinition) -> bool) -> usize {
        self.organelles
            .iter()
            .filter(|o| predicate(&o.definition))
            .count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.organelles.iter().any(|o| o.definition.name == name)
    }

    /// True when no hex is covered twice
    pub fn is_overlap_free(&self) -> bool {
        let mut seen = AHashSet::new();
        self.organelles
            .iter()
            .flat_map(|o| o.hexes())
            .all(|h| seen.insert(h))
    }
}

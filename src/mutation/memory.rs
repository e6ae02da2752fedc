//! Reusable scratch buffers for placement and island searches
//!
//! A `MutationWorkMemory` belongs to exactly one running mutation search.
//! Parallel candidate generation gives every task its own instance.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::hex::Hex;

#[derive(Debug, Default)]
pub struct MutationWorkMemory {
    /// Every hex covered by the layout under search
    pub occupied: AHashSet<Hex>,
    /// Hex -> index of the organelle covering it
    pub owners: AHashMap<Hex, usize>,
    /// Hexes of the dominant connected mass
    pub main_hexes: Vec<Hex>,
    /// Hexes of organelles cut off from the dominant mass
    pub island_hexes: Vec<Hex>,
    /// Organelle indices that belong to an island
    pub island_organelles: Vec<usize>,
    /// Organelle visiting order for the realistic placement walk
    pub organelle_order: Vec<usize>,
    /// Hexes of the spiral ring being searched
    pub ring: Vec<Hex>,
    /// Connected-component label per organelle
    pub component: Vec<Option<usize>>,
    pub frontier: VecDeque<usize>,
}

impl MutationWorkMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every buffer, keeping allocations
    pub fn clear(&mut self) {
        self.occupied.clear();
        self.owners.clear();
        self.main_hexes.clear();
        self.island_hexes.clear();
        self.island_organelles.clear();
        self.organelle_order.clear();
        self.ring.clear();
        self.component.clear();
        self.frontier.clear();
    }
}

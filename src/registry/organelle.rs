//! Organelle definitions - the immutable building blocks species are made of
//!
//! A definition describes one organelle type: its hex footprint (and the six
//! rotated variants of it), its mass, its chemical processes and a few flags
//! the scorers and mutation strategies care about. Species only hold shared
//! handles to definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hex::Hex;

/// A chemical process: consumes inputs and produces outputs at fixed ratios per second
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    pub inputs: BTreeMap<String, f32>,
    pub outputs: BTreeMap<String, f32>,
}

impl Process {
    pub fn input(&self, compound: &str) -> Option<f32> {
        self.inputs.get(compound).copied()
    }

    pub fn output(&self, compound: &str) -> Option<f32> {
        self.outputs.get(compound).copied()
    }
}

/// Behavioural flags of an organelle type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganelleFlags {
    /// At most one per species
    pub unique: bool,
    /// Can only be added to species that already have a nucleus
    pub requires_nucleus: bool,
    /// Melee weapon used for predation
    pub pilus: bool,
    /// Toxin producer used for predation
    pub toxin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganelleDefinition {
    pub name: String,
    pub mass: f32,
    /// Mutation points to add one
    pub mp_cost: f32,
    /// Propulsion contributed; > 0 means the organelle has a movement component
    pub movement_force: f32,
    pub processes: Vec<Process>,
    pub flags: OrganelleFlags,
    /// Footprint for each of the six orientations; index 0 is the base shape
    rotated_hexes: [Vec<Hex>; 6],
}

impl OrganelleDefinition {
    pub fn new(
        name: impl Into<String>,
        hexes: Vec<Hex>,
        mass: f32,
        mp_cost: f32,
        movement_force: f32,
        processes: Vec<Process>,
        flags: OrganelleFlags,
    ) -> Self {
        let rotated_hexes = std::array::from_fn(|rotation| {
            hexes.iter().map(|h| h.rotate(rotation as u8)).collect()
        });
        Self {
            name: name.into(),
            mass,
            mp_cost,
            movement_force,
            processes,
            flags,
            rotated_hexes,
        }
    }

    /// Footprint relative to the organelle position for `orientation` (0..5)
    pub fn rotated_hexes(&self, orientation: u8) -> &[Hex] {
        &self.rotated_hexes[(orientation % 6) as usize]
    }

    pub fn hex_count(&self) -> usize {
        self.rotated_hexes[0].len()
    }

    pub fn has_movement(&self) -> bool {
        self.movement_force > 0.0
    }
}

use serde::{Deserialize, Serialize};

/// Membrane type a species can evolve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembraneDefinition {
    pub name: String,
    /// Multiplier on propulsion
    pub movement_factor: f32,
    /// Multiplier on per-hex osmoregulation cost
    pub osmoregulation_factor: f32,
    /// Whether cells with this membrane can engulf at all
    pub can_engulf: bool,
    /// Mutation points to switch to this membrane
    pub mp_cost: f32,
}

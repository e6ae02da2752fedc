//! Population redistribution between competing species

pub mod redistribution;
pub mod simulation;

pub use redistribution::{evaluate_patch, gather_energy, redistribute_populations, PopulationDelta};
pub use simulation::{PopulationSimulation, PopulationStep};

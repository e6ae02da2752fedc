//! Energy model shared by every food source

pub mod balance;
pub mod cache;
pub mod generation;

pub use balance::{compute_energy_balance, EnergyBalance};
pub use cache::SimulationCache;
pub use generation::energy_generation_score;

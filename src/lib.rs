//! Auto-Evo - species fitness, population redistribution and mutation
//! for an evolutionary simulation

pub mod core;
pub mod energy;
pub mod food;
pub mod hex;
pub mod mutation;
pub mod patch;
pub mod population;
pub mod registry;
pub mod species;

pub use crate::core::{EvoConfig, EvoError, RandomStream, Result};

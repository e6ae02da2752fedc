pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::EvoConfig;
pub use error::{EvoError, Result};
pub use rng::RandomStream;
pub use types::{Colour, PatchId, SpeciesId};

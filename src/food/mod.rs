//! Food sources - the niches species compete for inside one patch
//!
//! A closed set of variants. Each one is bound to a patch (and sometimes a
//! chunk type, compound or prey species), computes its total energy once at
//! construction and scores species on how well they exploit it. Scores are
//! only comparable between species scored against the same source.
//!
//! A patch missing the relevant chunk or compound yields a source with zero
//! energy; that is a normal outcome, not an error.

pub mod catalogue;
pub mod chunk;
pub mod compound;
pub mod heterotrophic;
pub mod random_encounter;

use std::fmt;

use crate::core::types::PatchId;
use crate::energy::SimulationCache;
use crate::species::Species;

pub use catalogue::food_sources_for_patch;
pub use chunk::{ChunkFoodSource, MarineSnowFoodSource};
pub use compound::{CompoundFoodSource, EnvironmentalFoodSource, PhotosyntheticFoodSource};
pub use heterotrophic::HeterotrophicFoodSource;
pub use random_encounter::RandomEncounterFoodSource;

pub enum FoodSource<'a> {
    Chunk(ChunkFoodSource<'a>),
    Compound(CompoundFoodSource<'a>),
    Environmental(EnvironmentalFoodSource<'a>),
    Heterotrophic(HeterotrophicFoodSource<'a>),
    Photosynthetic(PhotosyntheticFoodSource<'a>),
    MarineSnow(MarineSnowFoodSource<'a>),
    RandomEncounter(RandomEncounterFoodSource<'a>),
}

impl<'a> FoodSource<'a> {
    /// Total energy this niche holds; always >= 0
    pub fn total_energy(&self) -> f32 {
        match self {
            Self::Chunk(s) => s.total_energy(),
            Self::Compound(s) => s.total_energy(),
            Self::Environmental(s) => s.total_energy(),
            Self::Heterotrophic(s) => s.total_energy(),
            Self::Photosynthetic(s) => s.total_energy(),
            Self::MarineSnow(s) => s.total_energy(),
            Self::RandomEncounter(s) => s.total_energy(),
        }
    }

    /// Relative score of `species` against this source; finite and >= 0
    pub fn fitness_score(&self, species: &Species, cache: &SimulationCache) -> f32 {
        let score = match self {
            Self::Chunk(s) => s.fitness_score(species, cache),
            Self::Compound(s) => s.fitness_score(species, cache),
            Self::Environmental(s) => s.fitness_score(species, cache),
            Self::Heterotrophic(s) => s.fitness_score(species, cache),
            Self::Photosynthetic(s) => s.fitness_score(species, cache),
            Self::MarineSnow(s) => s.fitness_score(species, cache),
            Self::RandomEncounter(s) => s.fitness_score(species, cache),
        };
        non_negative(score)
    }

    pub fn description(&self) -> FoodSourceDescription {
        match self {
            Self::Chunk(s) => s.description(),
            Self::Compound(s) => s.description(),
            Self::Environmental(s) => s.description(),
            Self::Heterotrophic(s) => s.description(),
            Self::Photosynthetic(s) => s.description(),
            Self::MarineSnow(s) => s.description(),
            Self::RandomEncounter(s) => s.description(),
        }
    }

    pub fn patch_id(&self) -> PatchId {
        match self {
            Self::Chunk(s) => s.patch.id,
            Self::Compound(s) => s.patch.id,
            Self::Environmental(s) => s.patch.id,
            Self::Heterotrophic(s) => s.patch.id,
            Self::Photosynthetic(s) => s.patch.id,
            Self::MarineSnow(s) => s.patch.id,
            Self::RandomEncounter(s) => s.patch.id,
        }
    }
}

/// Named description templates for reporting tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptionTemplate {
    ChunkFood,
    CompoundFood,
    EnvironmentalFood,
    PredationFood,
    Photosynthesis,
    MarineSnow,
    RandomEncounter,
}

impl DescriptionTemplate {
    pub fn key(&self) -> &'static str {
        match self {
            Self::ChunkFood => "CHUNK_FOOD_SOURCE",
            Self::CompoundFood => "COMPOUND_FOOD_SOURCE",
            Self::EnvironmentalFood => "ENVIRONMENTAL_FOOD_SOURCE",
            Self::PredationFood => "PREDATION_FOOD_SOURCE",
            Self::Photosynthesis => "PHOTOSYNTHESIS_FOOD_SOURCE",
            Self::MarineSnow => "MARINE_SNOW_FOOD_SOURCE",
            Self::RandomEncounter => "RANDOM_ENCOUNTER_FOOD_SOURCE",
        }
    }
}

/// Template plus source-specific parameters; renders through `Display`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodSourceDescription {
    pub template: DescriptionTemplate,
    pub params: Vec<String>,
}

impl FoodSourceDescription {
    pub fn new(template: DescriptionTemplate, params: Vec<String>) -> Self {
        Self { template, params }
    }

    fn param(&self, index: usize) -> &str {
        self.params.get(index).map(String::as_str).unwrap_or("?")
    }
}

impl fmt::Display for FoodSourceDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.template {
            DescriptionTemplate::ChunkFood => {
                write!(f, "{} chunks in {}", self.param(0), self.param(1))
            }
            DescriptionTemplate::CompoundFood => {
                write!(f, "Dissolved {} in {}", self.param(0), self.param(1))
            }
            DescriptionTemplate::EnvironmentalFood => {
                write!(f, "Ambient {} in {}", self.param(0), self.param(1))
            }
            DescriptionTemplate::PredationFood => {
                write!(f, "Predation of {} in {}", self.param(0), self.param(1))
            }
            DescriptionTemplate::Photosynthesis => write!(f, "Sunlight in {}", self.param(0)),
            DescriptionTemplate::MarineSnow => write!(f, "Marine snow in {}", self.param(0)),
            DescriptionTemplate::RandomEncounter => {
                write!(f, "Random encounters in {}", self.param(0))
            }
        }
    }
}

/// `score / cost`, or 0 for a degenerate species with no stationary cost
pub(crate) fn per_energy_cost(score: f32, cost: f32) -> f32 {
    if cost > 0.0 {
        score / cost
    } else {
        0.0
    }
}

/// Clamp to a finite non-negative value
pub(crate) fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

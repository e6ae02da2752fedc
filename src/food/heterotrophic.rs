//! Predation on one prey species

use crate::core::config::EvoConfig;
use crate::energy::SimulationCache;
use crate::food::{non_negative, DescriptionTemplate, FoodSourceDescription};
use crate::patch::Patch;
use crate::species::Species;

pub struct HeterotrophicFoodSource<'a> {
    pub(crate) patch: &'a Patch,
    prey: &'a Species,
    total_energy: f32,
}

impl<'a> HeterotrophicFoodSource<'a> {
    pub fn new(patch: &'a Patch, prey: &'a Species, config: &EvoConfig) -> Self {
        let total_energy = non_negative(
            patch.population(prey.id) as f32
                * prey.organelle_count() as f32
                * config.predation_energy_multiplier,
        );
        Self {
            patch,
            prey,
            total_energy,
        }
    }

    pub fn prey(&self) -> &Species {
        self.prey
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    /// Aggression-weighted sum of pilus, engulf, size and toxin scores.
    ///
    /// Pilus and engulf only fully count when the predator outruns the prey.
    /// Toxins lose value against bigger prey unless the predator is
    /// opportunistic. A species never scores against itself.
    pub fn fitness_score(&self, predator: &Species, cache: &SimulationCache) -> f32 {
        if predator.id == self.prey.id {
            return 0.0;
        }
        let config = cache.config();

        let behaviour_factor =
            (predator.behaviour.aggression / config.max_behaviour_value).clamp(0.0, 1.0);
        if behaviour_factor <= 0.0 {
            return 0.0;
        }

        let predator_hexes = predator.hex_count().max(1) as f32;
        let prey_hexes = self.prey.hex_count().max(1) as f32;

        let mut pilus_score = predator.pilus_count() as f32 * config.pilus_predation_score;
        let mut engulf_score = if predator.engulf_size() >= prey_hexes * config.engulf_size_ratio {
            config.engulf_predation_score
        } else {
            0.0
        };

        if cache.speed(predator) <= cache.speed(self.prey) {
            pilus_score *= config.lucky_catch_factor;
            engulf_score *= config.lucky_catch_factor;
        }

        let size_score = predator_hexes / prey_hexes * config.hex_size_predation_weight;

        let mut toxin_score = predator.toxin_count() as f32 * config.toxin_predation_score;
        if prey_hexes > predator_hexes && predator.behaviour.opportunism < config.opportunism_threshold {
            toxin_score *= predator_hexes / prey_hexes;
        }

        behaviour_factor * (pilus_score + engulf_score + size_score + toxin_score)
    }

    pub fn description(&self) -> FoodSourceDescription {
        FoodSourceDescription::new(
            DescriptionTemplate::PredationFood,
            vec![self.prey.formatted_name(), self.patch.name.clone()],
        )
    }
}

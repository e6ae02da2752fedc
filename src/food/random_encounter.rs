//! Random encounters between cells
//!
//! Every species currently gets the same placeholder fitness
//! (`EvoConfig::random_encounter_placeholder_fitness`), so the pool is split
//! evenly. This stands in for an encounter-probability model that does not
//! exist yet; do not read meaning into the constant.

use crate::energy::SimulationCache;
use crate::food::{non_negative, DescriptionTemplate, FoodSourceDescription};
use crate::patch::Patch;
use crate::species::Species;

pub struct RandomEncounterFoodSource<'a> {
    pub(crate) patch: &'a Patch,
    total_energy: f32,
}

impl<'a> RandomEncounterFoodSource<'a> {
    pub fn new(patch: &'a Patch) -> Self {
        Self {
            patch,
            total_energy: non_negative(patch.biome.encounter_energy),
        }
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    pub fn fitness_score(&self, _species: &Species, cache: &SimulationCache) -> f32 {
        cache.config().random_encounter_placeholder_fitness
    }

    pub fn description(&self) -> FoodSourceDescription {
        FoodSourceDescription::new(DescriptionTemplate::RandomEncounter, vec![self.patch.name.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EvoConfig;
    use crate::core::types::{PatchId, SpeciesId};
    use crate::hex::Hex;
    use crate::patch::Biome;
    use crate::registry::SimulationRegistry;
    use crate::species::Behaviour;

    #[test]
    fn test_every_species_gets_placeholder_fitness() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig {
            random_encounter_placeholder_fitness: 2.5,
            ..EvoConfig::default()
        };
        let cache = SimulationCache::new(&registry, &config);
        let patch = Patch::new(
            PatchId(0),
            "Reef",
            Biome {
                encounter_energy: 80.0,
                ..Biome::default()
            },
        );
        let source = RandomEncounterFoodSource::new(&patch);

        let tiny = Species::new_prokaryote(SpeciesId(1), "A", "a", &registry, "single", "cytoplasm").unwrap();
        let hunter = Species::new_prokaryote(SpeciesId(2), "B", "b", &registry, "single", "pilus")
            .unwrap()
            .with_organelle(&registry, "flagellum", Hex::new(0, 1), 0)
            .unwrap()
            .with_organelle(&registry, "rusticyanin", Hex::new(1, 0), 0)
            .unwrap()
            .with_behaviour(Behaviour {
                aggression: config.max_behaviour_value,
                ..Behaviour::default()
            });

        assert_eq!(source.total_energy(), 80.0);
        assert_eq!(source.fitness_score(&tiny, &cache), 2.5);
        assert_eq!(source.fitness_score(&hunter, &cache), 2.5);
    }

    #[test]
    fn test_negative_pool_is_clamped() {
        let patch = Patch::new(
            PatchId(0),
            "Drained",
            Biome {
                encounter_energy: -30.0,
                ..Biome::default()
            },
        );
        assert_eq!(RandomEncounterFoodSource::new(&patch).total_energy(), 0.0);
    }
}

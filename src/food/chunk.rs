//! Chunk-based food sources

use crate::core::config::EvoConfig;
use crate::energy::SimulationCache;
use crate::food::{non_negative, per_energy_cost, DescriptionTemplate, FoodSourceDescription};
use crate::patch::{ChunkConfiguration, Patch};
use crate::species::Species;

/// Energy held by one chunk type: each compound amount is nerfed by the
/// volume exponent, then scaled by density and the chunk energy constant.
pub fn chunk_energy(chunk: &ChunkConfiguration, config: &EvoConfig) -> f32 {
    let energy: f32 = chunk
        .compounds
        .values()
        .filter(|&&amount| amount > 0.0)
        .map(|amount| {
            amount.powf(config.chunk_volume_nerf_exponent)
                * chunk.density.max(0.0)
                * config.chunk_energy_amount
        })
        .sum();
    non_negative(energy)
}

/// One chunk type in one patch
pub struct ChunkFoodSource<'a> {
    pub(crate) patch: &'a Patch,
    chunk_name: String,
    chunk: Option<&'a ChunkConfiguration>,
    total_energy: f32,
}

impl<'a> ChunkFoodSource<'a> {
    /// Missing chunk types give a source with zero energy
    pub fn new(patch: &'a Patch, chunk_name: &str, config: &EvoConfig) -> Self {
        let chunk = patch.biome.chunks.get(chunk_name);
        if chunk.is_none() {
            tracing::trace!(patch = %patch.name, chunk = chunk_name, "chunk type absent, zero energy");
        }
        Self {
            patch,
            chunk_name: chunk_name.to_string(),
            chunk,
            total_energy: chunk.map(|c| chunk_energy(c, config)).unwrap_or(0.0),
        }
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    pub fn fitness_score(&self, species: &Species, cache: &SimulationCache) -> f32 {
        let Some(chunk) = self.chunk else {
            return 0.0;
        };
        let config = cache.config();

        let efficiency: f32 = chunk
            .compounds
            .iter()
            .filter(|&(_, &amount)| amount > 0.0)
            .map(|(compound, _)| cache.generation_score(species, compound))
            .sum();
        if efficiency <= 0.0 {
            return 0.0;
        }

        let speed_floor = config.reference_base_speed * config.speed_floor_fraction;
        let speed = cache.speed(species).max(speed_floor);
        let mut score = efficiency * speed;

        if species.engulf_size() < chunk.size * config.chunk_engulf_size_ratio {
            score *= config.chunk_engulf_penalty;
        }

        let cost = cache
            .energy_balance(species, self.patch)
            .total_consumption_stationary;
        per_energy_cost(score, cost)
    }

    pub fn description(&self) -> FoodSourceDescription {
        FoodSourceDescription::new(
            DescriptionTemplate::ChunkFood,
            vec![self.chunk_name.clone(), self.patch.name.clone()],
        )
    }
}

/// Every marine-snow chunk type of a patch, scored as one niche
pub struct MarineSnowFoodSource<'a> {
    pub(crate) patch: &'a Patch,
    chunks: Vec<ChunkFoodSource<'a>>,
    total_energy: f32,
}

impl<'a> MarineSnowFoodSource<'a> {
    pub fn new(patch: &'a Patch, config: &EvoConfig) -> Self {
        let chunks: Vec<ChunkFoodSource<'a>> = patch
            .biome
            .chunks
            .values()
            .filter(|c| c.marine_snow)
            .map(|c| ChunkFoodSource::new(patch, &c.name, config))
            .collect();
        let total_energy = chunks.iter().map(|c| c.total_energy()).sum();
        Self {
            patch,
            chunks,
            total_energy,
        }
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    /// Chunk fitness averaged over the snow chunk types, weighted by their energy
    pub fn fitness_score(&self, species: &Species, cache: &SimulationCache) -> f32 {
        if self.total_energy <= 0.0 {
            return 0.0;
        }
        self.chunks
            .iter()
            .map(|c| c.fitness_score(species, cache) * c.total_energy() / self.total_energy)
            .sum()
    }

    pub fn description(&self) -> FoodSourceDescription {
        FoodSourceDescription::new(DescriptionTemplate::MarineSnow, vec![self.patch.name.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PatchId, SpeciesId};
    use crate::hex::Hex;
    use crate::patch::Biome;
    use crate::registry::SimulationRegistry;
    use std::collections::BTreeMap;

    fn iron_chunk(size: f32) -> ChunkConfiguration {
        ChunkConfiguration {
            name: "iron_small".into(),
            size,
            density: 2.0,
            compounds: BTreeMap::from([("iron".to_string(), 50.0)]),
            marine_snow: false,
        }
    }

    #[test]
    fn test_chunk_energy_formula() {
        let config = EvoConfig::default();
        let chunk = iron_chunk(100.0);
        let expected = 50f32.powf(config.chunk_volume_nerf_exponent) * 2.0 * config.chunk_energy_amount;
        assert!((chunk_energy(&chunk, &config) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_missing_chunk_is_zero() {
        let config = EvoConfig::default();
        let registry = SimulationRegistry::with_defaults();
        let cache = SimulationCache::new(&registry, &config);
        let patch = Patch::new(PatchId(0), "Empty", Biome::default());
        let species = Species::new_prokaryote(SpeciesId(1), "A", "a", &registry, "single", "rusticyanin").unwrap();

        let source = ChunkFoodSource::new(&patch, "iron_small", &config);
        assert_eq!(source.total_energy(), 0.0);
        assert_eq!(source.fitness_score(&species, &cache), 0.0);
    }

    #[test]
    fn test_engulf_penalty_and_speed() {
        let config = EvoConfig::default();
        let registry = SimulationRegistry::with_defaults();
        let cache = SimulationCache::new(&registry, &config);
        let patch = Patch::new(PatchId(0), "Vent", Biome::default().with_chunk(iron_chunk(4.0)));
        let source = ChunkFoodSource::new(&patch, "iron_small", &config);

        let small = Species::new_prokaryote(SpeciesId(1), "A", "a", &registry, "single", "rusticyanin").unwrap();
        let big = small
            .clone()
            .with_organelle(&registry, "cytoplasm", Hex::new(0, 1), 0)
            .unwrap();
        let big = Species { id: SpeciesId(2), ..big };
        let non_user = Species::new_prokaryote(SpeciesId(3), "C", "c", &registry, "single", "cytoplasm").unwrap();

        // Size 4 chunk with ratio 0.5: engulf size 2 avoids the penalty, 1 does not
        let small_score = source.fitness_score(&small, &cache);
        let big_score = source.fitness_score(&big, &cache);
        assert!(small_score > 0.0);
        assert!(big_score > small_score);
        assert_eq!(source.fitness_score(&non_user, &cache), 0.0);
    }

    #[test]
    fn test_marine_snow_groups_snow_chunks() {
        let config = EvoConfig::default();
        let snow = ChunkConfiguration {
            name: "snow".into(),
            size: 1.0,
            density: 1.0,
            compounds: BTreeMap::from([("glucose".to_string(), 10.0)]),
            marine_snow: true,
        };
        let patch = Patch::new(
            PatchId(0),
            "Abyss",
            Biome::default().with_chunk(snow.clone()).with_chunk(iron_chunk(100.0)),
        );

        let source = MarineSnowFoodSource::new(&patch, &config);
        assert!((source.total_energy() - chunk_energy(&snow, &config)).abs() < 1e-3);
        assert_eq!(source.description().to_string(), "Marine snow in Abyss");
    }

    #[test]
    fn test_marine_snow_score_is_energy_weighted() {
        let config = EvoConfig::default();
        let registry = SimulationRegistry::with_defaults();
        let cache = SimulationCache::new(&registry, &config);
        let sugar_snow = ChunkConfiguration {
            name: "sugar_snow".into(),
            size: 1.0,
            density: 1.0,
            compounds: BTreeMap::from([("glucose".to_string(), 10.0)]),
            marine_snow: true,
        };
        let iron_snow = ChunkConfiguration {
            name: "iron_snow".into(),
            size: 1.0,
            density: 3.0,
            compounds: BTreeMap::from([("iron".to_string(), 40.0)]),
            marine_snow: true,
        };
        let patch = Patch::new(
            PatchId(0),
            "Abyss",
            Biome::default().with_chunk(sugar_snow).with_chunk(iron_snow),
        );
        let species = Species::new_prokaryote(SpeciesId(1), "A", "a", &registry, "single", "rusticyanin").unwrap();

        let sugar = ChunkFoodSource::new(&patch, "sugar_snow", &config);
        let iron = ChunkFoodSource::new(&patch, "iron_snow", &config);
        let total = sugar.total_energy() + iron.total_energy();
        let expected = (sugar.fitness_score(&species, &cache) * sugar.total_energy()
            + iron.fitness_score(&species, &cache) * iron.total_energy())
            / total;

        let source = MarineSnowFoodSource::new(&patch, &config);
        assert!((source.total_energy() - total).abs() < 1e-3);
        assert!(iron.fitness_score(&species, &cache) > 0.0);
        assert_ne!(
            sugar.fitness_score(&species, &cache),
            iron.fitness_score(&species, &cache)
        );
        assert!((source.fitness_score(&species, &cache) - expected).abs() < 1e-4);
    }
}

//! Compound-based food sources: dissolved clouds, ambient conditions and light

use crate::core::config::EvoConfig;
use crate::core::error::{EvoError, Result};
use crate::energy::SimulationCache;
use crate::food::{non_negative, per_energy_cost, DescriptionTemplate, FoodSourceDescription};
use crate::patch::Patch;
use crate::registry::SimulationRegistry;
use crate::species::Species;

/// Score shared by the compound sources: conversion efficiency of
/// `compound` over the species' stationary energy cost in the patch
fn efficiency_per_cost(species: &Species, compound: &str, patch: &Patch, cache: &SimulationCache) -> f32 {
    let efficiency = cache.generation_score(species, compound);
    if efficiency <= 0.0 {
        return 0.0;
    }
    let cost = cache
        .energy_balance(species, patch)
        .total_consumption_stationary;
    per_energy_cost(efficiency, cost)
}

/// A dissolved cloud compound
pub struct CompoundFoodSource<'a> {
    pub(crate) patch: &'a Patch,
    compound: String,
    total_energy: f32,
}

impl<'a> CompoundFoodSource<'a> {
    pub fn new(patch: &'a Patch, compound: &str) -> Self {
        let total_energy = patch
            .biome
            .compound(compound)
            .map(|c| non_negative(c.density * c.amount))
            .unwrap_or(0.0);
        Self {
            patch,
            compound: compound.to_string(),
            total_energy,
        }
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    pub fn fitness_score(&self, species: &Species, cache: &SimulationCache) -> f32 {
        efficiency_per_cost(species, &self.compound, self.patch, cache)
    }

    pub fn description(&self) -> FoodSourceDescription {
        FoodSourceDescription::new(
            DescriptionTemplate::CompoundFood,
            vec![self.compound.clone(), self.patch.name.clone()],
        )
    }
}

/// An ambient, non-cloud compound (temperature, oxygen...)
pub struct EnvironmentalFoodSource<'a> {
    pub(crate) patch: &'a Patch,
    compound: String,
    display_name: String,
    total_energy: f32,
}

impl<'a> EnvironmentalFoodSource<'a> {
    /// Fails for unknown compounds and for cloud compounds
    pub fn new(
        patch: &'a Patch,
        compound: &str,
        registry: &SimulationRegistry,
        config: &EvoConfig,
    ) -> Result<Self> {
        let definition = registry.compound(compound)?;
        if definition.is_cloud() {
            return Err(EvoError::CloudCompoundNotEnvironmental(compound.to_string()));
        }

        let total_energy = patch
            .biome
            .compound(compound)
            .map(|c| non_negative(c.amount * config.environmental_capacity_multiplier))
            .unwrap_or(0.0);

        Ok(Self {
            patch,
            compound: compound.to_string(),
            display_name: definition.display_name.clone(),
            total_energy,
        })
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    pub fn fitness_score(&self, species: &Species, cache: &SimulationCache) -> f32 {
        efficiency_per_cost(species, &self.compound, self.patch, cache)
    }

    pub fn description(&self) -> FoodSourceDescription {
        FoodSourceDescription::new(
            DescriptionTemplate::EnvironmentalFood,
            vec![self.display_name.clone(), self.patch.name.clone()],
        )
    }
}

/// Sunlight reaching the patch
pub struct PhotosyntheticFoodSource<'a> {
    pub(crate) patch: &'a Patch,
    sunlight: String,
    total_energy: f32,
}

impl<'a> PhotosyntheticFoodSource<'a> {
    pub fn new(patch: &'a Patch, registry: &SimulationRegistry, config: &EvoConfig) -> Self {
        let sunlight = registry.roles().sunlight.clone();
        let total_energy = patch
            .biome
            .compound(&sunlight)
            .map(|c| non_negative(c.amount * config.photosynthesis_capacity_multiplier))
            .unwrap_or(0.0);
        Self {
            patch,
            sunlight,
            total_energy,
        }
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    pub fn fitness_score(&self, species: &Species, cache: &SimulationCache) -> f32 {
        efficiency_per_cost(species, &self.sunlight, self.patch, cache)
    }

    pub fn description(&self) -> FoodSourceDescription {
        FoodSourceDescription::new(DescriptionTemplate::Photosynthesis, vec![self.patch.name.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PatchId, SpeciesId};
    use crate::hex::Hex;
    use crate::patch::Biome;

    fn patch() -> Patch {
        Patch::new(
            PatchId(0),
            "Surface",
            Biome::default()
                .with_compound("glucose", 200.0, 0.5)
                .with_compound("sunlight", 1.0, 0.0)
                .with_compound("temperature", 0.6, 0.0)
                .with_compound("carbondioxide", 0.1, 0.0),
        )
    }

    #[test]
    fn test_dissolved_energy_is_density_times_amount() {
        let patch = patch();
        assert!((CompoundFoodSource::new(&patch, "glucose").total_energy() - 100.0).abs() < 1e-4);
        assert_eq!(CompoundFoodSource::new(&patch, "hydrogensulfide").total_energy(), 0.0);
    }

    #[test]
    fn test_environmental_rejects_cloud_compound() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let patch = patch();

        let err = EnvironmentalFoodSource::new(&patch, "glucose", &registry, &config)
            .err()
            .expect("cloud compound must be rejected");
        assert!(matches!(err, EvoError::CloudCompoundNotEnvironmental(_)));

        let source = EnvironmentalFoodSource::new(&patch, "temperature", &registry, &config).unwrap();
        assert!((source.total_energy() - 0.6 * config.environmental_capacity_multiplier).abs() < 1e-4);
        assert_eq!(source.description().to_string(), "Ambient Temperature in Surface");
    }

    #[test]
    fn test_photosynthesis_prefers_photosynthesizers() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let cache = SimulationCache::new(&registry, &config);
        let patch = patch();
        let source = PhotosyntheticFoodSource::new(&patch, &registry, &config);

        let plain = Species::new_prokaryote(SpeciesId(1), "A", "a", &registry, "single", "cytoplasm").unwrap();
        let green = Species::new_prokaryote(SpeciesId(2), "B", "b", &registry, "single", "cytoplasm")
            .unwrap()
            .with_organelle(&registry, "chromatophore", Hex::new(0, -1), 0)
            .unwrap();

        assert!((source.total_energy() - config.photosynthesis_capacity_multiplier).abs() < 1e-4);
        assert_eq!(source.fitness_score(&plain, &cache), 0.0);
        assert!(source.fitness_score(&green, &cache) > 0.0);
    }
}

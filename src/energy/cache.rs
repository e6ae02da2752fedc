//! Per-pass simulation cache
//!
//! Memoizes energy balances per (species, patch), plus speeds and energy
//! generation scores per species. Every value is a pure function of its key,
//! so the cache never changes results, only avoids recomputation. It is
//! shared between scoring threads: a race may compute a value twice, but
//! the maps are behind locks so no entry is lost.
//!
//! Species ids must be unique within one pass. Create a fresh cache per pass.

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::core::config::EvoConfig;
use crate::core::types::{PatchId, SpeciesId};
use crate::energy::balance::{compute_energy_balance, EnergyBalance};
use crate::energy::generation::energy_generation_score;
use crate::patch::Patch;
use crate::registry::SimulationRegistry;
use crate::species::Species;

pub struct SimulationCache<'a> {
    registry: &'a SimulationRegistry,
    config: &'a EvoConfig,
    energy_balances: RwLock<AHashMap<(SpeciesId, PatchId), EnergyBalance>>,
    speeds: RwLock<AHashMap<SpeciesId, f32>>,
    generation_scores: RwLock<AHashMap<(SpeciesId, String), f32>>,
}

impl<'a> SimulationCache<'a> {
    pub fn new(registry: &'a SimulationRegistry, config: &'a EvoConfig) -> Self {
        Self {
            registry,
            config,
            energy_balances: RwLock::new(AHashMap::new()),
            speeds: RwLock::new(AHashMap::new()),
            generation_scores: RwLock::new(AHashMap::new()),
        }
    }

    pub fn registry(&self) -> &'a SimulationRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a EvoConfig {
        self.config
    }

    pub fn energy_balance(&self, species: &Species, patch: &Patch) -> EnergyBalance {
        let key = (species.id, patch.id);
        if let Some(balance) = self.energy_balances.read().get(&key) {
            return *balance;
        }

        let balance = compute_energy_balance(species, &patch.biome, self.registry, self.config);
        self.energy_balances.write().entry(key).or_insert(balance);
        balance
    }

    pub fn speed(&self, species: &Species) -> f32 {
        if let Some(speed) = self.speeds.read().get(&species.id) {
            return *speed;
        }

        let speed = species.speed(self.config);
        self.speeds.write().entry(species.id).or_insert(speed);
        speed
    }

    pub fn generation_score(&self, species: &Species, compound: &str) -> f32 {
        let key = (species.id, compound.to_string());
        if let Some(score) = self.generation_scores.read().get(&key) {
            return *score;
        }

        let score = energy_generation_score(species, compound, self.registry, self.config);
        self.generation_scores.write().entry(key).or_insert(score);
        score
    }

    /// Number of memoized energy balances
    pub fn cached_balances(&self) -> usize {
        self.energy_balances.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PatchId;
    use crate::hex::Hex;
    use crate::patch::Biome;
    use rayon::prelude::*;

    #[test]
    fn test_cache_matches_recomputation() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let cache = SimulationCache::new(&registry, &config);

        let species = Species::new_prokaryote(SpeciesId(3), "A", "a", &registry, "single", "metabolosomes")
            .unwrap()
            .with_organelle(&registry, "flagellum", Hex::new(0, 1), 0)
            .unwrap();
        let patch = Patch::new(
            PatchId(1),
            "Shallows",
            Biome::default().with_compound("oxygen", 0.2, 0.0),
        );

        let direct = compute_energy_balance(&species, &patch.biome, &registry, &config);
        assert_eq!(cache.energy_balance(&species, &patch), direct);
        assert_eq!(cache.energy_balance(&species, &patch), direct);
        assert_eq!(cache.cached_balances(), 1);

        assert_eq!(cache.speed(&species), species.speed(&config));
        assert_eq!(
            cache.generation_score(&species, "glucose"),
            energy_generation_score(&species, "glucose", &registry, &config)
        );
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let cache = SimulationCache::new(&registry, &config);

        let species: Vec<Species> = (0..16)
            .map(|i| {
                Species::new_prokaryote(SpeciesId(i), "A", "a", &registry, "single", "cytoplasm")
                    .unwrap()
            })
            .collect();
        let patch = Patch::new(PatchId(0), "P", Biome::default());

        let balances: Vec<EnergyBalance> = (0..256)
            .into_par_iter()
            .map(|i| cache.energy_balance(&species[i % 16], &patch))
            .collect();

        assert_eq!(cache.cached_balances(), 16);
        for (i, balance) in balances.iter().enumerate() {
            assert_eq!(
                *balance,
                compute_energy_balance(&species[i % 16], &patch.biome, &registry, &config)
            );
        }
    }
}

//! Competitive allocation of patch energy between resident species
//!
//! For every food source in a patch, the source's total energy is split
//! between residents in proportion to their fitness scores. A species'
//! target population is the energy it gathered divided by its stationary
//! cost per individual. Patches are evaluated in parallel against an
//! immutable map and only committed afterwards, so no update is lost.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::EvoConfig;
use crate::core::error::Result;
use crate::core::types::{PatchId, SpeciesId};
use crate::energy::SimulationCache;
use crate::food::food_sources_for_patch;
use crate::patch::{Patch, PatchMap};
use crate::registry::SimulationRegistry;
use crate::species::Species;

/// Population change of one species in one patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationDelta {
    pub species: SpeciesId,
    pub patch: PatchId,
    pub before: u64,
    pub after: u64,
}

impl PopulationDelta {
    pub fn delta(&self) -> i64 {
        self.after as i64 - self.before as i64
    }
}

/// Energy gathered by each resident of `patch`, in resident id order
pub fn gather_energy(
    patch: &Patch,
    species: &[Species],
    cache: &SimulationCache,
) -> Result<Vec<(SpeciesId, f32)>> {
    let residents: Vec<&Species> = patch
        .residents()
        .filter_map(|id| species.iter().find(|s| s.id == id))
        .collect();
    let mut energy = vec![0.0f32; residents.len()];

    let sources = food_sources_for_patch(patch, species, cache.registry(), cache.config())?;
    for source in &sources {
        let total_energy = source.total_energy();
        if total_energy <= 0.0 {
            continue;
        }

        // PARALLEL: species are read-only while scoring
        let scores: Vec<f32> = residents
            .par_iter()
            .map(|s| source.fitness_score(s, cache))
            .collect();
        let total_fitness: f32 = scores.iter().sum();
        if total_fitness <= 0.0 {
            continue;
        }

        for (gathered, score) in energy.iter_mut().zip(&scores) {
            *gathered += score / total_fitness * total_energy;
        }
    }

    Ok(residents.iter().map(|s| s.id).zip(energy).collect())
}

/// New population of every resident of `patch`
pub fn evaluate_patch(
    patch: &Patch,
    species: &[Species],
    cache: &SimulationCache,
) -> Result<BTreeMap<SpeciesId, u64>> {
    let config = cache.config();
    let gathered = gather_energy(patch, species, cache)?;

    let mut populations = BTreeMap::new();
    for (id, energy) in gathered {
        let Some(resident) = species.iter().find(|s| s.id == id) else {
            continue;
        };
        let cost = cache
            .energy_balance(resident, patch)
            .total_consumption_stationary;
        let target = if cost > 0.0 {
            energy / cost * config.population_energy_scale
        } else {
            0.0
        };

        let current = patch.population(id) as f32;
        let next = current + (target - current) * config.population_change_rate;
        let mut next = if next.is_finite() { next.max(0.0).round() as u64 } else { 0 };
        if next < config.min_viable_population {
            next = 0;
        }
        populations.insert(id, next);
    }

    Ok(populations)
}

/// One redistribution step over the whole map.
///
/// Evaluates every patch in parallel, then commits all new populations.
pub fn redistribute_populations(
    map: &mut PatchMap,
    species: &[Species],
    registry: &SimulationRegistry,
    config: &EvoConfig,
) -> Result<Vec<PopulationDelta>> {
    let cache = SimulationCache::new(registry, config);

    let outcomes: Vec<(PatchId, BTreeMap<SpeciesId, u64>)> = map
        .patches()
        .par_iter()
        .map(|patch| evaluate_patch(patch, species, &cache).map(|pops| (patch.id, pops)))
        .collect::<Result<Vec<_>>>()?;

    let mut deltas = Vec::new();
    for (patch_id, populations) in outcomes {
        let Some(patch) = map.get_mut(patch_id) else {
            continue;
        };
        for (species_id, after) in populations {
            let before = patch.population(species_id);
            patch.set_population(species_id, after);
            deltas.push(PopulationDelta {
                species: species_id,
                patch: patch_id,
                before,
                after,
            });
        }
    }

    tracing::debug!(
        patches = map.patches().len(),
        changes = deltas.iter().filter(|d| d.delta() != 0).count(),
        cached_balances = cache.cached_balances(),
        "population redistribution committed"
    );

    Ok(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::Hex;
    use crate::patch::Biome;

    fn world() -> (SimulationRegistry, EvoConfig, Vec<Species>, PatchMap) {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();

        let glucose_eater = Species::new_prokaryote(SpeciesId(1), "Dulcis", "a", &registry, "single", "cytoplasm")
            .unwrap()
            .with_organelle(&registry, "cytoplasm", Hex::new(0, 1), 0)
            .unwrap();
        let light_eater = Species::new_prokaryote(SpeciesId(2), "Lux", "b", &registry, "single", "chromatophore")
            .unwrap()
            .with_organelle(&registry, "cytoplasm", Hex::new(0, 1), 0)
            .unwrap();

        let mut patch = Patch::new(
            PatchId(0),
            "Surface",
            Biome::default()
                .with_compound("glucose", 1000.0, 0.5)
                .with_compound("sunlight", 1.0, 0.0)
                .with_compound("carbondioxide", 0.2, 0.0),
        );
        patch.set_population(SpeciesId(1), 100);
        patch.set_population(SpeciesId(2), 100);

        (registry, config, vec![glucose_eater, light_eater], PatchMap::new(vec![patch]))
    }

    #[test]
    fn test_energy_split_sums_to_available_energy() {
        let (registry, config, species, map) = world();
        let cache = SimulationCache::new(&registry, &config);
        let patch = &map.patches()[0];

        let gathered = gather_energy(patch, &species, &cache).unwrap();
        let gathered_total: f32 = gathered.iter().map(|(_, e)| e).sum();

        // Every niche with energy has at least one species scoring above zero
        let sources = food_sources_for_patch(patch, &species, &registry, &config).unwrap();
        let available: f32 = sources
            .iter()
            .filter(|s| species.iter().any(|sp| s.fitness_score(sp, &cache) > 0.0))
            .map(|s| s.total_energy())
            .sum();
        assert!((gathered_total - available).abs() / available < 1e-4);
    }

    #[test]
    fn test_redistribution_never_negative_and_reports_deltas() {
        let (registry, config, species, mut map) = world();

        let deltas = redistribute_populations(&mut map, &species, &registry, &config).unwrap();
        assert_eq!(deltas.len(), 2);
        for delta in &deltas {
            assert_eq!(map.patches()[0].population(delta.species), delta.after);
            assert!(delta.after == 0 || delta.after >= config.min_viable_population);
        }
    }

    #[test]
    fn test_species_without_food_dies_out() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let starving = Species::new_prokaryote(SpeciesId(9), "Inanis", "a", &registry, "cellulose", "rusticyanin").unwrap();
        let mut patch = Patch::new(PatchId(3), "Desert", Biome::default());
        patch.set_population(SpeciesId(9), 50);
        let mut map = PatchMap::new(vec![patch]);

        // The placeholder random-encounter pool is empty here
        let deltas = redistribute_populations(&mut map, &[starving], &registry, &config).unwrap();
        assert_eq!(deltas[0].after, 0);
        assert_eq!(deltas[0].delta(), -50);
        assert_eq!(map.patches()[0].residents().count(), 0);
    }
}

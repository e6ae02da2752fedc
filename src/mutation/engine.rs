//! Mutation engine - budgeted mutation passes over a parent species

use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::EvoConfig;
use crate::core::error::{EvoError, Result};
use crate::core::rng::RandomStream;
use crate::core::types::{Colour, SpeciesId};
use crate::mutation::islands::repair_islands;
use crate::mutation::memory::MutationWorkMemory;
use crate::mutation::placement::{DirectionBias, PlacementPolicy};
use crate::mutation::strategies::{CompositeStrategy, MutationContext, MutationKind, MutationStrategy};
use crate::registry::SimulationRegistry;
use crate::species::Species;

/// Result of one mutation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutatedSpecies {
    pub species: Species,
    /// Mutation points actually spent
    pub mp_spent: f32,
    /// Number of single-step mutations applied
    pub steps: usize,
    pub applied: Vec<MutationKind>,
}

pub struct MutationEngine<'a> {
    registry: &'a SimulationRegistry,
    config: &'a EvoConfig,
    strategy: Box<dyn MutationStrategy>,
}

impl<'a> MutationEngine<'a> {
    pub fn new(
        registry: &'a SimulationRegistry,
        config: &'a EvoConfig,
        strategy: Box<dyn MutationStrategy>,
    ) -> Self {
        Self {
            registry,
            config,
            strategy,
        }
    }

    /// Engine running the standard composite strategy
    pub fn with_placement(
        registry: &'a SimulationRegistry,
        config: &'a EvoConfig,
        policy: PlacementPolicy,
        bias: DirectionBias,
    ) -> Self {
        Self::new(registry, config, Box::new(CompositeStrategy::standard(policy, bias)))
    }

    /// Spend up to `budget` points mutating a clone of `parent`.
    ///
    /// Each step applies the cheapest affordable proposal. The pass ends
    /// when nothing affordable is proposed or the step cap is hit. Islands
    /// are reconnected, and colour drift plus a fresh name are applied once,
    /// only if at least one step was taken.
    pub fn mutate(
        &self,
        parent: &Species,
        budget: f32,
        rng: &mut dyn RandomStream,
        memory: &mut MutationWorkMemory,
    ) -> Result<MutatedSpecies> {
        memory.clear();
        let mut current = parent.clone();
        let mut remaining = budget;
        let mut applied = Vec::new();

        while applied.len() < self.config.max_mutation_steps {
            let mut ctx = MutationContext {
                registry: self.registry,
                config: self.config,
                rng: &mut *rng,
                memory: &mut *memory,
                budget: remaining,
            };
            let proposals = self.strategy.propose(&current, &mut ctx)?;

            let Some(chosen) = proposals
                .into_iter()
                .filter(|c| c.cost <= remaining)
                .min_by_key(|c| OrderedFloat(c.cost))
            else {
                break;
            };

            remaining -= chosen.cost;
            current = chosen.species;
            applied.push(chosen.kind);
        }

        if applied.is_empty() {
            tracing::trace!(species = %parent.formatted_name(), budget, "no affordable mutation");
            return Ok(MutatedSpecies {
                species: current,
                mp_spent: 0.0,
                steps: 0,
                applied,
            });
        }

        repair_islands(
            &mut current.layout,
            memory,
            self.config.island_repair_max_iterations,
        )?;
        current.colour = drift_colour(current.colour, self.config.colour_drift, rng);
        let (genus, epithet) = self.registry.names().generate(rng);
        current.genus = genus;
        current.epithet = epithet;

        let mp_spent = budget - remaining;
        tracing::debug!(
            parent = %parent.formatted_name(),
            child = %current.formatted_name(),
            steps = applied.len(),
            mp_spent,
            organelles = current.organelle_count(),
            "mutation pass finished"
        );

        Ok(MutatedSpecies {
            species: current,
            mp_spent,
            steps: applied.len(),
            applied,
        })
    }

    /// `count` independent mutation passes run in parallel.
    ///
    /// One sub-stream seed per candidate is drawn from `rng` up front, in
    /// order, so the output only depends on the incoming stream. Candidate
    /// `i` gets id `first_id + i` and its own work memory. Fails before
    /// touching `rng` when those ids would pass `u32::MAX`.
    pub fn generate_candidates(
        &self,
        parent: &Species,
        count: usize,
        budget: f32,
        first_id: SpeciesId,
        rng: &mut dyn RandomStream,
    ) -> Result<Vec<MutatedSpecies>> {
        let overflow = || EvoError::SpeciesIdOverflow {
            first: first_id.0,
            count,
        };
        if count > 0 && first_id.offset(count - 1).is_none() {
            return Err(overflow());
        }
        let seeds: Vec<u64> = (0..count).map(|_| rng.next_u64()).collect();

        // PARALLEL: each candidate owns its stream and scratch buffers
        seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| {
                let mut stream = ChaCha8Rng::seed_from_u64(seed);
                let mut memory = MutationWorkMemory::new();
                let mut mutated = self.mutate(parent, budget, &mut stream, &mut memory)?;
                mutated.species.id = first_id.offset(i).ok_or_else(overflow)?;
                Ok(mutated)
            })
            .collect()
    }
}

/// Shift the colour channels by at most `drift` each; alpha is kept
fn drift_colour(colour: Colour, drift: f32, rng: &mut dyn RandomStream) -> Colour {
    let r = colour.r + rng.next_f32_in_range(-drift, drift);
    let g = colour.g + rng.next_f32_in_range(-drift, drift);
    let b = colour.b + rng.next_f32_in_range(-drift, drift);
    Colour::new(r, g, b, colour.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::strategies::ChangeBehaviour;

    fn parent(registry: &SimulationRegistry) -> Species {
        Species::new_prokaryote(SpeciesId(1), "Proto", "primus", registry, "single", "cytoplasm").unwrap()
    }

    #[test]
    fn test_budget_below_cheapest_returns_parent() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let engine = MutationEngine::with_placement(&registry, &config, PlacementPolicy::Realistic, DirectionBias::Front);
        let parent = parent(&registry);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut memory = MutationWorkMemory::new();

        // Behaviour shifts cost 5, the cheapest mutation on offer
        let result = engine.mutate(&parent, 4.0, &mut rng, &mut memory).unwrap();
        assert_eq!(result.steps, 0);
        assert_eq!(result.mp_spent, 0.0);
        assert_eq!(result.species, parent);
    }

    #[test]
    fn test_spending_never_exceeds_budget() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let engine = MutationEngine::with_placement(&registry, &config, PlacementPolicy::Realistic, DirectionBias::Front);
        let parent = parent(&registry);
        let mut memory = MutationWorkMemory::new();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = engine.mutate(&parent, 120.0, &mut rng, &mut memory).unwrap();
            assert!(result.mp_spent <= 120.0);
            assert!(result.steps > 0);
            assert_eq!(result.applied.len(), result.steps);
            assert!(result.species.layout.is_overlap_free());
            assert!(result.species.organelle_count() >= 1);
        }
    }

    #[test]
    fn test_step_cap_bounds_cheap_strategies() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig {
            max_mutation_steps: 3,
            ..EvoConfig::default()
        };
        let engine = MutationEngine::new(&registry, &config, Box::new(ChangeBehaviour));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut memory = MutationWorkMemory::new();

        let result = engine.mutate(&parent(&registry), 1000.0, &mut rng, &mut memory).unwrap();
        assert_eq!(result.steps, 3);
        assert!((result.mp_spent - 3.0 * config.behaviour_change_cost).abs() < 1e-4);
    }

    #[test]
    fn test_mutation_renames_and_keeps_colour_in_range() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig {
            colour_drift: 0.5,
            ..EvoConfig::default()
        };
        let engine = MutationEngine::new(&registry, &config, Box::new(ChangeBehaviour));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut memory = MutationWorkMemory::new();

        let result = engine.mutate(&parent(&registry), 10.0, &mut rng, &mut memory).unwrap();
        assert!(result.steps > 0);
        assert!(result
            .species
            .colour
            .channels()
            .iter()
            .all(|c| (0.0..=1.0).contains(c)));
        assert!(!result.species.genus.is_empty());
    }

    #[test]
    fn test_candidates_get_consecutive_ids() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let engine = MutationEngine::with_placement(&registry, &config, PlacementPolicy::Spiral, DirectionBias::Rear);
        let mut rng = ChaCha8Rng::seed_from_u64(77);

        let candidates = engine
            .generate_candidates(&parent(&registry), 4, 100.0, SpeciesId(10), &mut rng)
            .unwrap();
        let ids: Vec<u32> = candidates.iter().map(|c| c.species.id.0).collect();
        assert_eq!(ids, vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_candidate_ids_past_u32_max_fail() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let engine = MutationEngine::with_placement(&registry, &config, PlacementPolicy::Spiral, DirectionBias::Front);
        let parent = parent(&registry);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut untouched = rng.clone();

        let err = engine
            .generate_candidates(&parent, 4, 100.0, SpeciesId(u32::MAX - 2), &mut rng)
            .unwrap_err();
        assert!(matches!(err, EvoError::SpeciesIdOverflow { count: 4, .. }));
        assert_eq!(
            RandomStream::next_u64(&mut rng),
            RandomStream::next_u64(&mut untouched)
        );

        let candidates = engine
            .generate_candidates(&parent, 4, 100.0, SpeciesId(u32::MAX - 3), &mut rng)
            .unwrap();
        assert_eq!(candidates.last().map(|c| c.species.id), Some(SpeciesId(u32::MAX)));
    }
}

//! Single-step mutation strategies
//!
//! A strategy looks at the current species and proposes candidate
//! mutations with their point cost. The engine decides which one to apply.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::config::EvoConfig;
use crate::core::error::Result;
use crate::core::rng::{shuffle, RandomStream};
use crate::hex::Hex;
use crate::mutation::memory::MutationWorkMemory;
use crate::mutation::placement::{place_organelle, DirectionBias, PlacementPolicy};
use crate::registry::{OrganelleDefinition, SimulationRegistry};
use crate::species::{BehaviourTrait, PlacedOrganelle, Species};

/// Everything a strategy may read or consume while proposing
pub struct MutationContext<'a> {
    pub registry: &'a SimulationRegistry,
    pub config: &'a EvoConfig,
    pub rng: &'a mut dyn RandomStream,
    pub memory: &'a mut MutationWorkMemory,
    /// Points still available in this pass
    pub budget: f32,
}

/// What a single mutation step changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationKind {
    AddOrganelle {
        organelle: String,
        position: Hex,
        orientation: u8,
    },
    RemoveOrganelle {
        organelle: String,
        position: Hex,
    },
    ChangeMembrane {
        membrane: String,
    },
    ChangeBehaviour {
        behaviour: BehaviourTrait,
        value: f32,
    },
}

#[derive(Debug, Clone)]
pub struct CandidateMutation {
    pub species: Species,
    pub cost: f32,
    pub kind: MutationKind,
}

pub trait MutationStrategy: Send + Sync {
    /// Candidate single-step mutations of `species`. Empty means nothing applies.
    fn propose(&self, species: &Species, ctx: &mut MutationContext<'_>) -> Result<Vec<CandidateMutation>>;

    fn name(&self) -> &'static str;
}

/// Add one randomly chosen affordable organelle
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOrganelle {
    pub policy: PlacementPolicy,
    pub bias: DirectionBias,
}

impl AddOrganelle {
    pub fn new(policy: PlacementPolicy, bias: DirectionBias) -> Self {
        Self { policy, bias }
    }

    /// Unique organelles once only, nucleus-dependent ones on eukaryotes only
    fn allowed(species: &Species, definition: &OrganelleDefinition, budget: f32) -> bool {
        if definition.mp_cost > budget {
            return false;
        }
        if definition.flags.unique && species.layout.contains(&definition.name) {
            return false;
        }
        !(definition.flags.requires_nucleus && species.is_bacteria)
    }
}

impl MutationStrategy for AddOrganelle {
    fn propose(&self, species: &Species, ctx: &mut MutationContext<'_>) -> Result<Vec<CandidateMutation>> {
        let registry = ctx.registry;
        let eligible: Vec<&Arc<OrganelleDefinition>> = registry
            .organelles()
            .filter(|d| Self::allowed(species, d, ctx.budget))
            .collect();
        if eligible.is_empty() {
            return Ok(Vec::new());
        }
        let definition = eligible[ctx.rng.next_index(eligible.len())];

        let Some(placement) = place_organelle(
            self.policy,
            &species.layout,
            definition,
            self.bias,
            ctx.config,
            &mut *ctx.rng,
            &mut *ctx.memory,
        ) else {
            return Ok(Vec::new());
        };

        let mut mutated = species.clone();
        mutated.layout.try_add(PlacedOrganelle::new(
            Arc::clone(definition),
            placement.position,
            placement.orientation,
        ))?;
        if definition.name == registry.nucleus_name() {
            mutated.is_bacteria = false;
        }

        Ok(vec![CandidateMutation {
            species: mutated,
            cost: definition.mp_cost,
            kind: MutationKind::AddOrganelle {
                organelle: definition.name.clone(),
                position: placement.position,
                orientation: placement.orientation,
            },
        }])
    }

    fn name(&self) -> &'static str {
        "add_organelle"
    }
}

/// Remove one random organelle other than the nucleus, never the last one
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOrganelle;

impl MutationStrategy for RemoveOrganelle {
    fn propose(&self, species: &Species, ctx: &mut MutationContext<'_>) -> Result<Vec<CandidateMutation>> {
        if species.layout.len() <= 1 {
            return Ok(Vec::new());
        }
        let nucleus = ctx.registry.nucleus_name();
        let removable: Vec<usize> = species
            .layout
            .iter()
            .enumerate()
            .filter(|(_, o)| o.definition.name != nucleus)
            .map(|(index, _)| index)
            .collect();
        if removable.is_empty() {
            return Ok(Vec::new());
        }

        let index = removable[ctx.rng.next_index(removable.len())];
        let mut mutated = species.clone();
        let Some(removed) = mutated.layout.remove(index) else {
            return Ok(Vec::new());
        };

        Ok(vec![CandidateMutation {
            species: mutated,
            cost: ctx.config.remove_organelle_cost,
            kind: MutationKind::RemoveOrganelle {
                organelle: removed.definition.name.clone(),
                position: removed.position,
            },
        }])
    }

    fn name(&self) -> &'static str {
        "remove_organelle"
    }
}

/// Switch to a random other membrane; costs the target membrane's points
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeMembrane;

impl MutationStrategy for ChangeMembrane {
    fn propose(&self, species: &Species, ctx: &mut MutationContext<'_>) -> Result<Vec<CandidateMutation>> {
        let options: Vec<_> = ctx
            .registry
            .membranes()
            .filter(|m| m.name != species.membrane.name)
            .collect();
        if options.is_empty() {
            return Ok(Vec::new());
        }

        let membrane = options[ctx.rng.next_index(options.len())];
        let mut mutated = species.clone();
        mutated.membrane = Arc::clone(membrane);

        Ok(vec![CandidateMutation {
            species: mutated,
            cost: membrane.mp_cost,
            kind: MutationKind::ChangeMembrane {
                membrane: membrane.name.clone(),
            },
        }])
    }

    fn name(&self) -> &'static str {
        "change_membrane"
    }
}

/// Nudge one behaviour scalar, staying within [0, max_behaviour_value]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeBehaviour;

impl MutationStrategy for ChangeBehaviour {
    fn propose(&self, species: &Species, ctx: &mut MutationContext<'_>) -> Result<Vec<CandidateMutation>> {
        let config = ctx.config;
        let which = BehaviourTrait::ALL[ctx.rng.next_index(BehaviourTrait::ALL.len())];
        let shift = ctx
            .rng
            .next_f32_in_range(-config.behaviour_max_shift, config.behaviour_max_shift);

        let mut mutated = species.clone();
        let value = mutated.behaviour.value_mut(which);
        *value = (*value + shift).clamp(0.0, config.max_behaviour_value);
        let value = *value;

        Ok(vec![CandidateMutation {
            species: mutated,
            cost: config.behaviour_change_cost,
            kind: MutationKind::ChangeBehaviour {
                behaviour: which,
                value,
            },
        }])
    }

    fn name(&self) -> &'static str {
        "change_behaviour"
    }
}

/// Tries its strategies in a fresh random order each step and uses the
/// first one with an affordable proposal
pub struct CompositeStrategy {
    strategies: Vec<Box<dyn MutationStrategy>>,
}

impl CompositeStrategy {
    pub fn new(strategies: Vec<Box<dyn MutationStrategy>>) -> Self {
        Self { strategies }
    }

    /// Add, remove, membrane and behaviour mutations
    pub fn standard(policy: PlacementPolicy, bias: DirectionBias) -> Self {
        Self::new(vec![
            Box::new(AddOrganelle::new(policy, bias)),
            Box::new(RemoveOrganelle),
            Box::new(ChangeMembrane),
            Box::new(ChangeBehaviour),
        ])
    }
}

impl MutationStrategy for CompositeStrategy {
    fn propose(&self, species: &Species, ctx: &mut MutationContext<'_>) -> Result<Vec<CandidateMutation>> {
        let mut order: Vec<usize> = (0..self.strategies.len()).collect();
        shuffle(&mut order, &mut *ctx.rng);

        for index in order {
            let strategy = &self.strategies[index];
            let candidates = strategy.propose(species, ctx)?;
            if candidates.iter().any(|c| c.cost <= ctx.budget) {
                tracing::trace!(strategy = strategy.name(), "strategy selected");
                return Ok(candidates);
            }
        }
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

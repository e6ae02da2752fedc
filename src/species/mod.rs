//! Species - identity, body plan and behaviour of one evolving lineage
//!
//! Species are never changed in place while being scored. The mutation
//! engine works on clones.

pub mod layout;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::config::EvoConfig;
use crate::core::error::Result;
use crate::core::types::{Colour, SpeciesId};
use crate::hex::Hex;
use crate::registry::{MembraneDefinition, SimulationRegistry};

pub use layout::{OrganelleLayout, PlacedOrganelle};

/// Behavioural scalars, each in [0, config.max_behaviour_value]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Behaviour {
    pub activity: f32,
    pub aggression: f32,
    pub opportunism: f32,
}

/// Selector for one behavioural scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviourTrait {
    Activity,
    Aggression,
    Opportunism,
}

impl BehaviourTrait {
    pub const ALL: [BehaviourTrait; 3] = [Self::Activity, Self::Aggression, Self::Opportunism];
}

impl Behaviour {
    pub fn value(&self, which: BehaviourTrait) -> f32 {
        match which {
            BehaviourTrait::Activity => self.activity,
            BehaviourTrait::Aggression => self.aggression,
            BehaviourTrait::Opportunism => self.opportunism,
        }
    }

    pub fn value_mut(&mut self, which: BehaviourTrait) -> &mut f32 {
        match which {
            BehaviourTrait::Activity => &mut self.activity,
            BehaviourTrait::Aggression => &mut self.aggression,
            BehaviourTrait::Opportunism => &mut self.opportunism,
        }
    }
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            activity: 100.0,
            aggression: 100.0,
            opportunism: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub genus: String,
    pub epithet: String,
    pub colour: Colour,
    pub membrane: Arc<MembraneDefinition>,
    /// Prokaryote until a nucleus is added
    pub is_bacteria: bool,
    pub behaviour: Behaviour,
    pub layout: OrganelleLayout,
}

impl Species {
    /// A fresh prokaryote with a single organelle at the origin
    pub fn new_prokaryote(
        id: SpeciesId,
        genus: impl Into<String>,
        epithet: impl Into<String>,
        registry: &SimulationRegistry,
        membrane: &str,
        root_organelle: &str,
    ) -> Result<Self> {
        let mut layout = OrganelleLayout::new();
        layout.try_add(PlacedOrganelle::new(
            registry.organelle(root_organelle)?.clone(),
            Hex::ORIGIN,
            0,
        ))?;

        Ok(Self {
            id,
            genus: genus.into(),
            epithet: epithet.into(),
            colour: Colour::default(),
            membrane: registry.membrane(membrane)?.clone(),
            is_bacteria: root_organelle != registry.nucleus_name(),
            behaviour: Behaviour::default(),
            layout,
        })
    }

    /// Place another organelle by internal name (builder style, for setting up worlds)
    pub fn with_organelle(
        mut self,
        registry: &SimulationRegistry,
        name: &str,
        position: Hex,
        orientation: u8,
    ) -> Result<Self> {
        self.layout.try_add(PlacedOrganelle::new(
            registry.organelle(name)?.clone(),
            position,
            orientation,
        ))?;
        if name == registry.nucleus_name() {
            self.is_bacteria = false;
        }
        Ok(self)
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn formatted_name(&self) -> String {
        format!("{} {}", self.genus, self.epithet)
    }

    pub fn organelle_count(&self) -> usize {
        self.layout.len()
    }

    pub fn hex_count(&self) -> usize {
        self.layout.hex_count()
    }

    pub fn mass(&self) -> f32 {
        self.layout.total_mass()
    }

    pub fn movement_organelle_count(&self) -> usize {
        self.layout.count_where(|d| d.has_movement())
    }

    pub fn pilus_count(&self) -> usize {
        self.layout.count_where(|d| d.flags.pilus)
    }

    pub fn toxin_count(&self) -> usize {
        self.layout.count_where(|d| d.flags.toxin)
    }

    pub fn can_engulf(&self) -> bool {
        self.membrane.can_engulf
    }

    /// Largest hex size this species can swallow; 0 when the membrane cannot engulf
    pub fn engulf_size(&self) -> f32 {
        if self.can_engulf() {
            self.hex_count() as f32
        } else {
            0.0
        }
    }

    /// Movement speed: propulsion scaled by the membrane, spread over the body size.
    ///
    /// A single-hex cell without movement organelles moves at
    /// `config.reference_base_speed`.
    pub fn speed(&self, config: &EvoConfig) -> f32 {
        let organelle_force: f32 = self
            .layout
            .iter()
            .map(|o| o.definition.movement_force)
            .sum();
        let force = config.base_movement_force + organelle_force;
        let size = self.hex_count().max(1) as f32;

        config.reference_base_speed * force * self.membrane.movement_factor
            / (config.base_movement_force.max(f32::EPSILON) * size)
    }
}

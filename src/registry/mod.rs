//! Simulation registry - read-only definition data handed to the engine
//!
//! Organelles, compounds, membranes, designated compound roles and name
//! syllables. The engine never builds definitions itself; it receives a
//! `&SimulationRegistry` and looks things up by internal name. Lookups of
//! names that do not exist are configuration errors and fail loudly.
//!
//! Definitions are kept in `BTreeMap`s so that every iteration the mutation
//! engine performs over them is in a stable order.

pub mod compound;
pub mod membrane;
pub mod names;
pub mod organelle;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::core::error::{EvoError, Result};
use crate::hex::Hex;

pub use compound::{CompoundDefinition, CompoundKind};
pub use membrane::MembraneDefinition;
pub use names::NameGenerator;
pub use organelle::{OrganelleDefinition, OrganelleFlags, Process};

const DEFAULT_REGISTRY: &str = include_str!("../../data/default_registry.toml");

/// Compounds with a special meaning to the energy model
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundRoles {
    /// Sugar output counted by the energy generation score
    pub sugar: String,
    /// Energy carrier output counted by the generation score and the energy balance
    pub energy_carrier: String,
    /// Light compound photosynthetic sources are built on
    pub sunlight: String,
}

#[derive(Debug, Clone)]
pub struct SimulationRegistry {
    organelles: BTreeMap<String, Arc<OrganelleDefinition>>,
    compounds: BTreeMap<String, CompoundDefinition>,
    membranes: BTreeMap<String, Arc<MembraneDefinition>>,
    roles: CompoundRoles,
    nucleus: String,
    names: NameGenerator,
}

impl SimulationRegistry {
    /// The built-in microbe registry
    pub fn with_defaults() -> Self {
        Self::parse_toml(DEFAULT_REGISTRY).expect("built-in registry data is valid")
    }

    /// Load registry data from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse registry data from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: TomlRegistry = toml::from_str(content)?;
        data.into_registry()
    }

    pub fn organelle(&self, name: &str) -> Result<&Arc<OrganelleDefinition>> {
        self.organelles
            .get(name)
            .ok_or_else(|| EvoError::unknown("organelle", name))
    }

    pub fn compound(&self, name: &str) -> Result<&CompoundDefinition> {
        self.compounds
            .get(name)
            .ok_or_else(|| EvoError::unknown("compound", name))
    }

    pub fn membrane(&self, name: &str) -> Result<&Arc<MembraneDefinition>> {
        self.membranes
            .get(name)
            .ok_or_else(|| EvoError::unknown("membrane", name))
    }

    /// All organelles, ordered by internal name
    pub fn organelles(&self) -> impl Iterator<Item = &Arc<OrganelleDefinition>> {
        self.organelles.values()
    }

    /// All compounds, ordered by internal name
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundDefinition> {
        self.compounds.values()
    }

    /// All membranes, ordered by internal name
    pub fn membranes(&self) -> impl Iterator<Item = &Arc<MembraneDefinition>> {
        self.membranes.values()
    }

    pub fn roles(&self) -> &CompoundRoles {
        &self.roles
    }

    /// Internal name of the organelle that turns a prokaryote into a eukaryote
    pub fn nucleus_name(&self) -> &str {
        &self.nucleus
    }

    pub fn names(&self) -> &NameGenerator {
        &self.names
    }
}

/// TOML representation of a registry file
#[derive(Debug, Deserialize)]
struct TomlRegistry {
    sugar: String,
    energy_carrier: String,
    sunlight: String,
    nucleus: String,
    names: NameGenerator,
    compounds: Vec<CompoundDefinition>,
    membranes: Vec<MembraneDefinition>,
    organelles: Vec<TomlOrganelle>,
}

/// TOML representation of one organelle
#[derive(Debug, Deserialize)]
struct TomlOrganelle {
    name: String,
    hexes: Vec<[i32; 2]>,
    mass: f32,
    mp_cost: f32,
    #[serde(default)]
    movement_force: f32,
    #[serde(default)]
    processes: Vec<Process>,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    requires_nucleus: bool,
    #[serde(default)]
    pilus: bool,
    #[serde(default)]
    toxin: bool,
}

impl TomlRegistry {
    fn into_registry(self) -> Result<SimulationRegistry> {
        let compounds: BTreeMap<String, CompoundDefinition> = self
            .compounds
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        for role in [&self.sugar, &self.energy_carrier, &self.sunlight] {
            if !compounds.contains_key(role) {
                return Err(EvoError::unknown("compound", role.as_str()));
            }
        }

        let mut organelles = BTreeMap::new();
        for organelle in self.organelles {
            let def = organelle.into_definition(&compounds)?;
            organelles.insert(def.name.clone(), Arc::new(def));
        }
        if !organelles.contains_key(&self.nucleus) {
            return Err(EvoError::unknown("organelle", self.nucleus));
        }

        for membrane in &self.membranes {
            ensure_non_negative("membrane", &membrane.name, "mp_cost", membrane.mp_cost)?;
        }
        let membranes: BTreeMap<String, Arc<MembraneDefinition>> = self
            .membranes
            .into_iter()
            .map(|m| (m.name.clone(), Arc::new(m)))
            .collect();
        if membranes.is_empty() {
            return Err(EvoError::ParseError("registry has no membranes".into()));
        }

        Ok(SimulationRegistry {
            organelles,
            compounds,
            membranes,
            roles: CompoundRoles {
                sugar: self.sugar,
                energy_carrier: self.energy_carrier,
                sunlight: self.sunlight,
            },
            nucleus: self.nucleus,
            names: self.names,
        })
    }
}

/// Costs and masses feed the mutation budget, so they must be finite and >= 0
fn ensure_non_negative(kind: &str, name: &str, field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EvoError::ParseError(format!(
            "{kind} {name} has invalid {field} {value}"
        )))
    }
}

impl TomlOrganelle {
    fn into_definition(
        self,
        compounds: &BTreeMap<String, CompoundDefinition>,
    ) -> Result<OrganelleDefinition> {
        if self.hexes.is_empty() {
            return Err(EvoError::ParseError(format!(
                "organelle {} has an empty footprint",
                self.name
            )));
        }
        ensure_non_negative("organelle", &self.name, "mass", self.mass)?;
        ensure_non_negative("organelle", &self.name, "mp_cost", self.mp_cost)?;

        let hexes: Vec<Hex> = self.hexes.iter().map(|[q, r]| Hex::new(*q, *r)).collect();
        let mut sorted = hexes.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != hexes.len() {
            return Err(EvoError::ParseError(format!(
                "organelle {} repeats a footprint hex",
                self.name
            )));
        }

        for process in &self.processes {
            for compound in process.inputs.keys().chain(process.outputs.keys()) {
                if !compounds.contains_key(compound) {
                    return Err(EvoError::unknown("compound", compound.as_str()));
                }
            }
        }

        Ok(OrganelleDefinition::new(
            self.name,
            hexes,
            self.mass,
            self.mp_cost,
            self.movement_force,
            self.processes,
            OrganelleFlags {
                unique: self.unique,
                requires_nucleus: self.requires_nucleus,
                pilus: self.pilus,
                toxin: self.toxin,
            },
        ))
    }
}

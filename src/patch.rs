//! Patch - a habitat cell with biome conditions and resident populations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{PatchId, SpeciesId};

/// Level of one compound in a biome
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomeCompound {
    /// Ambient amount (cloud size for cloud compounds, level for environmental ones)
    pub amount: f32,
    /// How densely clouds spawn; unused for environmental compounds
    #[serde(default)]
    pub density: f32,
}

/// A kind of chunk that spawns in a patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkConfiguration {
    pub name: String,
    /// Physical size of one chunk, compared against engulf size
    pub size: f32,
    /// Spawn density
    pub density: f32,
    /// Compound name -> amount held by one chunk
    pub compounds: BTreeMap<String, f32>,
    /// Sinking organic debris, grouped into one marine-snow niche
    #[serde(default)]
    pub marine_snow: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biome {
    pub compounds: BTreeMap<String, BiomeCompound>,
    pub chunks: BTreeMap<String, ChunkConfiguration>,
    /// Energy pool shared by random encounters
    #[serde(default)]
    pub encounter_energy: f32,
}

impl Biome {
    pub fn compound(&self, name: &str) -> Option<&BiomeCompound> {
        self.compounds.get(name)
    }

    pub fn with_compound(mut self, name: &str, amount: f32, density: f32) -> Self {
        self.compounds
            .insert(name.to_string(), BiomeCompound { amount, density });
        self
    }

    pub fn with_chunk(mut self, chunk: ChunkConfiguration) -> Self {
        self.chunks.insert(chunk.name.clone(), chunk);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub id: PatchId,
    pub name: String,
    pub biome: Biome,
    /// Current population of every resident species (never negative)
    pub populations: BTreeMap<SpeciesId, u64>,
}

impl Patch {
    pub fn new(id: PatchId, name: impl Into<String>, biome: Biome) -> Self {
        Self {
            id,
            name: name.into(),
            biome,
            populations: BTreeMap::new(),
        }
    }

    pub fn population(&self, species: SpeciesId) -> u64 {
        self.populations.get(&species).copied().unwrap_or(0)
    }

    pub fn set_population(&mut self, species: SpeciesId, population: u64) {
        if population == 0 {
            self.populations.remove(&species);
        } else {
            self.populations.insert(species, population);
        }
    }

    /// Species with a nonzero population, in id order
    pub fn residents(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.populations
            .iter()
            .filter(|&(_, &pop)| pop > 0)
            .map(|(&id, _)| id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchMap {
    patches: Vec<Patch>,
}

impl PatchMap {
    pub fn new(patches: Vec<Patch>) -> Self {
        Self { patches }
    }

    pub fn get(&self, id: PatchId) -> Option<&Patch> {
        self.patches.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PatchId) -> Option<&mut Patch> {
        self.patches.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn total_population(&self, species: SpeciesId) -> u64 {
        self.patches.iter().map(|p| p.population(species)).sum()
    }
}

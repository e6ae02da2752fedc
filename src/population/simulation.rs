//! Multi-step population runs

use serde::{Deserialize, Serialize};

use crate::core::config::EvoConfig;
use crate::core::error::Result;
use crate::patch::PatchMap;
use crate::population::redistribution::{redistribute_populations, PopulationDelta};
use crate::registry::SimulationRegistry;
use crate::species::Species;

/// Deltas produced by one redistribution step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationStep {
    pub step: usize,
    pub deltas: Vec<PopulationDelta>,
}

impl PopulationStep {
    /// Species that dropped from a nonzero population to zero this step
    pub fn extinctions(&self) -> impl Iterator<Item = &PopulationDelta> {
        self.deltas.iter().filter(|d| d.before > 0 && d.after == 0)
    }
}

/// Repeated redistribution against one registry and configuration
pub struct PopulationSimulation<'a> {
    registry: &'a SimulationRegistry,
    config: &'a EvoConfig,
}

impl<'a> PopulationSimulation<'a> {
    pub fn new(registry: &'a SimulationRegistry, config: &'a EvoConfig) -> Self {
        Self { registry, config }
    }

    /// Run `steps` redistribution passes over `map`, writing populations back
    /// after each pass. A fresh cache is used per pass.
    pub fn run(
        &self,
        map: &mut PatchMap,
        species: &[Species],
        steps: usize,
    ) -> Result<Vec<PopulationStep>> {
        let mut history = Vec::with_capacity(steps);
        for step in 0..steps {
            let deltas = redistribute_populations(map, species, self.registry, self.config)?;
            let record = PopulationStep { step, deltas };

            for extinct in record.extinctions() {
                tracing::info!(
                    step,
                    species = extinct.species.0,
                    patch = extinct.patch.0,
                    "species died out in patch"
                );
            }
            history.push(record);
        }
        Ok(history)
    }
}

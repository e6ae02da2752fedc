//! Energy balance of a species in a biome
//!
//! Counts energy-carrier production and consumption per second:
//! - processes run at a rate limited by their scarcest environmental input
//!   (cloud inputs are assumed to be collected, internal inputs are consumed)
//! - osmoregulation costs a fixed amount per hex, scaled by the membrane
//! - movement organelles cost energy only while moving

use serde::{Deserialize, Serialize};

use crate::core::config::EvoConfig;
use crate::patch::Biome;
use crate::registry::{CompoundKind, Process, SimulationRegistry};
use crate::species::Species;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalance {
    pub production: f32,
    pub process_consumption: f32,
    pub osmoregulation: f32,
    pub movement: f32,
    pub total_consumption_stationary: f32,
    pub total_consumption: f32,
    pub final_balance_stationary: f32,
    pub final_balance: f32,
}

/// Fraction of full speed a process runs at given ambient environmental levels
pub fn process_rate(process: &Process, biome: &Biome, registry: &SimulationRegistry) -> f32 {
    let mut rate: f32 = 1.0;
    for (compound, &required) in &process.inputs {
        if required <= 0.0 {
            continue;
        }
        let environmental = registry
            .compound(compound)
            .map(|c| c.kind == CompoundKind::Environmental)
            .unwrap_or(false);
        if environmental {
            let available = biome.compound(compound).map(|c| c.amount).unwrap_or(0.0);
            rate = rate.min((available / required).clamp(0.0, 1.0));
        }
    }
    rate
}

pub fn compute_energy_balance(
    species: &Species,
    biome: &Biome,
    registry: &SimulationRegistry,
    config: &EvoConfig,
) -> EnergyBalance {
    let carrier = registry.roles().energy_carrier.as_str();

    let mut production = 0.0;
    let mut process_consumption = 0.0;
    for organelle in species.layout.iter() {
        for process in &organelle.definition.processes {
            let rate = process_rate(process, biome, registry);
            if rate <= 0.0 {
                continue;
            }
            production += process.output(carrier).unwrap_or(0.0) * rate;
            process_consumption += process.input(carrier).unwrap_or(0.0) * rate;
        }
    }

    let osmoregulation = species.hex_count() as f32
        * config.osmoregulation_cost_per_hex
        * species.membrane.osmoregulation_factor;
    let movement = species.movement_organelle_count() as f32 * config.movement_cost_per_organelle;

    let total_consumption_stationary = process_consumption + osmoregulation;
    let total_consumption = total_consumption_stationary + movement;

    EnergyBalance {
        production,
        process_consumption,
        osmoregulation,
        movement,
        total_consumption_stationary,
        total_consumption,
        final_balance_stationary: production - total_consumption_stationary,
        final_balance: production - total_consumption,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SpeciesId;
    use crate::hex::Hex;

    #[test]
    fn test_glycolysis_cell_balance() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let species = Species::new_prokaryote(SpeciesId(1), "A", "a", &registry, "single", "cytoplasm")
            .unwrap()
            .with_organelle(&registry, "flagellum", Hex::new(0, 1), 0)
            .unwrap();

        let balance = compute_energy_balance(&species, &Biome::default(), &registry, &config);

        // Glycolysis has no environmental input: full speed, 2 ATP
        assert!((balance.production - 2.0).abs() < 1e-6);
        assert!((balance.osmoregulation - 2.0).abs() < 1e-6);
        assert!((balance.movement - 2.0).abs() < 1e-6);
        assert!((balance.final_balance_stationary - 0.0).abs() < 1e-6);
        assert!((balance.final_balance + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_environmental_input_limits_rate() {
        let registry = SimulationRegistry::with_defaults();
        let thermo = registry.organelle("thermoplast").unwrap();
        let process = &thermo.processes[0];

        let cold = Biome::default().with_compound("temperature", 0.25, 0.0);
        let hot = Biome::default().with_compound("temperature", 3.0, 0.0);

        assert!((process_rate(process, &cold, &registry) - 0.25).abs() < 1e-6);
        assert!((process_rate(process, &hot, &registry) - 1.0).abs() < 1e-6);
        assert_eq!(process_rate(process, &Biome::default(), &registry), 0.0);
    }
}

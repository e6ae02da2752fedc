use crate::core::config::EvoConfig;
use crate::registry::SimulationRegistry;
use crate::species::Species;

/// How well a species turns `compound` into energy.
///
/// Sums, over every process of every organelle that consumes `compound`, the
/// sugar and energy-carrier outputs per unit of `compound` consumed, each
/// weighted by its configured multiplier.
pub fn energy_generation_score(
    species: &Species,
    compound: &str,
    registry: &SimulationRegistry,
    config: &EvoConfig,
) -> f32 {
    let roles = registry.roles();
    let mut score = 0.0;

    for organelle in species.layout.iter() {
        for process in &organelle.definition.processes {
            let consumed = match process.input(compound) {
                Some(amount) if amount > 0.0 => amount,
                _ => continue,
            };

            if let Some(sugar) = process.output(&roles.sugar) {
                score += sugar / consumed * config.sugar_output_weight;
            }
            if let Some(carrier) = process.output(&roles.energy_carrier) {
                score += carrier / consumed * config.energy_carrier_output_weight;
            }
        }
    }

    score
}

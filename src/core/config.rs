//! Auto-evo configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. None of them change engine logic;
//! they only scale the heuristics.

use serde::{Deserialize, Serialize};

use crate::core::error::{EvoError, Result};

/// Configuration for the auto-evo engine
///
/// These values produce reasonable balance between food niches.
/// Changing them will affect which body plans win in which patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvoConfig {
    // === CHUNK FOOD ===
    /// Energy granted per (nerfed) unit of chunk compound
    ///
    /// A chunk compound amount `a` with chunk density `d` contributes
    /// `a^chunk_volume_nerf_exponent * d * chunk_energy_amount`.
    pub chunk_energy_amount: f32,

    /// Exponent applied to chunk compound amounts (must be in (0, 1])
    ///
    /// Bigger chunks give proportionally less usable energy since most of
    /// their material is out of reach of a feeding cell.
    pub chunk_volume_nerf_exponent: f32,

    /// Fraction of a chunk's size a species must be able to engulf
    ///
    /// Species with engulf size below `chunk.size * chunk_engulf_size_ratio`
    /// get their chunk fitness multiplied by `chunk_engulf_penalty`.
    pub chunk_engulf_size_ratio: f32,

    /// Multiplier applied to chunk fitness for species too small to engulf
    pub chunk_engulf_penalty: f32,

    // === MOVEMENT ===
    /// Speed of a minimal single-hex cell with no movement organelles
    pub reference_base_speed: f32,

    /// Lower bound on effective speed, as a fraction of `reference_base_speed`
    ///
    /// At 1/3, a slow species that is otherwise good at digesting a chunk
    /// is not zeroed out just because it can barely reach it.
    pub speed_floor_fraction: f32,

    /// Propulsion every cell has without movement organelles
    pub base_movement_force: f32,

    // === ENERGY GENERATION SCORE ===
    /// Weight of sugar produced per unit of consumed compound
    pub sugar_output_weight: f32,

    /// Weight of energy carrier produced per unit of consumed compound
    pub energy_carrier_output_weight: f32,

    // === ENVIRONMENTAL / PHOTOSYNTHESIS ===
    /// Scales ambient non-cloud compound levels into total energy
    pub environmental_capacity_multiplier: f32,

    /// Scales ambient light into total energy
    pub photosynthesis_capacity_multiplier: f32,

    // === PREDATION ===
    /// Energy per (prey individual x prey organelle)
    pub predation_energy_multiplier: f32,

    /// Score per pilus organelle
    pub pilus_predation_score: f32,

    /// Flat score when the predator can engulf the prey
    pub engulf_predation_score: f32,

    /// Predator engulf size must reach the prey hex count times this
    pub engulf_size_ratio: f32,

    /// Weight of the predator-to-prey hex size ratio term
    pub hex_size_predation_weight: f32,

    /// Score per toxin organelle
    pub toxin_predation_score: f32,

    /// Multiplier applied to pilus and engulf scores when the prey is at least as fast
    pub lucky_catch_factor: f32,

    /// Upper bound of behaviour scalars (activity, aggression, opportunism)
    pub max_behaviour_value: f32,

    /// Opportunism above which toxins are not down-weighted against bigger prey
    pub opportunism_threshold: f32,

    // === RANDOM ENCOUNTERS ===
    /// Fitness every species gets against a random-encounter source
    ///
    /// Placeholder until encounter probabilities are modelled. Every species
    /// gets an equal share.
    pub random_encounter_placeholder_fitness: f32,

    // === ENERGY BALANCE ===
    /// Energy carrier spent per hex per second on osmoregulation
    pub osmoregulation_cost_per_hex: f32,

    /// Energy carrier spent per movement organelle while moving
    pub movement_cost_per_organelle: f32,

    // === POPULATION ===
    /// Individuals supported per unit of energy per unit of stationary cost
    pub population_energy_scale: f32,

    /// Populations below this are considered extinct in the patch
    pub min_viable_population: u64,

    /// Fraction of the gap between current and target population closed per step
    ///
    /// 1.0 jumps straight to the target.
    pub population_change_rate: f32,

    // === MUTATION ===
    /// Default mutation point budget per mutation pass
    pub mutation_points: f32,

    /// Cost of removing one organelle
    pub remove_organelle_cost: f32,

    /// Cost of shifting one behaviour scalar
    pub behaviour_change_cost: f32,

    /// Largest shift applied to a behaviour scalar in one step
    pub behaviour_max_shift: f32,

    /// Largest ring searched by the spiral placement policy
    pub max_spiral_radius: i32,

    /// Longest line searched by the front and back placement policies
    pub max_line_distance: i32,

    /// Maximum per-channel colour shift applied once per mutation pass
    pub colour_drift: f32,

    /// Hard cap on steps in one mutation pass
    pub max_mutation_steps: usize,

    /// Hard cap on island repair iterations before giving up loudly
    pub island_repair_max_iterations: usize,
}

impl Default for EvoConfig {
    fn default() -> Self {
        Self {
            // Chunks
            chunk_energy_amount: 90.0,
            chunk_volume_nerf_exponent: 0.8,
            chunk_engulf_size_ratio: 0.5,
            chunk_engulf_penalty: 0.2,

            // Movement
            reference_base_speed: 1.0,
            speed_floor_fraction: 1.0 / 3.0,
            base_movement_force: 1.0,

            // Generation score (sugar is worth more than direct energy carrier)
            sugar_output_weight: 1.0,
            energy_carrier_output_weight: 0.3,

            // Environment
            environmental_capacity_multiplier: 50.0,
            photosynthesis_capacity_multiplier: 100.0,

            // Predation
            predation_energy_multiplier: 0.4,
            pilus_predation_score: 20.0,
            engulf_predation_score: 100.0,
            engulf_size_ratio: 1.5,
            hex_size_predation_weight: 10.0,
            toxin_predation_score: 50.0,
            lucky_catch_factor: 0.5,
            max_behaviour_value: 500.0,
            opportunism_threshold: 250.0,

            random_encounter_placeholder_fitness: 1.0,

            // Energy balance
            osmoregulation_cost_per_hex: 1.0,
            movement_cost_per_organelle: 2.0,

            // Population
            population_energy_scale: 10.0,
            min_viable_population: 20,
            population_change_rate: 1.0,

            // Mutation
            mutation_points: 100.0,
            remove_organelle_cost: 10.0,
            behaviour_change_cost: 5.0,
            behaviour_max_shift: 50.0,
            max_spiral_radius: 10,
            max_line_distance: 20,
            colour_drift: 0.05,
            max_mutation_steps: 100,
            island_repair_max_iterations: 1000,
        }
    }
}

impl EvoConfig {
    /// Load configuration from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string, filling omitted fields with defaults
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: EvoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the heuristics meaningless
    pub fn validate(&self) -> Result<()> {
        if !(self.chunk_volume_nerf_exponent > 0.0 && self.chunk_volume_nerf_exponent <= 1.0) {
            return Err(EvoError::InvalidConfig(format!(
                "chunk_volume_nerf_exponent must be in (0, 1], got {}",
                self.chunk_volume_nerf_exponent
            )));
        }
        if !(0.0..=1.0).contains(&self.speed_floor_fraction) {
            return Err(EvoError::InvalidConfig(format!(
                "speed_floor_fraction must be in [0, 1], got {}",
                self.speed_floor_fraction
            )));
        }
        if !(self.population_change_rate > 0.0 && self.population_change_rate <= 1.0) {
            return Err(EvoError::InvalidConfig(format!(
                "population_change_rate must be in (0, 1], got {}",
                self.population_change_rate
            )));
        }
        if self.remove_organelle_cost <= 0.0 || self.behaviour_change_cost <= 0.0 {
            return Err(EvoError::InvalidConfig(
                "mutation costs must be positive".into(),
            ));
        }
        if self.max_behaviour_value <= 0.0 {
            return Err(EvoError::InvalidConfig(
                "max_behaviour_value must be positive".into(),
            ));
        }
        Ok(())
    }
}

//! Auto-Evo harness
//!
//! Builds a small world, runs generations of mutate -> redistribute and
//! prints a JSON summary on stdout. Logs go to stderr.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use auto_evo::core::types::{PatchId, SpeciesId};
use auto_evo::hex::Hex;
use auto_evo::mutation::{DirectionBias, MutationEngine, PlacementPolicy};
use auto_evo::patch::{Biome, ChunkConfiguration, Patch, PatchMap};
use auto_evo::population::PopulationSimulation;
use auto_evo::registry::SimulationRegistry;
use auto_evo::species::Species;
use auto_evo::{EvoConfig, EvoError, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Auto-Evo simulation harness
#[derive(Parser, Debug)]
#[command(name = "auto_evo_sim")]
#[command(about = "Run mutate/redistribute generations and print a JSON summary")]
struct Args {
    /// Number of generations
    #[arg(long, default_value_t = 5)]
    generations: usize,

    /// Mutation candidates per species and generation
    #[arg(long, default_value_t = 3)]
    candidates: usize,

    /// Redistribution steps per generation
    #[arg(long, default_value_t = 3)]
    population_steps: usize,

    /// Mutation point budget (defaults to the configured value)
    #[arg(long)]
    budget: Option<f32>,

    /// Placement policy: 0 realistic, 1 spiral, 2 front, 3 back
    #[arg(long, default_value_t = 0)]
    placement: u8,

    /// Bias realistic placement toward the rear instead of the front
    #[arg(long)]
    rear: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Registry data (TOML) replacing the built-in defaults
    #[arg(long)]
    registry: Option<PathBuf>,
}

#[derive(Serialize)]
struct GenerationSummary {
    generation: usize,
    new_species: usize,
    living_species: usize,
    total_population: u64,
}

#[derive(Serialize)]
struct SpeciesSummary {
    id: u32,
    name: String,
    membrane: String,
    eukaryote: bool,
    organelles: Vec<String>,
    populations: BTreeMap<String, u64>,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    placement: PlacementPolicy,
    generations: Vec<GenerationSummary>,
    survivors: Vec<SpeciesSummary>,
}

fn initial_world(registry: &SimulationRegistry) -> Result<(PatchMap, Vec<Species>)> {
    let grazer = Species::new_prokaryote(SpeciesId(1), "Primum", "dulce", registry, "single", "cytoplasm")?
        .with_organelle(registry, "cytoplasm", Hex::new(0, -1), 0)?;
    let miner = Species::new_prokaryote(SpeciesId(2), "Ferrum", "edax", registry, "single", "rusticyanin")?
        .with_organelle(registry, "flagellum", Hex::new(0, 1), 3)?;

    let mut surface = Patch::new(
        PatchId(0),
        "Sunlit Surface",
        Biome::default()
            .with_compound("glucose", 2000.0, 0.4)
            .with_compound("sunlight", 1.0, 0.0)
            .with_compound("oxygen", 0.2, 0.0)
            .with_compound("carbondioxide", 0.1, 0.0),
    );
    surface.set_population(grazer.id, 200);

    let mut vent = Patch::new(
        PatchId(1),
        "Iron Vent",
        Biome {
            encounter_energy: 50.0,
            ..Biome::default()
        }
        .with_compound("iron", 800.0, 0.5)
        .with_compound("hydrogensulfide", 1000.0, 0.3)
        .with_compound("temperature", 0.8, 0.0)
        .with_compound("carbondioxide", 0.3, 0.0)
        .with_chunk(ChunkConfiguration {
            name: "iron_big".into(),
            size: 6.0,
            density: 0.2,
            compounds: BTreeMap::from([("iron".to_string(), 40.0)]),
            marine_snow: false,
        }),
    );
    vent.set_population(miner.id, 200);

    let abyss = Patch::new(
        PatchId(2),
        "Abyss",
        Biome::default().with_chunk(ChunkConfiguration {
            name: "snow".into(),
            size: 2.0,
            density: 0.6,
            compounds: BTreeMap::from([("glucose".to_string(), 8.0)]),
            marine_snow: true,
        }),
    );

    Ok((PatchMap::new(vec![surface, vent, abyss]), vec![grazer, miner]))
}

/// Patch where a species is most abundant
fn home_patch(map: &PatchMap, species: SpeciesId) -> Option<PatchId> {
    map.iter()
        .filter(|p| p.population(species) > 0)
        .max_by_key(|p| p.population(species))
        .map(|p| p.id)
}

fn run(args: &Args) -> Result<RunSummary> {
    let config = match &args.config {
        Some(path) => EvoConfig::load_from_toml(path)?,
        None => EvoConfig::default(),
    };
    config.validate()?;
    let registry = match &args.registry {
        Some(path) => SimulationRegistry::load_from_toml(path)?,
        None => SimulationRegistry::with_defaults(),
    };

    let placement = PlacementPolicy::try_from(args.placement)?;
    let bias = if args.rear {
        DirectionBias::Rear
    } else {
        DirectionBias::Front
    };
    let budget = args.budget.unwrap_or(config.mutation_points);
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (mut map, mut species) = initial_world(&registry)?;
    let last_id = species.iter().map(|s| s.id).max().unwrap_or(SpeciesId(0));
    let mut next_id = last_id.offset(1).ok_or(EvoError::SpeciesIdOverflow {
        first: last_id.0,
        count: 1,
    })?;
    let engine = MutationEngine::with_placement(&registry, &config, placement, bias);
    let simulation = PopulationSimulation::new(&registry, &config);

    tracing::info!(seed, ?placement, budget, generations = args.generations, "starting auto-evo run");

    let mut generations = Vec::with_capacity(args.generations);
    for generation in 0..args.generations {
        let parents: Vec<Species> = species
            .iter()
            .filter(|s| map.total_population(s.id) > 0)
            .cloned()
            .collect();

        let mut new_species = 0;
        for parent in &parents {
            let Some(home) = home_patch(&map, parent.id) else {
                continue;
            };
            let candidates =
                engine.generate_candidates(parent, args.candidates, budget, next_id, &mut rng)?;
            next_id = next_id
                .offset(args.candidates)
                .ok_or(EvoError::SpeciesIdOverflow {
                    first: next_id.0,
                    count: args.candidates,
                })?;

            for candidate in candidates.into_iter().filter(|c| c.steps > 0) {
                if let Some(patch) = map.get_mut(home) {
                    patch.set_population(candidate.species.id, config.min_viable_population);
                }
                species.push(candidate.species);
                new_species += 1;
            }
        }

        simulation.run(&mut map, &species, args.population_steps)?;
        species.retain(|s| map.total_population(s.id) > 0);

        let summary = GenerationSummary {
            generation,
            new_species,
            living_species: species.len(),
            total_population: species.iter().map(|s| map.total_population(s.id)).sum(),
        };
        tracing::info!(
            generation,
            new_species,
            living = summary.living_species,
            population = summary.total_population,
            "generation complete"
        );
        generations.push(summary);
    }

    let survivors = species
        .iter()
        .map(|s| SpeciesSummary {
            id: s.id.0,
            name: s.formatted_name(),
            membrane: s.membrane.name.clone(),
            eukaryote: !s.is_bacteria,
            organelles: s.layout.iter().map(|o| o.definition.name.clone()).collect(),
            populations: map
                .iter()
                .filter(|p| p.population(s.id) > 0)
                .map(|p| (p.name.clone(), p.population(s.id)))
                .collect(),
        })
        .collect();

    Ok(RunSummary {
        seed,
        placement,
        generations,
        survivors,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("auto_evo=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "auto-evo run failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize summary");
            ExitCode::FAILURE
        }
    }
}

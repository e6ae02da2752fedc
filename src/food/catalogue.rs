//! Standard niche list for a patch

use crate::core::config::EvoConfig;
use crate::core::error::Result;
use crate::food::{
    ChunkFoodSource, CompoundFoodSource, EnvironmentalFoodSource, FoodSource,
    HeterotrophicFoodSource, MarineSnowFoodSource, PhotosyntheticFoodSource,
    RandomEncounterFoodSource,
};
use crate::patch::Patch;
use crate::registry::{CompoundKind, SimulationRegistry};
use crate::species::Species;

/// Build every food source of `patch`:
/// - one per regular chunk type, plus one marine-snow aggregate
/// - one dissolved source per cloud compound in the biome
/// - one environmental source per ambient compound other than sunlight
/// - one photosynthetic source
/// - one predation source per resident species found in `species`
/// - one random-encounter source
///
/// Biome compounds missing from the registry are data errors and abort.
pub fn food_sources_for_patch<'a>(
    patch: &'a Patch,
    species: &'a [Species],
    registry: &SimulationRegistry,
    config: &EvoConfig,
) -> Result<Vec<FoodSource<'a>>> {
    let mut sources = Vec::new();

    for chunk in patch.biome.chunks.values().filter(|c| !c.marine_snow) {
        sources.push(FoodSource::Chunk(ChunkFoodSource::new(patch, &chunk.name, config)));
    }
    if patch.biome.chunks.values().any(|c| c.marine_snow) {
        sources.push(FoodSource::MarineSnow(MarineSnowFoodSource::new(patch, config)));
    }

    let sunlight = registry.roles().sunlight.as_str();
    for name in patch.biome.compounds.keys() {
        let definition = registry.compound(name)?;
        match definition.kind {
            CompoundKind::Cloud => {
                sources.push(FoodSource::Compound(CompoundFoodSource::new(patch, name)));
            }
            CompoundKind::Environmental if name != sunlight => {
                sources.push(FoodSource::Environmental(EnvironmentalFoodSource::new(
                    patch, name, registry, config,
                )?));
            }
            CompoundKind::Environmental | CompoundKind::Internal => {}
        }
    }
    sources.push(FoodSource::Photosynthetic(PhotosyntheticFoodSource::new(
        patch, registry, config,
    )));

    for prey_id in patch.residents() {
        match species.iter().find(|s| s.id == prey_id) {
            Some(prey) => sources.push(FoodSource::Heterotrophic(HeterotrophicFoodSource::new(
                patch, prey, config,
            ))),
            None => tracing::warn!(
                patch = %patch.name,
                species = prey_id.0,
                "resident species not supplied, skipping its predation niche"
            ),
        }
    }

    sources.push(FoodSource::RandomEncounter(RandomEncounterFoodSource::new(patch)));

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EvoError;
    use crate::core::types::{PatchId, SpeciesId};
    use crate::food::DescriptionTemplate;
    use crate::patch::{Biome, ChunkConfiguration};
    use std::collections::BTreeMap;

    #[test]
    fn test_catalogue_covers_every_niche() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let biome = Biome::default()
            .with_compound("glucose", 100.0, 0.1)
            .with_compound("sunlight", 1.0, 0.0)
            .with_compound("oxygen", 0.2, 0.0)
            .with_chunk(ChunkConfiguration {
                name: "iron".into(),
                size: 10.0,
                density: 0.1,
                compounds: BTreeMap::from([("iron".to_string(), 20.0)]),
                marine_snow: false,
            })
            .with_chunk(ChunkConfiguration {
                name: "snow".into(),
                size: 2.0,
                density: 0.5,
                compounds: BTreeMap::from([("glucose".to_string(), 5.0)]),
                marine_snow: true,
            });
        let mut patch = Patch::new(PatchId(0), "Coast", biome);
        let species = vec![
            Species::new_prokaryote(SpeciesId(1), "A", "a", &registry, "single", "cytoplasm").unwrap(),
        ];
        patch.set_population(SpeciesId(1), 500);

        let sources = food_sources_for_patch(&patch, &species, &registry, &config).unwrap();
        let templates: Vec<_> = sources.iter().map(|s| s.description().template).collect();

        assert_eq!(
            templates,
            vec![
                DescriptionTemplate::ChunkFood,
                DescriptionTemplate::MarineSnow,
                DescriptionTemplate::CompoundFood,
                DescriptionTemplate::EnvironmentalFood,
                DescriptionTemplate::Photosynthesis,
                DescriptionTemplate::PredationFood,
                DescriptionTemplate::RandomEncounter,
            ]
        );
        assert!(sources.iter().all(|s| s.total_energy() >= 0.0));
        assert!(sources.iter().all(|s| s.patch_id() == PatchId(0)));
    }

    #[test]
    fn test_unknown_biome_compound_aborts() {
        let registry = SimulationRegistry::with_defaults();
        let config = EvoConfig::default();
        let patch = Patch::new(
            PatchId(0),
            "Odd",
            Biome::default().with_compound("phlogiston", 1.0, 1.0),
        );

        let err = food_sources_for_patch(&patch, &[], &registry, &config)
            .err()
            .expect("unknown compound must abort");
        assert!(matches!(err, EvoError::UnknownDefinition { .. }));
    }
}

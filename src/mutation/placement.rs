//! Organelle placement policies
//!
//! Every policy returns the first position and orientation where the new
//! organelle's footprint is disjoint from all occupied hexes, or `None`
//! when the search is exhausted. `None` is a normal outcome.

use serde::{Deserialize, Serialize};

use crate::core::config::EvoConfig;
use crate::core::error::EvoError;
use crate::core::rng::{shuffle, RandomStream};
use crate::hex::{Hex, DIRECTIONS, FRONT, REAR};
use crate::mutation::memory::MutationWorkMemory;
use crate::registry::OrganelleDefinition;
use crate::species::OrganelleLayout;

/// How far from an existing hex the realistic walk searches
const REALISTIC_MAX_RADIUS: i32 = 3;

/// Movement organelles try to face backwards first so they push forwards
const MOVEMENT_ROTATIONS: [u8; 6] = [3, 0, 1, 2, 4, 5];
const DEFAULT_ROTATIONS: [u8; 6] = [0, 1, 2, 3, 4, 5];

// Side traversal tables, indexed by [bias][left/right][upper/lower].
// Front tables all open with the front side, rear tables with the rear side.
const FRONT_RIGHT_UPPER: [usize; 6] = [0, 1, 2, 5, 3, 4];
const FRONT_RIGHT_LOWER: [usize; 6] = [0, 2, 1, 3, 5, 4];
const FRONT_LEFT_UPPER: [usize; 6] = [0, 5, 4, 1, 3, 2];
const FRONT_LEFT_LOWER: [usize; 6] = [0, 4, 5, 3, 1, 2];
const REAR_RIGHT_UPPER: [usize; 6] = [3, 2, 1, 4, 0, 5];
const REAR_RIGHT_LOWER: [usize; 6] = [3, 2, 4, 1, 5, 0];
const REAR_LEFT_UPPER: [usize; 6] = [3, 4, 5, 2, 0, 1];
const REAR_LEFT_LOWER: [usize; 6] = [3, 4, 2, 5, 1, 0];

/// Placement policy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    #[default]
    Realistic,
    Spiral,
    Front,
    Back,
}

impl TryFrom<u8> for PlacementPolicy {
    type Error = EvoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Realistic),
            1 => Ok(Self::Spiral),
            2 => Ok(Self::Front),
            3 => Ok(Self::Back),
            other => Err(EvoError::InvalidPlacementStrategy(other)),
        }
    }
}

/// Which end of the cell the realistic walk favours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionBias {
    #[default]
    Front,
    Rear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: Hex,
    pub orientation: u8,
}

fn rotation_order(definition: &OrganelleDefinition) -> &'static [u8; 6] {
    if definition.has_movement() {
        &MOVEMENT_ROTATIONS
    } else {
        &DEFAULT_ROTATIONS
    }
}

/// First rotation at which `definition` fits at `position`
fn fit_at(
    definition: &OrganelleDefinition,
    position: Hex,
    memory: &MutationWorkMemory,
) -> Option<Placement> {
    rotation_order(definition)
        .iter()
        .find(|&&orientation| OrganelleLayout::fits(definition, position, orientation, &memory.occupied))
        .map(|&orientation| Placement {
            position,
            orientation,
        })
}

/// Direction visiting order around `hex`.
///
/// The table is picked by the sign of `q` (a coin flip decides when it is
/// zero), the sign of `r` and the bias. Only the `q == 0` case consumes
/// randomness.
pub fn side_traversal_order<R: RandomStream + ?Sized>(
    hex: Hex,
    bias: DirectionBias,
    rng: &mut R,
) -> &'static [usize; 6] {
    let right = match hex.q {
        q if q > 0 => true,
        q if q < 0 => false,
        _ => rng.coin_flip(),
    };
    let upper = hex.r < 0;

    match (bias, right, upper) {
        (DirectionBias::Front, true, true) => &FRONT_RIGHT_UPPER,
        (DirectionBias::Front, true, false) => &FRONT_RIGHT_LOWER,
        (DirectionBias::Front, false, true) => &FRONT_LEFT_UPPER,
        (DirectionBias::Front, false, false) => &FRONT_LEFT_LOWER,
        (DirectionBias::Rear, true, true) => &REAR_RIGHT_UPPER,
        (DirectionBias::Rear, true, false) => &REAR_RIGHT_LOWER,
        (DirectionBias::Rear, false, true) => &REAR_LEFT_UPPER,
        (DirectionBias::Rear, false, false) => &REAR_LEFT_LOWER,
    }
}

/// Grow outwards from existing organelles, visited in random order.
///
/// Around each footprint hex the sides are tried in side-traversal order,
/// one to three steps out.
pub fn place_realistic<R: RandomStream + ?Sized>(
    layout: &OrganelleLayout,
    definition: &OrganelleDefinition,
    bias: DirectionBias,
    rng: &mut R,
    memory: &mut MutationWorkMemory,
) -> Option<Placement> {
    layout.fill_occupied(&mut memory.occupied);
    memory.organelle_order.clear();
    memory.organelle_order.extend(0..layout.len());
    shuffle(&mut memory.organelle_order, rng);

    if layout.is_empty() {
        return fit_at(definition, Hex::ORIGIN, memory);
    }

    for i in 0..memory.organelle_order.len() {
        let Some(existing) = layout.get(memory.organelle_order[i]) else {
            continue;
        };
        for hex in existing.hexes() {
            let sides = side_traversal_order(hex, bias, rng);
            for radius in 1..=REALISTIC_MAX_RADIUS {
                for &side in sides {
                    let position = hex + DIRECTIONS[side] * radius;
                    if let Some(placement) = fit_at(definition, position, memory) {
                        return Some(placement);
                    }
                }
            }
        }
    }
    None
}

/// Hexes at exactly `radius` from the origin, walked once around the ring
pub fn ring(radius: i32) -> impl Iterator<Item = Hex> {
    let start = DIRECTIONS[4] * radius;
    (0..6usize)
        .flat_map(move |side| (0..radius).map(move |step| (side, step)))
        .scan(start, |hex, (side, _)| {
            let current = *hex;
            *hex = current + DIRECTIONS[side];
            Some(current)
        })
}

/// Expanding rings around the origin; odd rings are walked backwards
pub fn place_spiral(
    layout: &OrganelleLayout,
    definition: &OrganelleDefinition,
    config: &EvoConfig,
    memory: &mut MutationWorkMemory,
) -> Option<Placement> {
    layout.fill_occupied(&mut memory.occupied);

    for radius in 1..=config.max_spiral_radius {
        memory.ring.clear();
        memory.ring.extend(ring(radius));
        if radius % 2 == 1 {
            memory.ring.reverse();
        }
        let memory: &MutationWorkMemory = memory;
        if let Some(placement) = memory.ring.iter().find_map(|&h| fit_at(definition, h, memory)) {
            return Some(placement);
        }
    }
    None
}

/// Search a single line from the origin, toward the front (−R) or the rear (+R)
pub fn place_on_line(
    layout: &OrganelleLayout,
    definition: &OrganelleDefinition,
    direction: DirectionBias,
    config: &EvoConfig,
    memory: &mut MutationWorkMemory,
) -> Option<Placement> {
    layout.fill_occupied(&mut memory.occupied);
    let side = match direction {
        DirectionBias::Front => FRONT,
        DirectionBias::Rear => REAR,
    };

    (0..=config.max_line_distance)
        .map(|distance| DIRECTIONS[side] * distance)
        .find_map(|position| fit_at(definition, position, memory))
}

/// Dispatch on `policy`
pub fn place_organelle<R: RandomStream + ?Sized>(
    policy: PlacementPolicy,
    layout: &OrganelleLayout,
    definition: &OrganelleDefinition,
    bias: DirectionBias,
    config: &EvoConfig,
    rng: &mut R,
    memory: &mut MutationWorkMemory,
) -> Option<Placement> {
    let placement = match policy {
        PlacementPolicy::Realistic => place_realistic(layout, definition, bias, rng, memory),
        PlacementPolicy::Spiral => place_spiral(layout, definition, config, memory),
        PlacementPolicy::Front => place_on_line(layout, definition, DirectionBias::Front, config, memory),
        PlacementPolicy::Back => place_on_line(layout, definition, DirectionBias::Rear, config, memory),
    };
    if placement.is_none() {
        tracing::trace!(?policy, organelle = %definition.name, "no free slot");
    }
    placement
}

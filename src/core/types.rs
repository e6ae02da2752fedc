//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpeciesId(pub u32);

impl SpeciesId {
    /// The id `offset` places after this one, `None` past `u32::MAX`
    pub fn offset(self, offset: usize) -> Option<SpeciesId> {
        u32::try_from(offset)
            .ok()
            .and_then(|offset| self.0.checked_add(offset))
            .map(SpeciesId)
    }
}

/// Unique identifier for a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatchId(pub u32);

/// RGBA colour with every channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_id_offset_is_checked() {
        assert_eq!(SpeciesId(10).offset(3), Some(SpeciesId(13)));
        assert_eq!(SpeciesId(u32::MAX - 1).offset(1), Some(SpeciesId(u32::MAX)));
        assert_eq!(SpeciesId(u32::MAX).offset(1), None);
        assert_eq!(SpeciesId(0).offset(usize::MAX), None);
    }
}

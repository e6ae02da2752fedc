//! Hex grid coordinate system for organelle layouts.
//!
//! Uses axial coordinates (q, r). The cell's "front" is the −R direction.

use serde::{Deserialize, Serialize};

/// Axial hex coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Neighbour offsets in rotation order. Rotating direction `i` by one step
/// yields direction `i + 1`.
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(0, -1),
    Hex::new(1, -1),
    Hex::new(1, 0),
    Hex::new(0, 1),
    Hex::new(-1, 1),
    Hex::new(-1, 0),
];

/// Index into [`DIRECTIONS`] of the front side (−R).
pub const FRONT: usize = 0;
/// Index into [`DIRECTIONS`] of the rear side (+R).
pub const REAR: usize = 3;

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Rotate around the origin by `steps` 60° steps.
    pub fn rotate(self, steps: u8) -> Hex {
        let mut hex = self;
        for _ in 0..(steps % 6) {
            hex = Hex::new(-hex.r, hex.q + hex.r);
        }
        hex
    }

    /// Get the 6 neighbour coordinates, in [`DIRECTIONS`] order.
    pub fn neighbours(&self) -> [Hex; 6] {
        DIRECTIONS.map(|d| *self + d)
    }

    /// Distance to another hex (in hex steps).
    pub fn distance(&self, other: &Hex) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
    }

    /// Distance from the origin.
    pub fn length(&self) -> i32 {
        self.distance(&Hex::ORIGIN)
    }
}

impl std::ops::Add for Hex {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl std::ops::Sub for Hex {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl std::ops::Mul<i32> for Hex {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.q * rhs, self.r * rhs)
    }
}

impl std::ops::AddAssign for Hex {
    fn add_assign(&mut self, rhs: Self) {
        self.q += rhs.q;
        self.r += rhs.r;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hex_distance() {
        let a = Hex::new(0, 0);
        let b = Hex::new(2, -1);
        assert_eq!(a.distance(&b), 2);
        assert_eq!(Hex::new(1, 1).length(), 2);
        assert_eq!(Hex::new(-3, 3).length(), 3);
    }

    #[test]
    fn test_directions_are_unit_and_rotate_in_order() {
        for (i, dir) in DIRECTIONS.iter().enumerate() {
            assert_eq!(dir.length(), 1);
            assert_eq!(dir.rotate(1), DIRECTIONS[(i + 1) % 6]);
        }
        assert_eq!(DIRECTIONS[FRONT], Hex::new(0, -1));
        assert_eq!(DIRECTIONS[REAR], Hex::new(0, 1));
    }

    #[test]
    fn test_full_rotation_is_identity() {
        let hex = Hex::new(2, -5);
        assert_eq!(hex.rotate(6), hex);
        assert_eq!(hex.rotate(3), Hex::new(-2, 5));
    }

    #[test]
    fn test_neighbour_count() {
        let hex = Hex::new(0, 0);
        assert!(hex.neighbours().iter().all(|n| n.distance(&hex) == 1));
    }

    proptest! {
        #[test]
        fn proptest_rotation_preserves_length(q in -50i32..50, r in -50i32..50, steps in 0u8..12) {
            let hex = Hex::new(q, r);
            prop_assert_eq!(hex.rotate(steps).length(), hex.length());
        }

        #[test]
        fn proptest_distance_is_symmetric_and_translation_invariant(
            a in (-30i32..30, -30i32..30),
            b in (-30i32..30, -30i32..30),
            t in (-30i32..30, -30i32..30),
        ) {
            let (a, b, t) = (Hex::new(a.0, a.1), Hex::new(b.0, b.1), Hex::new(t.0, t.1));
            prop_assert_eq!(a.distance(&b), b.distance(&a));
            prop_assert_eq!((a + t).distance(&(b + t)), a.distance(&b));
        }
    }
}

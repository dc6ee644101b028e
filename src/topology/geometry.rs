//! Cell geometries and directions.
//!
//! Directions are numbered so that walking the list visits neighbours in
//! rotational order. That makes `opposite` a fixed rotation by half the
//! direction count for every geometry.

use serde::{Deserialize, Serialize};

/// Largest number of neighbours any geometry has.
pub const MAX_DIRECTIONS: usize = 8;

/// How cells connect to each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Geometry {
    /// Orthogonal neighbours only: N, E, S, W.
    Square4,
    /// Hexagonal cells in axial coordinates.
    Hex6,
    /// Orthogonal and diagonal neighbours: N, NE, E, SE, S, SW, W, NW.
    Square8,
}

/// A direction index, valid for the geometry that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Direction(pub u8);

impl Direction {
    /// Get the raw direction index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// (dcol, drow); row increases towards the top of the board.
const SQUARE4: [(i16, i16); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const HEX6: [(i16, i16); 6] = [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)];
const SQUARE8: [(i16, i16); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

impl Geometry {
    /// Number of neighbour directions.
    #[must_use]
    pub const fn direction_count(self) -> usize {
        match self {
            Geometry::Square4 => 4,
            Geometry::Hex6 => 6,
            Geometry::Square8 => 8,
        }
    }

    /// All directions in rotational order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        (0..self.direction_count() as u8).map(Direction)
    }

    /// Column/row step for a direction.
    #[must_use]
    pub fn offset(self, direction: Direction) -> (i16, i16) {
        let table: &[(i16, i16)] = match self {
            Geometry::Square4 => &SQUARE4,
            Geometry::Hex6 => &HEX6,
            Geometry::Square8 => &SQUARE8,
        };
        table[direction.index()]
    }

    /// The direction pointing back the way `direction` came.
    #[must_use]
    pub fn opposite(self, direction: Direction) -> Direction {
        let n = self.direction_count() as u8;
        Direction((direction.0 + n / 2) % n)
    }

    /// Rotate `direction` by `steps` positions (negative turns the other way).
    #[must_use]
    pub fn rotate(self, direction: Direction, steps: i32) -> Direction {
        let n = self.direction_count() as i32;
        Direction((i32::from(direction.0) + steps).rem_euclid(n) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_cancel() {
        for geometry in [Geometry::Square4, Geometry::Hex6, Geometry::Square8] {
            for direction in geometry.directions() {
                let (dc, dr) = geometry.offset(direction);
                let (oc, or) = geometry.offset(geometry.opposite(direction));
                assert_eq!((dc + oc, dr + or), (0, 0), "{:?} {:?}", geometry, direction);
            }
        }
    }

    #[test]
    fn test_direction_counts() {
        assert_eq!(Geometry::Square4.directions().count(), 4);
        assert_eq!(Geometry::Hex6.directions().count(), 6);
        assert_eq!(Geometry::Square8.directions().count(), MAX_DIRECTIONS);
    }

    #[test]
    fn test_rotate_wraps() {
        let g = Geometry::Square8;
        assert_eq!(g.rotate(Direction(7), 1), Direction(0));
        assert_eq!(g.rotate(Direction(0), -1), Direction(7));
        assert_eq!(Geometry::Hex6.rotate(Direction(2), 3), Direction(5));
    }
}

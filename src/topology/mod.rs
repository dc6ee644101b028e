//! Board topology: geometries, cells and the cell arena.
//!
//! Cells refer to each other by `CellId`, an index into the owning `Grid`.
//! Adjacency is computed once when a grid is built and never mutated, so a
//! cloned grid is a plain structural copy.

pub mod cell;
pub mod geometry;
pub mod grid;

pub use cell::{Cell, CellId, Coord, Location};
pub use geometry::{Direction, Geometry, MAX_DIRECTIONS};
pub use grid::{BoardShape, CellMask, Grid};

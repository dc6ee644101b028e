//! The cell arena.
//!
//! Board cells come first in row-major order starting at `A1`, then the
//! reserve cells. That order is the deterministic enumeration every digest
//! and move generator walks.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellId, Coord, Location};
use super::geometry::Geometry;
use crate::pieces::ChipId;

/// Which coordinates of the bounding rectangle hold cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellMask {
    /// Every coordinate of the rectangle.
    Full,
    /// A hexagon inscribed in a square hex-6 rhombus of side `2r + 1`: the
    /// cells with `r <= col + row <= 3r`.
    Hexagon,
}

/// Dimensions and connectivity of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardShape {
    pub cols: u8,
    pub rows: u8,
    pub geometry: Geometry,
    /// Number of off-board reserve cells.
    pub reserves: u8,
    pub mask: CellMask,
}

impl BoardShape {
    /// A full rectangle with no reserves.
    #[must_use]
    pub const fn rect(cols: u8, rows: u8, geometry: Geometry) -> Self {
        Self {
            cols,
            rows,
            geometry,
            reserves: 0,
            mask: CellMask::Full,
        }
    }

    #[must_use]
    pub const fn with_reserves(mut self, reserves: u8) -> Self {
        self.reserves = reserves;
        self
    }

    #[must_use]
    pub const fn with_mask(mut self, mask: CellMask) -> Self {
        self.mask = mask;
        self
    }

    /// True if `coord` is a cell of this shape.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        if coord.col >= self.cols || coord.row >= self.rows {
            return false;
        }
        match self.mask {
            CellMask::Full => true,
            CellMask::Hexagon => {
                let radius = (u16::from(self.cols.min(self.rows)) - 1) / 2;
                let sum = u16::from(coord.col) + u16::from(coord.row);
                (radius..=3 * radius).contains(&sum)
            }
        }
    }
}

/// Arena of cells with adjacency resolved at construction.
#[derive(Clone, Debug)]
pub struct Grid {
    shape: BoardShape,
    cells: Vec<Cell>,
    board_cells: usize,
    index: Vec<Option<CellId>>,
    sweep_generation: std::cell::Cell<u32>,
}

impl Grid {
    /// Allocate every cell of `shape` and link neighbours.
    #[must_use]
    pub fn new(shape: BoardShape) -> Self {
        let mut cells = Vec::new();
        let mut index = vec![None; usize::from(shape.cols) * usize::from(shape.rows)];

        for row in 0..shape.rows {
            for col in 0..shape.cols {
                let coord = Coord::new(col, row);
                if shape.contains(coord) {
                    let id = CellId(cells.len() as u32);
                    index[usize::from(row) * usize::from(shape.cols) + usize::from(col)] = Some(id);
                    cells.push(Cell::new(id, Location::Board(coord)));
                }
            }
        }
        let board_cells = cells.len();

        for reserve in 0..shape.reserves {
            let id = CellId(cells.len() as u32);
            cells.push(Cell::new(id, Location::Reserve(reserve)));
        }

        let mut grid = Self {
            shape,
            cells,
            board_cells,
            index,
            sweep_generation: std::cell::Cell::new(0),
        };
        grid.link();
        tracing::debug!(
            cols = shape.cols,
            rows = shape.rows,
            geometry = ?shape.geometry,
            cells = grid.cells.len(),
            "grid built"
        );
        grid
    }

    fn link(&mut self) {
        let geometry = self.shape.geometry;
        for i in 0..self.board_cells {
            let Some(coord) = self.cells[i].coord() else { continue };
            for direction in geometry.directions() {
                let (dcol, drow) = geometry.offset(direction);
                let neighbor = coord.offset(dcol, drow).and_then(|c| self.cell_at(c));
                self.cells[i].set_neighbor(direction, neighbor);
            }
        }
    }

    #[must_use]
    pub fn shape(&self) -> &BoardShape {
        &self.shape
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.shape.geometry
    }

    /// Get a cell by id. Panics on an id from another grid.
    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.index()]
    }

    /// Look up the board cell at `coord`.
    #[must_use]
    pub fn cell_at(&self, coord: Coord) -> Option<CellId> {
        if coord.col >= self.shape.cols || coord.row >= self.shape.rows {
            return None;
        }
        self.index[usize::from(coord.row) * usize::from(self.shape.cols) + usize::from(coord.col)]
    }

    /// Look up a reserve cell.
    #[must_use]
    pub fn reserve(&self, reserve: u8) -> Option<CellId> {
        (reserve < self.shape.reserves).then(|| CellId((self.board_cells + usize::from(reserve)) as u32))
    }

    /// Cell id for a location, if this grid has it.
    #[must_use]
    pub fn locate(&self, location: Location) -> Option<CellId> {
        match location {
            Location::Board(coord) => self.cell_at(coord),
            Location::Reserve(reserve) => self.reserve(reserve),
        }
    }

    /// Neighbour of `cell` in `direction`.
    #[must_use]
    pub fn neighbor(&self, cell: CellId, direction: super::Direction) -> Option<CellId> {
        self.cell(cell).neighbor(direction)
    }

    /// Every cell, board cells first.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Board cells in row-major order.
    pub fn board_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells[..self.board_cells].iter()
    }

    /// Reserve cells in index order.
    pub fn reserves(&self) -> impl Iterator<Item = &Cell> {
        self.cells[self.board_cells..].iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Put a chip on top of a cell. Only for setting up a position.
    pub fn add_chip(&mut self, cell: CellId, chip: ChipId) {
        self.cells[cell.index()].push(chip);
    }

    /// Empty every cell and reset stamps, keeping the topology.
    pub fn clear_contents(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.sweep_generation.set(0);
    }

    /// Start a new sweep generation. Cells marked in earlier sweeps read as
    /// unmarked.
    pub fn new_sweep(&self) -> u32 {
        let next = self.sweep_generation.get().wrapping_add(1).max(1);
        self.sweep_generation.set(next);
        next
    }

    /// Collect the connected group of cells around `start` that satisfy
    /// `include`. Returns an empty group if `start` itself is excluded.
    pub fn flood<F>(&self, start: CellId, include: F) -> Vec<CellId>
    where
        F: Fn(&Cell) -> bool,
    {
        let generation = self.new_sweep();
        let mut group = Vec::new();
        if !include(self.cell(start)) {
            return group;
        }

        let geometry = self.shape.geometry;
        let mut pending = vec![start];
        self.cell(start).mark_sweep(generation);

        while let Some(id) = pending.pop() {
            group.push(id);
            for direction in geometry.directions() {
                let Some(next) = self.neighbor(id, direction) else { continue };
                let cell = self.cell(next);
                if cell.sweep() != generation && include(cell) {
                    cell.mark_sweep(generation);
                    pending.push(next);
                }
            }
        }
        group
    }

    /// Same shape and the same contents in every cell.
    #[must_use]
    pub fn same_contents(&self, other: &Grid) -> bool {
        self.shape == other.shape
            && self.cells.len() == other.cells.len()
            && self.cells.iter().zip(&other.cells).all(|(a, b)| a.same_contents(b))
    }
}

//! Cells: addressable board positions and off-board reserves.
//!
//! A cell never owns another cell. Neighbours are `CellId`s into the grid
//! arena, resolved once when the grid is built.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::geometry::{Direction, MAX_DIRECTIONS};
use crate::core::DigestRng;
use crate::pieces::{ChipId, ChipRegistry};

/// Index of a cell in its grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u32);

impl CellId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Zero-based board coordinate. Displays as `A1` style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub col: u8,
    pub row: u8,
}

impl Coord {
    /// Create a coordinate from zero-based column and row.
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Column label: `A` to `Z`, then `AA`, `AB` and so on up to `IV`.
    #[must_use]
    pub fn col_label(self) -> String {
        let mut n = u32::from(self.col) + 1;
        let mut letters = Vec::with_capacity(2);
        while n > 0 {
            n -= 1;
            letters.push(char::from(b'A' + (n % 26) as u8));
            n /= 26;
        }
        letters.iter().rev().collect()
    }

    /// Parse a column label written by [`Coord::col_label`], in either case.
    #[must_use]
    pub fn parse_col_label(label: &str) -> Option<u8> {
        if label.is_empty() || label.len() > 2 {
            return None;
        }
        let mut n = 0u32;
        for c in label.chars() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            n = n * 26 + u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
        }
        u8::try_from(n - 1).ok()
    }

    /// Parse a label like `C4` or `AB12`.
    ///
    /// ```
    /// use tabletop::topology::Coord;
    ///
    /// assert_eq!(Coord::from_label("C4"), Some(Coord::new(2, 3)));
    /// assert_eq!(Coord::from_label("AB12"), Some(Coord::new(27, 11)));
    /// assert_eq!(Coord::from_label("4C"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let split = label.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = label.split_at(split);
        let col = Self::parse_col_label(letters)?;
        match digits.parse::<u16>() {
            Ok(row @ 1..=256) => Some(Self::new(col, (row - 1) as u8)),
            _ => None,
        }
    }

    /// Step by a signed offset, or `None` if it would go below zero.
    #[must_use]
    pub fn offset(self, dcol: i16, drow: i16) -> Option<Self> {
        let col = i16::from(self.col) + dcol;
        let row = i16::from(self.row) + drow;
        if !(0..=i16::from(u8::MAX)).contains(&col) || !(0..=i16::from(u8::MAX)).contains(&row) {
            return None;
        }
        Some(Self::new(col as u8, row as u8))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.col_label(), u32::from(self.row) + 1)
    }
}

/// Where a cell lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// A cell of the playing area.
    Board(Coord),
    /// An off-board pool of chips (a player's rack).
    Reserve(u8),
}

/// One cell of a grid.
#[derive(Clone, Debug)]
pub struct Cell {
    id: CellId,
    location: Location,
    neighbors: [Option<CellId>; MAX_DIRECTIONS],
    stack: SmallVec<[ChipId; 4]>,
    last_picked: Option<u32>,
    last_dropped: Option<u32>,
    // Transient flood-fill marker; never digested or compared.
    sweep: std::cell::Cell<u32>,
}

impl Cell {
    pub(crate) fn new(id: CellId, location: Location) -> Self {
        Self {
            id,
            location,
            neighbors: [None; MAX_DIRECTIONS],
            stack: SmallVec::new(),
            last_picked: None,
            last_dropped: None,
            sweep: std::cell::Cell::new(0),
        }
    }

    #[must_use]
    pub fn id(&self) -> CellId {
        self.id
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Board coordinate, `None` for reserve cells.
    #[must_use]
    pub fn coord(&self) -> Option<Coord> {
        match self.location {
            Location::Board(coord) => Some(coord),
            Location::Reserve(_) => None,
        }
    }

    #[must_use]
    pub fn is_on_board(&self) -> bool {
        matches!(self.location, Location::Board(_))
    }

    /// Neighbour in `direction`, resolved at construction.
    #[must_use]
    pub fn neighbor(&self, direction: Direction) -> Option<CellId> {
        self.neighbors.get(direction.index()).copied().flatten()
    }

    /// Chips from bottom to top.
    #[must_use]
    pub fn chips(&self) -> &[ChipId] {
        &self.stack
    }

    #[must_use]
    pub fn top(&self) -> Option<ChipId> {
        self.stack.last().copied()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Move number at which a chip was last picked from this cell.
    #[must_use]
    pub fn last_picked(&self) -> Option<u32> {
        self.last_picked
    }

    /// Move number at which a chip was last dropped on this cell.
    #[must_use]
    pub fn last_dropped(&self) -> Option<u32> {
        self.last_dropped
    }

    /// Digest of the cell contents and stamps.
    ///
    /// Each height is keyed by its own word of the cell's stream, so the
    /// same chips in a different order hash differently.
    #[must_use]
    pub fn hash_contribution(&self, registry: &ChipRegistry, seed: u64) -> u64 {
        self.occupancy_contribution(registry, seed) ^ self.stamp_contribution(seed)
    }

    /// Digest of the chips alone, used for repetition detection.
    #[must_use]
    pub fn occupancy_contribution(&self, registry: &ChipRegistry, seed: u64) -> u64 {
        let lane = u64::from(self.id.0);
        self.stack
            .iter()
            .enumerate()
            .fold(0u64, |acc, (height, &chip)| {
                let key = DigestRng::salt(seed, lane, 2 + height as u64) | 1;
                acc ^ registry.salt(chip).wrapping_mul(key)
            })
    }

    fn stamp_contribution(&self, seed: u64) -> u64 {
        let lane = u64::from(self.id.0);
        let mut v = 0;
        if let Some(n) = self.last_picked {
            v ^= DigestRng::salt(seed, lane, 0).wrapping_mul(u64::from(n) + 1);
        }
        if let Some(n) = self.last_dropped {
            v ^= DigestRng::salt(seed, lane, 1).wrapping_mul(u64::from(n) + 1);
        }
        v
    }

    // === Mutation (grid and board only) ===

    pub(crate) fn set_neighbor(&mut self, direction: Direction, neighbor: Option<CellId>) {
        self.neighbors[direction.index()] = neighbor;
    }

    pub(crate) fn push(&mut self, chip: ChipId) {
        self.stack.push(chip);
    }

    pub(crate) fn pop(&mut self) -> Option<ChipId> {
        self.stack.pop()
    }

    pub(crate) fn take_all(&mut self) -> SmallVec<[ChipId; 4]> {
        std::mem::take(&mut self.stack)
    }

    /// Stamp `last_picked`, returning the stamp it replaced.
    pub(crate) fn stamp_picked(&mut self, stamp: Option<u32>) -> Option<u32> {
        std::mem::replace(&mut self.last_picked, stamp)
    }

    /// Stamp `last_dropped`, returning the stamp it replaced.
    pub(crate) fn stamp_dropped(&mut self, stamp: Option<u32>) -> Option<u32> {
        std::mem::replace(&mut self.last_dropped, stamp)
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
        self.last_picked = None;
        self.last_dropped = None;
        self.sweep.set(0);
    }

    pub(crate) fn sweep(&self) -> u32 {
        self.sweep.get()
    }

    pub(crate) fn mark_sweep(&self, generation: u32) {
        self.sweep.set(generation);
    }

    /// Same chips and stamps. Topology is compared by the grid.
    pub(crate) fn same_contents(&self, other: &Cell) -> bool {
        self.id == other.id
            && self.location == other.location
            && self.stack == other.stack
            && self.last_picked == other.last_picked
            && self.last_dropped == other.last_dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_display_and_label() {
        let c = Coord::new(0, 0);
        assert_eq!(c.to_string(), "A1");
        assert_eq!(Coord::from_label("a1"), Some(c));
        assert_eq!(Coord::from_label("B10"), Some(Coord::new(1, 9)));
        assert_eq!(Coord::from_label("B0"), None);
        assert_eq!(Coord::from_label(""), None);
    }

    #[test]
    fn test_wide_column_labels() {
        assert_eq!(Coord::new(25, 0).col_label(), "Z");
        assert_eq!(Coord::new(26, 0).col_label(), "AA");
        assert_eq!(Coord::new(255, 255).to_string(), "IV256");
        assert_eq!(Coord::from_label("iv256"), Some(Coord::new(255, 255)));
        assert_eq!(Coord::parse_col_label("IW"), None);
        assert_eq!(Coord::parse_col_label("AAA"), None);
        for col in 0..=u8::MAX {
            let c = Coord::new(col, 0);
            assert_eq!(Coord::parse_col_label(&c.col_label()), Some(col));
        }
    }

    #[test]
    fn test_coord_offset_bounds() {
        assert_eq!(Coord::new(0, 0).offset(-1, 0), None);
        assert_eq!(Coord::new(2, 2).offset(1, -1), Some(Coord::new(3, 1)));
    }

    #[test]
    fn test_stamps_return_previous() {
        let mut cell = Cell::new(CellId(0), Location::Board(Coord::new(0, 0)));
        assert_eq!(cell.stamp_picked(Some(4)), None);
        assert_eq!(cell.stamp_picked(Some(9)), Some(4));
        assert_eq!(cell.last_picked(), Some(9));
    }

    #[test]
    fn test_push_pop_take() {
        let mut cell = Cell::new(CellId(3), Location::Reserve(0));
        cell.push(ChipId(1));
        cell.push(ChipId(2));
        assert_eq!(cell.top(), Some(ChipId(2)));
        assert_eq!(cell.height(), 2);
        assert_eq!(cell.pop(), Some(ChipId(2)));
        let rest = cell.take_all();
        assert_eq!(rest.as_slice(), &[ChipId(1)]);
        assert!(cell.is_empty());
        assert!(!cell.is_on_board());
    }
}

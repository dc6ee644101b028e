//! # tabletop
//!
//! A turn-based board game engine with exactly reversible moves.
//!
//! ## Design Principles
//!
//! 1. **Reversible**: Every pick, drop and robot move has an exact inverse.
//!    Undo, search backtracking and replay verification all rely on it.
//!
//! 2. **Reproducible digests**: A board hashes to the same 64-bit value on
//!    every machine, for every run, whatever path led to it.
//!
//! 3. **Tentative vs committed**: A half-built move lives on the transaction
//!    stacks until `done`, and can always be taken back.
//!
//! ## Architecture
//!
//! - **Explicit state machine**: Each opcode checks an allow-list of states
//!   before it mutates anything. Illegal moves panic; malformed text is a
//!   recoverable `ParseError`.
//!
//! - **Arena of cells**: Cells refer to their neighbours by index, so a board
//!   clone is a plain structural copy.
//!
//! - **Rules as a trait**: The board owns the mechanics; a `Rules`
//!   implementation supplies the game.
//!
//! ## Modules
//!
//! - `core`: Players, moves and move text, init strings, config, RNG, errors
//! - `topology`: Geometries, coordinates, cells and the grid arena
//! - `pieces`: Chips and the chip registry
//! - `state`: The board state machine
//! - `rules`: The `Rules` trait
//! - `board`: Transactions, execute, robot make/unmake, digests, history
//! - `search`: `SearchAdapter` for tree-search drivers, perft, playouts
//! - `record`: Stored game records and replay verification
//! - `games`: Bundled Breakthrough and Hex rules

pub mod board;
pub mod core;
pub mod games;
pub mod pieces;
pub mod record;
pub mod rules;
pub mod search;
pub mod state;
pub mod topology;

// Re-export commonly used types
pub use crate::core::{
    BoardConfig, DigestRng, InitError, InitSpec, Move, MoveKind, Opcode, ParseError,
    ParseResult, PlayerId, PlayerMap, RecordError,
};

pub use crate::topology::{BoardShape, Cell, CellId, CellMask, Coord, Direction, Geometry, Grid, Location};

pub use crate::pieces::{Chip, ChipId, ChipKind, ChipRegistry};

pub use crate::state::{BoardState, StateRole};

pub use crate::rules::{DropEffect, GameResult, Rules};

pub use crate::board::{Board, MoveLog, ReplayMode};

pub use crate::search::{check_inverse, perft, random_playout, Playout, SearchAdapter, WalkStats};

pub use crate::record::GameRecord;

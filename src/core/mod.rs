//! Core engine types: players, moves, deterministic RNG, init strings, errors.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games configure the engine through `InitSpec` and their `Rules`, never by
//! modifying the core.

pub mod error;
pub mod init;
pub mod moves;
pub mod player;
pub mod rng;

pub use error::{InitError, ParseError, ParseResult, RecordError};
pub use init::{BoardConfig, InitSpec};
pub use moves::{Move, MoveKind, Opcode};
pub use player::{PlayerId, PlayerMap};
pub use rng::DigestRng;

//! Rules trait for game implementations.
//!
//! Games implement `Rules` to define:
//! - Legal picks, drops and complete moves
//! - What a drop does to the destination
//! - Turn-start states and win conditions
//!
//! The board calls into `Rules` but never interprets game-specific
//! concepts directly.

pub mod engine;

pub use engine::{DropEffect, GameResult, Rules};

//! Rules trait for game implementations.
//!
//! The board owns the mechanics (transactions, undo, digests, the state
//! machine). A `Rules` value supplies everything game specific:
//! - Which init strings it accepts and the board shape they produce
//! - The starting position
//! - Which picks and drops are legal, and what a drop does
//! - Which state the next player starts in, and when the game is over
//! - Move generation and a static evaluation for search

use std::sync::Arc;

use crate::board::Board;
use crate::core::{InitError, InitSpec, Move, PlayerId};
use crate::pieces::{ChipId, ChipRegistry};
use crate::state::BoardState;
use crate::topology::{BoardShape, CellId, Grid};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (everyone but a resigning player, in multi-player games).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }

    /// Build a result from a list of winners.
    #[must_use]
    pub fn from_winners(mut winners: Vec<PlayerId>) -> Self {
        match winners.len() {
            0 => GameResult::Draw,
            1 => GameResult::Winner(winners.remove(0)),
            _ => GameResult::Winners(winners),
        }
    }
}

/// What dropping a chip on an occupied or empty cell does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropEffect {
    /// The cell must be empty.
    Place,
    /// Add the chip on top of whatever is there.
    Stack,
    /// Remove the whole stack to the mover's captured pile, then place.
    Capture,
}

/// Rules trait.
///
/// Implementations must be deterministic: the same board must always yield
/// the same answers, or replay and search will diverge.
///
/// ## Implementation Notes
///
/// - `check`: Reject init strings for other games before anything is built
/// - `legal_drop`: Called both for two-step gestures and for combined moves,
///   before anything is mutated
/// - `outcome`: Called after each committed move, before the turn passes
/// - `legal_moves`: Must never return a move the board would reject
pub trait Rules: Clone + Sized {
    /// Canonical game name.
    fn name(&self) -> &str;

    /// Accept or reject an init string.
    fn check(&self, init: &InitSpec) -> Result<(), InitError>;

    /// The shared chip registry.
    fn registry(&self) -> &Arc<ChipRegistry>;

    /// Board shape for an accepted init string.
    fn shape(&self, init: &InitSpec) -> BoardShape;

    /// Place the starting chips on an empty grid.
    fn setup(&self, grid: &mut Grid, init: &InitSpec);

    /// May the player on turn pick the top chip of `cell`?
    fn can_pick(&self, board: &Board<Self>, cell: CellId) -> bool;

    /// May `chip`, lifted from `from`, be dropped on `to`?
    fn legal_drop(&self, board: &Board<Self>, chip: ChipId, from: CellId, to: CellId) -> bool;

    /// What a legal drop does to the destination's contents.
    fn drop_effect(&self, board: &Board<Self>, _chip: ChipId, to: CellId) -> DropEffect {
        if board.grid().cell(to).is_empty() {
            DropEffect::Place
        } else {
            DropEffect::Capture
        }
    }

    /// State for the player whose turn just started.
    fn state_after_done(&self, board: &Board<Self>) -> BoardState;

    /// Returns `Some(result)` if the move just made ended the game.
    fn outcome(&self, board: &Board<Self>) -> Option<GameResult>;

    /// Every complete move for the player on turn.
    fn legal_moves(&self, board: &Board<Self>) -> Vec<Move>;

    /// Heuristic value of the position for `player`, higher is better.
    fn static_evaluate(&self, board: &Board<Self>, player: PlayerId) -> f64;

    /// Number of times a position may occur before the game is drawn.
    fn repetition_limit(&self) -> Option<u32> {
        None
    }

    /// Digest of any game state the board does not know about.
    fn aux_digest(&self, _board: &Board<Self>) -> u64 {
        0
    }
}

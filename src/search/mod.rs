//! Search adapter for external tree-search drivers.
//!
//! ## Overview
//!
//! A driver (alpha-beta, UCT, ...) needs four things from a game: the moves
//! available, a way to make one, a way to take it back, and a score for a
//! position. `SearchAdapter` is that contract. Every `Board<R: Rules>`
//! implements it through `robot_execute` / `robot_unexecute`, so a single
//! board serves a whole search tree without cloning.
//!
//! ## Usage
//!
//! ```rust
//! use tabletop::board::{Board, ReplayMode};
//! use tabletop::games::Breakthrough;
//! use tabletop::search::{perft, SearchAdapter};
//!
//! let mut board = Board::new(Breakthrough::new(), "breakthrough 2 1 100").unwrap();
//! let start = board.parse_move("start P0").unwrap();
//! board.execute(&start, ReplayMode::Live);
//!
//! assert_eq!(perft(&mut board, 1), 22);
//! let before = board.digest();
//! for m in SearchAdapter::legal_moves(&board) {
//!     board.make_move(&m);
//!     board.unmake_move(&m);
//! }
//! assert_eq!(board.digest(), before);
//! ```

pub mod perft;
pub mod stats;

pub use perft::{check_inverse, perft, random_playout, Playout};
pub use stats::WalkStats;

use crate::board::Board;
use crate::core::{Move, PlayerId};
use crate::rules::{GameResult, Rules};

/// Make/unmake contract consumed by search drivers.
///
/// `legal_moves` must never return a move `make_move` would reject, and
/// `unmake_move` must restore a position digest-equal to the one before the
/// matching `make_move`. Unmakes happen in strict reverse order.
pub trait SearchAdapter {
    type Move: Clone + std::fmt::Debug;

    /// The player to move.
    fn current_player(&self) -> PlayerId;

    /// Every complete move for the player to move. Empty when the game is
    /// over.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn make_move(&mut self, m: &Self::Move);

    fn unmake_move(&mut self, m: &Self::Move);

    /// Heuristic value for `player`, higher is better.
    fn static_evaluate(&self, player: PlayerId) -> f64;

    /// `Some` once the game is over.
    fn outcome(&self) -> Option<GameResult>;

    fn digest(&self) -> u64;
}

impl<R: Rules> SearchAdapter for Board<R> {
    type Move = Move;

    fn current_player(&self) -> PlayerId {
        self.whose_turn()
    }

    fn legal_moves(&self) -> Vec<Move> {
        Board::legal_moves(self)
    }

    fn make_move(&mut self, m: &Move) {
        self.robot_execute(m);
    }

    fn unmake_move(&mut self, m: &Move) {
        self.robot_unexecute(m);
    }

    fn static_evaluate(&self, player: PlayerId) -> f64 {
        self.rules().static_evaluate(self, player)
    }

    fn outcome(&self) -> Option<GameResult> {
        Board::outcome(self)
    }

    fn digest(&self) -> u64 {
        Board::digest(self)
    }
}

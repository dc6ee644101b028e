//! The board state machine.
//!
//! Every board is in exactly one `BoardState`. Operations consult the
//! current state before touching anything, and the metadata table below is
//! the single place that says what each state means.
//!
//! ```
//! use tabletop::state::{BoardState, StateRole};
//!
//! assert_eq!(BoardState::Confirm.role(), StateRole::Confirm);
//! assert!(BoardState::Confirm.is_done_state());
//! assert!(!BoardState::Play.is_done_state());
//! assert!(BoardState::Gameover.is_terminal());
//! ```

use serde::{Deserialize, Serialize};

/// What kind of input a state is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateRole {
    /// Free editing of the position.
    Setup,
    /// The player on turn must act.
    Active,
    /// A complete move is waiting for `done`.
    Confirm,
    /// The game has ended.
    Terminal,
}

/// Board states shared by every game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardState {
    Puzzle,
    Play,
    PlayOrPass,
    PlayOrSwap,
    Pass,
    Confirm,
    ConfirmSwap,
    Resign,
    Gameover,
}

/// Static metadata for one state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateInfo {
    pub description: &'static str,
    pub role: StateRole,
    /// `done` is legal.
    pub done: bool,
    /// Positions in this state are recorded for repetition and fraud
    /// checks.
    pub digest: bool,
}

const fn info(description: &'static str, role: StateRole, done: bool, digest: bool) -> StateInfo {
    StateInfo {
        description,
        role,
        done,
        digest,
    }
}

// Indexed by `BoardState::ordinal`.
static STATE_INFO: [StateInfo; 9] = [
    info("Rearrange the board as desired", StateRole::Setup, false, false),
    info("Make a move", StateRole::Active, false, false),
    info("Make a move or pass", StateRole::Active, false, false),
    info("Make a move or swap colors", StateRole::Active, false, false),
    info("No moves available, you must pass", StateRole::Active, true, false),
    info("Click on Done to confirm your move", StateRole::Confirm, true, true),
    info("Click on Done to confirm swapping colors", StateRole::Confirm, true, true),
    info("Click on Done to confirm your resignation", StateRole::Confirm, true, true),
    info("Game over", StateRole::Terminal, false, false),
];

impl BoardState {
    /// Every state in ordinal order.
    pub const ALL: [BoardState; 9] = [
        BoardState::Puzzle,
        BoardState::Play,
        BoardState::PlayOrPass,
        BoardState::PlayOrSwap,
        BoardState::Pass,
        BoardState::Confirm,
        BoardState::ConfirmSwap,
        BoardState::Resign,
        BoardState::Gameover,
    ];

    /// Stable position in `ALL`. Part of the digest, never reorder.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn info(self) -> &'static StateInfo {
        &STATE_INFO[self.ordinal()]
    }

    #[must_use]
    pub fn role(self) -> StateRole {
        self.info().role
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// True if `done` may be executed.
    #[must_use]
    pub fn is_done_state(self) -> bool {
        self.info().done
    }

    #[must_use]
    pub fn is_digest_state(self) -> bool {
        self.info().digest
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.role() == StateRole::Terminal
    }

    /// The player on turn may start a move by picking.
    #[must_use]
    pub fn can_move(self) -> bool {
        matches!(
            self,
            BoardState::Play | BoardState::PlayOrPass | BoardState::PlayOrSwap
        )
    }

    #[must_use]
    pub fn can_pass(self) -> bool {
        matches!(self, BoardState::PlayOrPass | BoardState::Pass)
    }

    #[must_use]
    pub fn can_resign(self) -> bool {
        !matches!(self, BoardState::Puzzle | BoardState::Gameover)
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

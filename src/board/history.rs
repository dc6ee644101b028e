//! Move history.
//!
//! Backed by a persistent `im::Vector`, so cloning a board for search shares
//! the history instead of copying it.

use crate::core::Move;

/// Executed moves in order, with the start of the current turn marked.
///
/// A gesture that cancels itself out (pick a chip, put it back) leaves the
/// board exactly where the turn started. Those moves add nothing to a game
/// record, so they are pruned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveLog {
    moves: im::Vector<Move>,
    turn_start: usize,
    turn_start_digest: u64,
}

impl MoveLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, m: Move) {
        self.moves.push_back(m);
    }

    /// Remember the current length and digest as the start of a turn.
    pub(crate) fn mark_turn_start(&mut self, digest: u64) {
        self.turn_start = self.moves.len();
        self.turn_start_digest = digest;
    }

    /// Drop the moves of the current turn if `digest` shows they cancelled
    /// out. Returns true if anything was removed.
    pub(crate) fn prune_cancelled(&mut self, digest: u64) -> bool {
        if self.moves.len() > self.turn_start && digest == self.turn_start_digest {
            self.moves.truncate(self.turn_start);
            true
        } else {
            false
        }
    }

    /// Length of the log when the current turn started.
    #[must_use]
    pub fn turn_start(&self) -> usize {
        self.turn_start
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    /// Move text lines, numbered from 1 when a move has no index of its own.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.moves
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let numbered = match m.index {
                    Some(_) => *m,
                    None => m.with_index(i as u32 + 1),
                };
                numbered.to_string()
            })
            .collect()
    }
}

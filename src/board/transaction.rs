//! Tentative moves: pick, drop and their exact inverses.
//!
//! Every pick or drop pushes one entry on each of three parallel stacks
//! (source, destination, prior state). Every undo pops one entry from each.
//! The stacks therefore always have equal depth, and depth zero means there
//! is no tentative move.

use smallvec::SmallVec;

use super::Board;
use crate::core::error::fatal;
use crate::core::PlayerId;
use crate::pieces::ChipId;
use crate::rules::{DropEffect, Rules};
use crate::state::BoardState;
use crate::topology::CellId;

/// What a step overwrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PriorState {
    pub state: BoardState,
    /// The stamp (`last_picked` or `last_dropped`) this step replaced.
    pub stamp: Option<u32>,
    /// Chips removed from the destination by a capturing drop.
    pub captured: SmallVec<[ChipId; 4]>,
    pub capturer: PlayerId,
}

/// One popped entry of the transaction stacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TxStep {
    pub source: Option<CellId>,
    pub dest: Option<CellId>,
    pub prior: PriorState,
}

impl<R: Rules> Board<R> {
    /// Depth of the transaction stacks.
    #[must_use]
    pub fn tentative_depth(&self) -> usize {
        self.assert_balanced();
        self.priors.len()
    }

    /// True if a move is in progress: a chip in hand or uncommitted steps.
    #[must_use]
    pub fn has_tentative(&self) -> bool {
        self.picked.is_some() || self.tentative_depth() > 0
    }

    fn assert_balanced(&self) {
        let (s, d, p) = (self.sources.len(), self.dests.len(), self.priors.len());
        if s != d || d != p {
            fatal!("transaction stacks unbalanced: {} {} {}", s, d, p);
        }
    }

    fn prior(&self, stamp: Option<u32>) -> PriorState {
        PriorState {
            state: self.state,
            stamp,
            captured: SmallVec::new(),
            capturer: self.whose_turn,
        }
    }

    /// Adjust per-player occupancy for a chip entering or leaving `cell`.
    fn count(&mut self, cell: CellId, chip: ChipId, entering: bool) {
        if !self.grid.cell(cell).is_on_board() {
            return;
        }
        let Some(owner) = self.registry.owner(chip) else { return };
        if owner.index() >= self.on_board.player_count() {
            return;
        }
        let count = &mut self.on_board[owner];
        if entering {
            *count += 1;
        } else {
            *count = count.saturating_sub(1);
        }
    }

    /// Lift the top chip of `cell` into the hand.
    ///
    /// Panics if a chip is already in hand or the cell is empty.
    pub fn pick(&mut self, cell: CellId) -> ChipId {
        self.assert_balanced();
        if let Some(chip) = self.picked {
            fatal!("pick from {:?} while {} is already in hand", cell, chip);
        }
        let Some(chip) = self.grid.cell_mut(cell).pop() else {
            fatal!("pick from empty cell {:?}", cell);
        };

        let stamp = self.grid.cell_mut(cell).stamp_picked(Some(self.move_number));
        let prior = self.prior(stamp);
        self.sources.push(Some(cell));
        self.dests.push(None);
        self.priors.push(prior);

        self.count(cell, chip, false);
        self.picked = Some(chip);
        tracing::trace!(?cell, %chip, "pick");
        chip
    }

    /// Drop the chip in hand on `cell`, with the effect the rules choose.
    ///
    /// Reserves always stack, and so does every drop while editing.
    pub fn drop(&mut self, cell: CellId) {
        let Some(chip) = self.picked else {
            fatal!("drop on {:?} with nothing in hand", cell);
        };
        let effect = if self.state == BoardState::Puzzle || !self.grid.cell(cell).is_on_board() {
            DropEffect::Stack
        } else {
            self.rules.drop_effect(self, chip, cell)
        };
        self.drop_with(cell, effect);
    }

    pub(crate) fn drop_with(&mut self, cell: CellId, effect: DropEffect) {
        self.assert_balanced();
        let Some(chip) = self.picked else {
            fatal!("drop on {:?} with nothing in hand", cell);
        };

        let captured: SmallVec<[ChipId; 4]> = match effect {
            DropEffect::Place if !self.grid.cell(cell).is_empty() => {
                fatal!("place {} on occupied cell {:?}", chip, cell)
            }
            DropEffect::Place | DropEffect::Stack => SmallVec::new(),
            DropEffect::Capture => self.grid.cell_mut(cell).take_all(),
        };
        for &victim in &captured {
            self.count(cell, victim, false);
        }
        let capturer = self.whose_turn;
        self.captured[capturer].extend(captured.iter().copied());

        let stamp = self.grid.cell_mut(cell).stamp_dropped(Some(self.move_number));
        let mut prior = self.prior(stamp);
        prior.captured = captured;
        prior.capturer = capturer;

        let source = self.sources.iter().rev().find_map(|s| *s);
        self.sources.push(None);
        self.dests.push(Some(cell));
        self.priors.push(prior);

        self.grid.cell_mut(cell).push(chip);
        self.count(cell, chip, true);
        self.picked = None;

        if self.config.animate {
            if let Some(source) = source.filter(|&s| s != cell) {
                self.animations.push((source, cell));
            }
        }
        tracing::trace!(?cell, %chip, ?effect, "drop");
    }

    /// Undo the most recent pick, returning the chip in hand to its cell.
    pub fn unpick(&mut self) {
        self.assert_balanced();
        let (Some(source), Some(None)) = (self.sources.pop().flatten(), self.dests.pop()) else {
            fatal!("unpick without a pick on top of the transaction stacks");
        };
        let Some(prior) = self.priors.pop() else {
            fatal!("unpick with an empty prior-state stack");
        };
        let Some(chip) = self.picked.take() else {
            fatal!("unpick with nothing in hand");
        };

        let cell = self.grid.cell_mut(source);
        cell.push(chip);
        cell.stamp_picked(prior.stamp);
        self.count(source, chip, true);
        self.state = prior.state;
        tracing::trace!(cell = ?source, %chip, "unpick");
    }

    /// Undo the most recent drop, putting the chip back in hand and
    /// restoring anything it captured.
    pub fn undrop(&mut self) {
        self.assert_balanced();
        let (Some(None), Some(dest)) = (self.sources.pop(), self.dests.pop().flatten()) else {
            fatal!("undrop without a drop on top of the transaction stacks");
        };
        let Some(prior) = self.priors.pop() else {
            fatal!("undrop with an empty prior-state stack");
        };
        if let Some(chip) = self.picked {
            fatal!("undrop while {} is in hand", chip);
        }

        let Some(chip) = self.grid.cell_mut(dest).pop() else {
            fatal!("undrop from empty cell {:?}", dest);
        };
        self.count(dest, chip, false);

        let pile = &mut self.captured[prior.capturer];
        pile.truncate(pile.len().saturating_sub(prior.captured.len()));
        for &victim in &prior.captured {
            self.grid.cell_mut(dest).push(victim);
            self.count(dest, victim, true);
        }

        self.grid.cell_mut(dest).stamp_dropped(prior.stamp);
        self.picked = Some(chip);
        self.state = prior.state;
        tracing::trace!(cell = ?dest, %chip, "undrop");
    }

    /// Commit the tentative move.
    pub fn accept(&mut self) {
        if let Some(chip) = self.picked {
            fatal!("accept while {} is in hand", chip);
        }
        self.sources.clear();
        self.dests.clear();
        self.priors.clear();
    }

    /// Undo every tentative step, newest first.
    pub(crate) fn unwind(&mut self) {
        while self.tentative_depth() > 0 {
            if self.last_drop().is_some() {
                self.undrop();
            } else {
                self.unpick();
            }
        }
    }

    /// Take the tentative steps off the stacks, oldest first.
    pub(crate) fn drain_steps(&mut self) -> Vec<TxStep> {
        self.assert_balanced();
        let sources = std::mem::take(&mut self.sources);
        let dests = std::mem::take(&mut self.dests);
        let priors = std::mem::take(&mut self.priors);
        sources
            .into_iter()
            .zip(dests)
            .zip(priors)
            .map(|((source, dest), prior)| TxStep { source, dest, prior })
            .collect()
    }

    /// Push previously drained steps back onto the stacks.
    pub(crate) fn restore_steps(&mut self, steps: Vec<TxStep>) {
        for step in steps {
            self.sources.push(step.source);
            self.dests.push(step.dest);
            self.priors.push(step.prior);
        }
        self.assert_balanced();
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, ReplayMode};
    use crate::core::{Move, MoveKind, PlayerId};
    use crate::games::Breakthrough;
    use crate::state::BoardState;
    use crate::topology::Coord;

    fn started() -> Board<Breakthrough> {
        let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
        board.execute(&Move::new(PlayerId::new(0), MoveKind::Start), ReplayMode::Live);
        board
    }

    fn cell(board: &Board<Breakthrough>, label: &str) -> crate::topology::CellId {
        board.grid().cell_at(Coord::from_label(label).unwrap()).unwrap()
    }

    #[test]
    fn test_pick_then_unpick_restores() {
        let mut board = started();
        let before = board.digest();
        let a1 = cell(&board, "A1");

        board.pick(a1);
        assert_eq!(board.tentative_depth(), 1);
        assert!(board.grid().cell(a1).is_empty());
        assert_eq!(board.grid().cell(a1).last_picked(), Some(1));
        assert_eq!(board.on_board(PlayerId::new(0)), 7);

        board.unpick();
        assert_eq!(board.tentative_depth(), 0);
        assert_eq!(board.grid().cell(a1).last_picked(), None);
        assert_eq!(board.on_board(PlayerId::new(0)), 8);
        assert_eq!(board.digest(), before);
    }

    #[test]
    fn test_undrop_restores_previous_stamp() {
        let mut board = started();
        let (a1, b2) = (cell(&board, "A1"), cell(&board, "B2"));
        board.pick(a1);
        board.drop(b2);
        board.undrop();
        board.drop(b2);
        assert_eq!(board.grid().cell(b2).last_dropped(), Some(1));
        board.undrop();
        assert_eq!(board.grid().cell(b2).last_dropped(), None);
        board.unpick();
        assert_eq!(board.state(), BoardState::Play);
    }

    #[test]
    fn test_capture_is_restored_by_undrop() {
        let mut board = started();
        let (a1, b8) = (cell(&board, "A1"), cell(&board, "B8"));
        let before = board.digest();

        board.pick(a1);
        board.drop(b8);
        assert_eq!(board.captured(PlayerId::new(0)).len(), 1);
        assert_eq!(board.on_board(PlayerId::new(1)), 7);

        board.undrop();
        board.unpick();
        assert!(board.captured(PlayerId::new(0)).is_empty());
        assert_eq!(board.on_board(PlayerId::new(1)), 8);
        assert_eq!(board.digest(), before);
    }

    #[test]
    fn test_drop_records_animation() {
        let mut board = started();
        let (a1, b2) = (cell(&board, "A1"), cell(&board, "B2"));
        board.pick(a1);
        board.drop(b2);
        assert_eq!(board.take_animations(), vec![(a1, b2)]);
        assert!(board.take_animations().is_empty());
    }

    #[test]
    #[should_panic(expected = "already in hand")]
    fn test_double_pick_panics() {
        let mut board = started();
        let (a1, b1) = (cell(&board, "A1"), cell(&board, "B1"));
        board.pick(a1);
        board.pick(b1);
    }

    #[test]
    #[should_panic(expected = "nothing in hand")]
    fn test_drop_without_pick_panics() {
        let mut board = started();
        let b2 = cell(&board, "B2");
        board.drop(b2);
    }

    #[test]
    #[should_panic(expected = "unpick without a pick")]
    fn test_unpick_after_drop_panics() {
        let mut board = started();
        let (a1, b2) = (cell(&board, "A1"), cell(&board, "B2"));
        board.pick(a1);
        board.drop(b2);
        board.unpick();
    }

    #[test]
    fn test_unwind_and_drain() {
        let mut board = started();
        let before = board.digest();
        let (a1, b2) = (cell(&board, "A1"), cell(&board, "B2"));
        board.pick(a1);
        board.drop(b2);

        let steps = board.drain_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(board.tentative_depth(), 0);

        board.restore_steps(steps);
        board.unwind();
        assert_eq!(board.digest(), before);
    }
}

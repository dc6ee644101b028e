//! Move dispatch.
//!
//! `execute` is the only way moves reach the board, whether they come from
//! a viewer, a game record or the robot. Each opcode checks its allow-list
//! of states and its operands before the first mutation, so an illegal move
//! panics without leaving a half-applied board behind.

use serde::{Deserialize, Serialize};

use super::Board;
use crate::core::error::fatal;
use crate::core::{Move, MoveKind, PlayerId};
use crate::rules::{GameResult, Rules};
use crate::state::BoardState;
use crate::topology::{CellId, Location};

/// Where a move comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplayMode {
    /// A player acting now.
    Live,
    /// A stored game record. Animations are cleared per move, and the
    /// duplicated `done` and `swap` found in some old records are skipped
    /// instead of rejected.
    Replay,
}

impl<R: Rules> Board<R> {
    /// Execute one move.
    ///
    /// Panics if the opcode is not legal in the current state or an operand
    /// is illegal.
    pub fn execute(&mut self, m: &Move, mode: ReplayMode) {
        if mode == ReplayMode::Replay {
            self.animations.clear();
        }
        tracing::trace!(%m, state = ?self.state, "execute");

        let applied = match m.kind {
            MoveKind::Start => self.do_start(m),
            MoveKind::Edit => self.do_edit(),
            MoveKind::Done => self.do_done_move(m, mode),
            MoveKind::Pass => self.do_pass(m),
            MoveKind::Resign => self.do_resign(m),
            MoveKind::Swap => self.do_swap(m, mode),
            MoveKind::GameOverOnTime => self.do_game_over_on_time(m),
            MoveKind::PickBoard(coord) => self.do_pick(m, Location::Board(coord)),
            MoveKind::Pick(reserve) => self.do_pick(m, Location::Reserve(reserve)),
            MoveKind::DropBoard(coord) => self.do_drop(m, Location::Board(coord)),
            MoveKind::Drop(reserve) => self.do_drop(m, Location::Reserve(reserve)),
            MoveKind::Move { from, to } => self.do_move(m, Location::Board(from), to),
            MoveKind::Place { reserve, to } => self.do_move(m, Location::Reserve(reserve), to),
        };
        if !applied {
            return;
        }

        self.history.push(*m);
        match m.kind {
            MoveKind::Start | MoveKind::Edit | MoveKind::Done => {
                let digest = self.digest();
                self.history.mark_turn_start(digest);
            }
            // a forced pass leaves the digest alone but still belongs in the record
            MoveKind::Pass => {}
            _ if !self.has_tentative() && self.history.len() > self.history.turn_start() => {
                let digest = self.digest();
                if self.history.prune_cancelled(digest) {
                    tracing::trace!("cancelled gesture pruned from history");
                }
            }
            _ => {}
        }
    }

    fn require(&self, legal: bool, m: &Move) {
        if !legal {
            fatal!("{} is not legal in state {:?}", m, self.state);
        }
    }

    fn do_start(&mut self, m: &Move) -> bool {
        self.require(self.state != BoardState::Gameover, m);
        if m.player.index() >= self.player_count() {
            fatal!("{} names a player outside this game", m);
        }
        if self.picked.is_some() || self.tentative_depth() > 0 {
            self.unwind();
        }
        self.whose_turn = m.player;
        self.set_state(BoardState::Puzzle);
        match self.rules.outcome(self) {
            Some(result) => self.finish(result),
            None => {
                let next = self.rules.state_after_done(self);
                self.set_state(next);
            }
        }
        true
    }

    fn do_edit(&mut self) -> bool {
        if self.picked.is_some() {
            self.unpick();
        }
        self.accept();
        self.set_state(BoardState::Puzzle);
        true
    }

    fn do_done_move(&mut self, m: &Move, mode: ReplayMode) -> bool {
        if !self.state.is_done_state() {
            if mode == ReplayMode::Replay {
                tracing::warn!(%m, state = ?self.state, "skipping duplicate done in replay");
                return false;
            }
            self.require(false, m);
        }
        if self.picked.is_some() {
            fatal!("{} with a chip still in hand", m);
        }
        self.do_done();
        true
    }

    /// Commit the move in progress and pass the turn.
    pub(crate) fn do_done(&mut self) {
        let mover = self.whose_turn;
        let record = self.state.is_digest_state();
        self.accept();
        self.last_counted = None;

        if self.state == BoardState::Resign {
            let others = PlayerId::all(self.player_count()).filter(|&p| p != mover).collect();
            self.finish(GameResult::from_winners(others));
            return;
        }
        if let Some(result) = self.rules.outcome(self) {
            self.finish(result);
            return;
        }

        self.move_number += 1;
        self.whose_turn = mover.next(self.player_count());
        let next = self.rules.state_after_done(self);
        self.set_state(next);
        if record {
            self.count_repetition();
        }
    }

    fn count_repetition(&mut self) {
        let limit = match self.config.repetition_limit.or_else(|| self.rules.repetition_limit()) {
            Some(limit) if limit > 0 => limit,
            _ => return,
        };
        let key = self.position_digest();
        let seen = self.repetitions.entry(key).or_insert(0);
        *seen += 1;
        let seen = *seen;
        self.last_counted = Some(key);
        if seen >= limit {
            tracing::debug!(key, seen, "position repeated, game drawn");
            self.finish(GameResult::Draw);
        }
    }

    fn do_pass(&mut self, m: &Move) -> bool {
        self.require(self.state.can_pass() && !self.has_tentative(), m);
        self.set_state(BoardState::Pass);
        true
    }

    fn do_resign(&mut self, m: &Move) -> bool {
        self.require(self.state.can_resign(), m);
        // the chip in hand goes home first, or the following done has nothing to commit
        if self.picked.is_some() {
            self.unpick();
        }
        if self.state == BoardState::Resign {
            let previous = self.unresign.unwrap_or(BoardState::Play);
            self.set_state(previous);
        } else {
            self.set_state(BoardState::Resign);
        }
        true
    }

    fn do_swap(&mut self, m: &Move, mode: ReplayMode) -> bool {
        match self.state {
            BoardState::PlayOrSwap if !self.has_tentative() => {
                self.swapped = !self.swapped;
                self.set_state(BoardState::ConfirmSwap);
            }
            BoardState::ConfirmSwap => {
                self.swapped = !self.swapped;
                self.set_state(BoardState::PlayOrSwap);
            }
            _ if mode == ReplayMode::Replay => {
                tracing::warn!(%m, state = ?self.state, "skipping duplicate swap in replay");
                return false;
            }
            _ => self.require(false, m),
        }
        true
    }

    fn do_game_over_on_time(&mut self, m: &Move) -> bool {
        self.require(
            !matches!(self.state, BoardState::Puzzle | BoardState::Gameover),
            m,
        );
        if self.picked.is_some() || self.tentative_depth() > 0 {
            self.unwind();
        }
        self.finish(GameResult::Winner(self.whose_turn));
        true
    }

    fn do_pick(&mut self, m: &Move, location: Location) -> bool {
        let cell = self.cell_or_fatal(location, m);

        // Picking up the chip just dropped takes the drop back.
        if self.state == BoardState::Confirm && self.picked.is_none() && self.last_drop() == Some(cell) {
            self.undrop();
            return true;
        }

        let puzzle = self.state == BoardState::Puzzle;
        self.require(puzzle || self.state.can_move(), m);
        if self.picked.is_some() {
            fatal!("{} while a chip is already in hand", m);
        }
        if self.grid.cell(cell).is_empty() {
            fatal!("{} picks from an empty cell", m);
        }
        if !puzzle && !self.rules.can_pick(self, cell) {
            fatal!("{} picks a chip the player may not move", m);
        }
        self.pick(cell);
        true
    }

    fn do_drop(&mut self, m: &Move, location: Location) -> bool {
        let cell = self.cell_or_fatal(location, m);
        let puzzle = self.state == BoardState::Puzzle;
        self.require(puzzle || self.state.can_move(), m);
        let (Some(chip), Some(source)) = (self.picked, self.pick_source()) else {
            fatal!("{} with nothing in hand", m);
        };

        // Putting the chip back where it came from cancels the pick.
        if cell == source {
            self.unpick();
            return true;
        }

        if !puzzle && !self.rules.legal_drop(self, chip, source, cell) {
            fatal!("{} is not a legal destination", m);
        }
        self.drop(cell);
        self.after_drop();
        true
    }

    fn do_move(&mut self, m: &Move, from: Location, to: crate::topology::Coord) -> bool {
        self.require(self.state.can_move() && !self.has_tentative(), m);
        let from = self.cell_or_fatal(from, m);
        let to = self.cell_or_fatal(Location::Board(to), m);
        self.check_step(m, from, to);

        self.pick(from);
        self.drop(to);
        self.after_drop();
        true
    }

    fn check_step(&self, m: &Move, from: CellId, to: CellId) {
        let Some(chip) = self.grid.cell(from).top() else {
            fatal!("{} moves from an empty cell", m);
        };
        if from == to || !self.rules.can_pick(self, from) || !self.rules.legal_drop(self, chip, from, to) {
            fatal!("{} is not a legal move", m);
        }
    }

    fn after_drop(&mut self) {
        if self.state == BoardState::Puzzle {
            self.accept();
        } else {
            self.set_state(BoardState::Confirm);
        }
    }
}

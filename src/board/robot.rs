//! Make and unmake for search.
//!
//! A robot move is executed like a live move and then committed
//! immediately. Its transaction steps are moved off the board's stacks into
//! an undo record together with the scalars the move can change, so
//! `robot_unexecute` can pop the record, push the steps back and unwind
//! them. The undo records nest: any number of robot moves can be stacked
//! and unmade in reverse order.

use crate::core::error::fatal;
use crate::core::{Move, MoveKind, PlayerId, PlayerMap};
use crate::rules::Rules;
use crate::state::BoardState;
use crate::topology::CellId;

use super::execute::ReplayMode;
use super::history::MoveLog;
use super::transaction::TxStep;
use super::Board;

/// Everything needed to unmake one robot move.
#[derive(Clone, Debug)]
pub(crate) struct RobotUndo {
    mv: Move,
    state: BoardState,
    unresign: Option<BoardState>,
    whose_turn: PlayerId,
    move_number: u32,
    win: PlayerMap<bool>,
    swapped: bool,
    history: MoveLog,
    /// Repetition-table key this move incremented.
    counted: Option<u64>,
    steps: Vec<TxStep>,
    animations: Vec<(CellId, CellId)>,
    /// Digest before the move, when unmakes are verified.
    digest: Option<u64>,
}

impl<R: Rules> Board<R> {
    /// Make a complete move for search, committing it at once.
    ///
    /// Panics if it is not `m.player`'s turn or a move is in progress.
    pub fn robot_execute(&mut self, m: &Move) {
        if m.player != self.whose_turn {
            fatal!("robot move {} out of turn, {} to move", m, self.whose_turn);
        }
        if self.has_tentative() {
            fatal!("robot move {} with a move in progress", m);
        }

        let digest = self.config.verify_unmake.then(|| self.digest());
        let mut undo = RobotUndo {
            mv: *m,
            state: self.state,
            unresign: self.unresign,
            whose_turn: self.whose_turn,
            move_number: self.move_number,
            win: self.win.clone(),
            swapped: self.swapped,
            history: self.history.clone(),
            counted: None,
            steps: Vec::new(),
            animations: std::mem::take(&mut self.animations),
            digest,
        };

        self.execute(m, ReplayMode::Live);
        undo.steps = self.drain_steps();
        if m.kind != MoveKind::Done && self.state.is_done_state() {
            self.execute(&Move::done(m.player), ReplayMode::Live);
        } else if self.picked.is_some() {
            fatal!("robot move {} left a chip in hand", m);
        }
        undo.counted = self.last_counted.take();
        self.animations.clear();

        self.robot_stack.push(undo);
        tracing::trace!(%m, depth = self.robot_stack.len(), "robot execute");
    }

    /// Unmake the most recent robot move. `m` must be that move.
    pub fn robot_unexecute(&mut self, m: &Move) {
        let Some(undo) = self.robot_stack.pop() else {
            fatal!("robot unexecute {} with no robot move to undo", m);
        };
        if !undo.mv.same_move(m) {
            fatal!("robot unexecute {} does not match last robot move {}", m, undo.mv);
        }

        if let Some(key) = undo.counted {
            if let Some(seen) = self.repetitions.get_mut(&key) {
                *seen -= 1;
                if *seen == 0 {
                    self.repetitions.remove(&key);
                }
            }
        }

        self.accept();
        self.restore_steps(undo.steps);
        self.unwind();

        self.state = undo.state;
        self.unresign = undo.unresign;
        self.whose_turn = undo.whose_turn;
        self.move_number = undo.move_number;
        self.win = undo.win;
        self.swapped = undo.swapped;
        self.history = undo.history;
        self.animations = undo.animations;
        self.last_counted = None;

        if let Some(expected) = undo.digest {
            let actual = self.digest();
            if actual != expected {
                fatal!(
                    "robot unexecute {} digest mismatch: {:#018x} before make, {:#018x} after unmake",
                    m,
                    expected,
                    actual
                );
            }
        }
        tracing::trace!(%m, depth = self.robot_stack.len(), "robot unexecute");
    }
}

//! Breakthrough rules.

use smallvec::SmallVec;
use std::sync::Arc;

use crate::board::Board;
use crate::core::{InitError, InitSpec, Move, MoveKind, PlayerId};
use crate::pieces::{ChipId, ChipKind, ChipRegistry};
use crate::rules::{GameResult, Rules};
use crate::state::BoardState;
use crate::topology::{BoardShape, CellId, Coord, Direction, Geometry, Grid};

const REGISTRY_SEED: u64 = 0x6272_6561_6b74_6872;
const PAWN: ChipKind = ChipKind(0);

/// Game type names with (size, home rows).
const VARIANTS: [(&str, u8, u8); 4] = [
    ("breakthrough", 8, 2),
    ("breakthrough-6", 6, 2),
    ("breakthrough-1", 8, 1),
    ("game", 8, 1),
];

// Square-8 directions: straight ahead, then the two forward diagonals.
const UP: [Direction; 3] = [Direction(0), Direction(7), Direction(1)];
const DOWN: [Direction; 3] = [Direction(4), Direction(5), Direction(3)];

/// Breakthrough rules.
///
/// Player 0 starts on the bottom rows and moves up, player 1 starts on the
/// top rows and moves down. A pawn steps one cell straight ahead onto an
/// empty cell, or one cell diagonally forward onto an empty cell or an enemy
/// pawn, capturing it. Reaching the far row, or capturing every enemy pawn,
/// wins. A player with no step must pass.
///
/// `game` is an alias for the single home row variant.
#[derive(Clone, Debug)]
pub struct Breakthrough {
    registry: Arc<ChipRegistry>,
    pawns: [ChipId; 2],
}

impl Default for Breakthrough {
    fn default() -> Self {
        Self::new()
    }
}

impl Breakthrough {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = ChipRegistry::new(REGISTRY_SEED);
        let white = registry.register("white-pawn", Some(PlayerId::new(0)), PAWN, 'O');
        let black = registry.register("black-pawn", Some(PlayerId::new(1)), PAWN, 'X');
        Self {
            registry: Arc::new(registry),
            pawns: [white, black],
        }
    }

    /// The pawn of `player`.
    #[must_use]
    pub fn pawn(&self, player: PlayerId) -> ChipId {
        self.pawns[player.index()]
    }

    fn variant(init: &InitSpec) -> Option<(u8, u8)> {
        VARIANTS
            .iter()
            .find(|(name, _, _)| init.is_game(name))
            .map(|&(_, size, home)| (size, home))
    }

    fn forward(player: PlayerId) -> [Direction; 3] {
        if player.index() == 0 {
            UP
        } else {
            DOWN
        }
    }

    /// Cells the top chip of `from` may step to, for its owner.
    #[must_use]
    pub fn destinations(&self, board: &Board<Self>, from: CellId) -> SmallVec<[CellId; 3]> {
        let grid = board.grid();
        let Some(owner) = grid.cell(from).top().and_then(|c| self.registry.owner(c)) else {
            return SmallVec::new();
        };
        self.steps(board, from, owner)
    }

    fn steps(&self, board: &Board<Self>, from: CellId, owner: PlayerId) -> SmallVec<[CellId; 3]> {
        let grid = board.grid();
        let mut out = SmallVec::new();
        for (i, &direction) in Self::forward(owner).iter().enumerate() {
            let Some(to) = grid.neighbor(from, direction) else { continue };
            let open = match grid.cell(to).top() {
                None => true,
                // only the diagonals capture
                Some(top) => i > 0 && self.registry.owner(top) != Some(owner),
            };
            if open {
                out.push(to);
            }
        }
        out
    }

    fn owns_top(&self, board: &Board<Self>, cell: CellId, player: PlayerId) -> bool {
        board
            .grid()
            .cell(cell)
            .top()
            .is_some_and(|chip| self.registry.owner(chip) == Some(player))
    }

    fn step_moves(&self, board: &Board<Self>, player: PlayerId) -> Vec<Move> {
        let grid = board.grid();
        let mut moves = Vec::new();
        for cell in grid.board_cells() {
            if !self.owns_top(board, cell.id(), player) {
                continue;
            }
            let Some(from) = cell.coord() else { continue };
            for to in self.steps(board, cell.id(), player) {
                if let Some(to) = grid.cell(to).coord() {
                    moves.push(Move::new(player, MoveKind::Move { from, to }));
                }
            }
        }
        moves
    }

    fn goal_row(board: &Board<Self>, player: PlayerId) -> u8 {
        if player.index() == 0 {
            board.grid().shape().rows - 1
        } else {
            0
        }
    }

    fn reached_goal(&self, board: &Board<Self>, player: PlayerId) -> bool {
        let goal = Self::goal_row(board, player);
        board
            .grid()
            .board_cells()
            .filter(|c| c.coord().is_some_and(|coord| coord.row == goal))
            .any(|c| self.owns_top(board, c.id(), player))
    }
}

impl Rules for Breakthrough {
    fn name(&self) -> &str {
        "breakthrough"
    }

    fn check(&self, init: &InitSpec) -> Result<(), InitError> {
        if Self::variant(init).is_none() {
            return Err(InitError::UnknownGame(init.game.clone()));
        }
        if init.players != 2 {
            return Err(InitError::PlayerCount {
                game: init.game.clone(),
                count: init.players,
            });
        }
        Ok(())
    }

    fn registry(&self) -> &Arc<ChipRegistry> {
        &self.registry
    }

    fn shape(&self, init: &InitSpec) -> BoardShape {
        let (size, _) = Self::variant(init).unwrap_or((8, 2));
        BoardShape::rect(size, size, Geometry::Square8)
    }

    fn setup(&self, grid: &mut Grid, init: &InitSpec) {
        let (size, home) = Self::variant(init).unwrap_or((8, 2));
        for row in 0..home {
            for col in 0..size {
                for (coord, pawn) in [
                    (Coord::new(col, row), self.pawns[0]),
                    (Coord::new(col, size - 1 - row), self.pawns[1]),
                ] {
                    if let Some(cell) = grid.cell_at(coord) {
                        grid.add_chip(cell, pawn);
                    }
                }
            }
        }
    }

    fn can_pick(&self, board: &Board<Self>, cell: CellId) -> bool {
        let player = board.whose_turn();
        board.grid().cell(cell).is_on_board()
            && self.owns_top(board, cell, player)
            && !self.steps(board, cell, player).is_empty()
    }

    fn legal_drop(&self, board: &Board<Self>, chip: ChipId, from: CellId, to: CellId) -> bool {
        let player = board.whose_turn();
        self.registry.owner(chip) == Some(player) && self.steps(board, from, player).contains(&to)
    }

    fn state_after_done(&self, board: &Board<Self>) -> BoardState {
        if self.step_moves(board, board.whose_turn()).is_empty() {
            BoardState::Pass
        } else {
            BoardState::Play
        }
    }

    fn outcome(&self, board: &Board<Self>) -> Option<GameResult> {
        let mover = board.whose_turn();
        let other = mover.next(2);
        for (player, opponent) in [(mover, other), (other, mover)] {
            if self.reached_goal(board, player) || board.on_board(opponent) == 0 {
                return Some(GameResult::Winner(player));
            }
        }
        None
    }

    fn legal_moves(&self, board: &Board<Self>) -> Vec<Move> {
        let player = board.whose_turn();
        match board.state() {
            BoardState::Play | BoardState::PlayOrSwap => self.step_moves(board, player),
            BoardState::PlayOrPass => {
                let mut moves = self.step_moves(board, player);
                moves.push(Move::new(player, MoveKind::Pass));
                moves
            }
            BoardState::Pass => vec![Move::new(player, MoveKind::Pass)],
            BoardState::Confirm | BoardState::ConfirmSwap | BoardState::Resign => {
                vec![Move::done(player)]
            }
            BoardState::Puzzle | BoardState::Gameover => Vec::new(),
        }
    }

    fn static_evaluate(&self, board: &Board<Self>, player: PlayerId) -> f64 {
        if let Some(result) = board.outcome() {
            return if result.is_winner(player) { 1000.0 } else { -1000.0 };
        }
        let span = f64::from(board.grid().shape().rows.saturating_sub(1).max(1));
        let mut score = 0.0;
        for cell in board.grid().board_cells() {
            let (Some(chip), Some(coord)) = (cell.top(), cell.coord()) else { continue };
            let Some(owner) = self.registry.owner(chip) else { continue };
            let advanced = if owner.index() == 0 {
                f64::from(coord.row)
            } else {
                span - f64::from(coord.row)
            };
            let value = 1.0 + 0.5 * advanced / span;
            score += if owner == player { value } else { -value };
        }
        score
    }
}

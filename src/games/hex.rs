//! Hex rules.

use std::sync::Arc;

use crate::board::Board;
use crate::core::{InitError, InitSpec, Move, MoveKind, PlayerId};
use crate::pieces::{ChipId, ChipKind, ChipRegistry};
use crate::rules::{DropEffect, GameResult, Rules};
use crate::state::BoardState;
use crate::topology::{BoardShape, CellId, CellMask, Geometry, Grid, Location};

const REGISTRY_SEED: u64 = 0x6865_785f_7374_6f6e;
const STONE: ChipKind = ChipKind(0);

/// First revision with the pie rule.
pub const SWAP_REVISION: u32 = 101;

const VARIANTS: [(&str, u8, CellMask); 4] = [
    ("hex", 7, CellMask::Full),
    ("hex-9", 9, CellMask::Full),
    ("hex-11", 11, CellMask::Full),
    ("hex-hexagon", 9, CellMask::Hexagon),
];

/// Hex on an n×n rhombus, or on a hexagon cut from one (`hex-hexagon`).
///
/// Stones are placed from the colour's reserve onto empty cells and never
/// move. Colour 0 wins by connecting the bottom and top rows, colour 1 by
/// connecting the left and right columns. From revision 101 the second
/// player may swap colours instead of making their first move.
#[derive(Clone, Debug)]
pub struct Hex {
    registry: Arc<ChipRegistry>,
    stones: [ChipId; 2],
}

impl Default for Hex {
    fn default() -> Self {
        Self::new()
    }
}

impl Hex {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = ChipRegistry::new(REGISTRY_SEED);
        let white = registry.register("white-stone", Some(PlayerId::new(0)), STONE, 'O');
        let black = registry.register("black-stone", Some(PlayerId::new(1)), STONE, 'X');
        Self {
            registry: Arc::new(registry),
            stones: [white, black],
        }
    }

    fn variant(init: &InitSpec) -> Option<(u8, CellMask)> {
        VARIANTS
            .iter()
            .find(|(name, _, _)| init.is_game(name))
            .map(|&(_, size, mask)| (size, mask))
    }

    fn is_colour(&self, board: &Board<Self>, cell: CellId, colour: PlayerId) -> bool {
        board
            .grid()
            .cell(cell)
            .top()
            .is_some_and(|chip| self.registry.owner(chip) == Some(colour))
    }

    /// Every group of `colour`, as the (lowest, highest) index it reaches
    /// along the colour's axis.
    fn spans(&self, board: &Board<Self>, colour: PlayerId) -> Vec<(u8, u8)> {
        let grid = board.grid();
        let axis = |cell: CellId| {
            grid.cell(cell)
                .coord()
                .map_or(0, |c| if colour.index() == 0 { c.row } else { c.col })
        };
        let mut seen: Vec<bool> = vec![false; grid.len()];
        let mut spans = Vec::new();
        for cell in grid.board_cells() {
            let id = cell.id();
            if seen[id.index()] || !self.is_colour(board, id, colour) {
                continue;
            }
            let group = grid.flood(id, |c| c.is_on_board() && self.is_colour(board, c.id(), colour));
            let (mut low, mut high) = (u8::MAX, 0);
            for &member in &group {
                seen[member.index()] = true;
                low = low.min(axis(member));
                high = high.max(axis(member));
            }
            spans.push((low, high));
        }
        spans
    }

    /// True if `colour` has a chain joining its two edges.
    #[must_use]
    pub fn connected(&self, board: &Board<Self>, colour: PlayerId) -> bool {
        let last = board.grid().shape().rows - 1;
        self.spans(board, colour).iter().any(|&(low, high)| low == 0 && high == last)
    }

    fn longest_span(&self, board: &Board<Self>, colour: PlayerId) -> f64 {
        self.spans(board, colour)
            .iter()
            .map(|&(low, high)| f64::from(high - low + 1))
            .fold(0.0, f64::max)
    }

    fn placements(&self, board: &Board<Self>, player: PlayerId) -> Vec<Move> {
        let reserve = board.color_of(player).0;
        board
            .grid()
            .board_cells()
            .filter(|c| c.is_empty())
            .filter_map(|c| c.coord())
            .map(|to| Move::new(player, MoveKind::Place { reserve, to }))
            .collect()
    }
}

impl Rules for Hex {
    fn name(&self) -> &str {
        "hex"
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
        let (size, mask) = Self::variant(init).unwrap_or((7, CellMask::Full));
        BoardShape::rect(size, size, Geometry::Hex6)
            .with_reserves(2)
            .with_mask(mask)
    }

    fn setup(&self, grid: &mut Grid, _init: &InitSpec) {
        let per_colour = grid.board_cells().count().div_ceil(2) + 1;
        for (reserve, &stone) in self.stones.iter().enumerate() {
            let Some(cell) = grid.reserve(reserve as u8) else { continue };
            for _ in 0..per_colour {
                grid.add_chip(cell, stone);
            }
        }
    }

    fn can_pick(&self, board: &Board<Self>, cell: CellId) -> bool {
        let colour = board.color_of(board.whose_turn());
        board.grid().cell(cell).location() == Location::Reserve(colour.0)
            && self.is_colour(board, cell, colour)
            && board.grid().board_cells().any(|c| c.is_empty())
    }

    fn legal_drop(&self, board: &Board<Self>, chip: ChipId, _from: CellId, to: CellId) -> bool {
        let colour = board.color_of(board.whose_turn());
        let target = board.grid().cell(to);
        self.registry.owner(chip) == Some(colour) && target.is_on_board() && target.is_empty()
    }

    fn drop_effect(&self, _board: &Board<Self>, _chip: ChipId, _to: CellId) -> DropEffect {
        DropEffect::Place
    }

    fn state_after_done(&self, board: &Board<Self>) -> BoardState {
        if board.init_spec().revision >= SWAP_REVISION && board.move_number() == 2 {
            BoardState::PlayOrSwap
        } else {
            BoardState::Play
        }
    }

    fn outcome(&self, board: &Board<Self>) -> Option<GameResult> {
        let mover = board.whose_turn();
        [mover, mover.next(2)]
            .into_iter()
            .find(|&player| self.connected(board, board.color_of(player)))
            .map(GameResult::Winner)
    }

    fn legal_moves(&self, board: &Board<Self>) -> Vec<Move> {
        let player = board.whose_turn();
        match board.state() {
            BoardState::Play => self.placements(board, player),
            BoardState::PlayOrSwap => {
                let mut moves = self.placements(board, player);
                moves.push(Move::new(player, MoveKind::Swap));
                moves
            }
            BoardState::PlayOrPass => {
                let mut moves = self.placements(board, player);
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
        let mine = board.color_of(player);
        let theirs = board.color_of(player.next(2));
        self.longest_span(board, mine) - self.longest_span(board, theirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ReplayMode;

    fn run(board: &mut Board<Hex>, lines: &[&str]) {
        for line in lines {
            let m = board.parse_move(line).unwrap();
            board.execute(&m, ReplayMode::Live);
        }
    }

    #[test]
    fn test_reserves_are_filled() {
        let board = Board::new(Hex::new(), "hex 2 0 100").unwrap();
        let reserve = board.grid().reserve(0).unwrap();
        assert_eq!(board.grid().cell(reserve).height(), 26);
        assert_eq!(board.grid().board_cells().count(), 49);
        assert_eq!(board.on_board(PlayerId::new(0)), 0);
    }

    #[test]
    fn test_no_swap_before_revision() {
        let mut board = Board::new(Hex::new(), "hex 2 0 100").unwrap();
        run(&mut board, &["start P0", "place P0 0 D 4", "done P0"]);
        assert_eq!(board.state(), BoardState::Play);
        assert!(!board.legal_moves().iter().any(|m| m.kind == MoveKind::Swap));
        assert_eq!(board.legal_moves().len(), 48);
    }

    #[test]
    fn test_place_by_gesture() {
        let mut board = Board::new(Hex::new(), "hex 2 0 100").unwrap();
        run(&mut board, &["start P0", "pick P0 0", "dropb P0 A 1"]);
        assert_eq!(board.state(), BoardState::Confirm);
        assert_eq!(board.on_board(PlayerId::new(0)), 1);
        run(&mut board, &["done P0"]);
        assert_eq!(board.whose_turn(), PlayerId::new(1));
    }

    #[test]
    #[should_panic(expected = "may not move")]
    fn test_cannot_pick_other_reserve() {
        let mut board = Board::new(Hex::new(), "hex 2 0 100").unwrap();
        run(&mut board, &["start P0", "pick P0 1"]);
    }

    #[test]
    fn test_column_of_white_connects() {
        let mut board = Board::new(Hex::new(), "hex 2 0 100").unwrap();
        for row in 1..=6 {
            let drop = format!("dropb P0 C {}", row);
            run(&mut board, &["pick P0 0", drop.as_str()]);
        }
        run(&mut board, &["start P0", "place P0 0 C 7", "done P0"]);
        assert_eq!(board.outcome(), Some(GameResult::Winner(PlayerId::new(0))));
    }

    #[test]
    fn test_hexagon_board() {
        let mut board = Board::new(Hex::new(), "hex-hexagon 2 0 100").unwrap();
        assert_eq!(board.grid().board_cells().count(), 61);
        let reserve = board.grid().reserve(1).unwrap();
        assert_eq!(board.grid().cell(reserve).height(), 32);
        assert!(board.grid().cell_at(crate::topology::Coord::new(0, 0)).is_none());

        // column E runs from the top corner to the bottom corner
        for row in 1..=8 {
            let drop = format!("dropb P0 E {}", row);
            run(&mut board, &["pick P0 0", drop.as_str()]);
        }
        run(&mut board, &["start P0"]);
        assert_eq!(board.legal_moves().len(), 61 - 8);
        run(&mut board, &["place P0 0 E 9", "done P0"]);
        assert_eq!(board.outcome(), Some(GameResult::Winner(PlayerId::new(0))));
    }

    #[test]
    #[should_panic(expected = "does not have")]
    fn test_hexagon_corner_is_off_board() {
        let mut board = Board::new(Hex::new(), "hex-hexagon 2 0 100").unwrap();
        run(&mut board, &["start P0", "place P0 0 A 1"]);
    }

    #[test]
    fn test_swapped_player_wins_with_taken_colour() {
        let mut board = Board::new(Hex::new(), "hex 2 0 101").unwrap();
        run(&mut board, &["start P0", "place P0 0 A 1", "done P0", "swap P1", "done P1"]);
        // P0 now plays colour 1 from reserve 1
        let first = Move::new(
            PlayerId::new(0),
            MoveKind::Place { reserve: 1, to: crate::topology::Coord::new(1, 0) },
        );
        assert_eq!(board.legal_moves()[0], first);
        assert!(!board.rules().connected(&board, PlayerId::new(0)));
        let eval = board.rules().static_evaluate(&board, PlayerId::new(1));
        assert!(eval > 0.0);
    }
}

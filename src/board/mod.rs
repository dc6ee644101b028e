//! The game board: cells, turn, state machine, and the stacks that make
//! every move reversible.
//!
//! ## Key Types
//!
//! - `Board<R>`: Complete game state, generic over the game's `Rules`
//! - `ReplayMode`: Whether a move comes from a live player or a stored record
//! - `MoveLog`: Committed move history
//!
//! ## Structure
//!
//! - `transaction`: pick / drop / unpick / undrop / accept
//! - `execute`: the single dispatch point for moves
//! - `robot`: make / unmake for search
//! - `digest`: deterministic 64-bit position hashes
//! - `history`: the move log
//!
//! Cloning a board is a plain structural copy. Cells refer to each other by
//! index and the chip registry is shared through an `Arc`, so a clone never
//! points into its original.

mod digest;
mod execute;
pub mod history;
mod robot;
mod transaction;

pub use execute::ReplayMode;
pub use history::MoveLog;

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::core::error::fatal;
use crate::core::{
    BoardConfig, InitError, InitSpec, Move, ParseError, ParseResult, PlayerId, PlayerMap,
    RecordError,
};
use crate::pieces::{ChipId, ChipRegistry};
use crate::rules::{GameResult, Rules};
use crate::state::BoardState;
use crate::topology::{CellId, Grid};

use robot::RobotUndo;
use transaction::PriorState;

/// Complete game state.
///
/// ## Example
///
/// ```
/// use tabletop::board::{Board, ReplayMode};
/// use tabletop::games::Breakthrough;
/// use tabletop::state::BoardState;
///
/// let mut board = Board::new(Breakthrough::new(), "breakthrough 2 1 100").unwrap();
/// assert_eq!(board.state(), BoardState::Puzzle);
///
/// let start = board.parse_move("start P0").unwrap();
/// board.execute(&start, ReplayMode::Live);
/// assert_eq!(board.state(), BoardState::Play);
/// ```
#[derive(Clone, Debug)]
pub struct Board<R: Rules> {
    rules: R,
    init: InitSpec,
    config: BoardConfig,
    registry: Arc<ChipRegistry>,
    grid: Grid,

    whose_turn: PlayerId,
    move_number: u32,
    state: BoardState,
    /// State to return to if a pending resignation is withdrawn.
    unresign: Option<BoardState>,
    win: PlayerMap<bool>,
    on_board: PlayerMap<u32>,
    captured: PlayerMap<Vec<ChipId>>,
    swapped: bool,

    // Tentative move. The three stacks always have equal depth.
    picked: Option<ChipId>,
    sources: Vec<Option<CellId>>,
    dests: Vec<Option<CellId>>,
    priors: Vec<PriorState>,

    robot_stack: Vec<RobotUndo>,
    history: MoveLog,
    repetitions: FxHashMap<u64, u32>,
    last_counted: Option<u64>,
    animations: Vec<(CellId, CellId)>,
}

impl<R: Rules> Board<R> {
    /// Create a board from an init string with the default configuration.
    pub fn new(rules: R, init: &str) -> Result<Self, InitError> {
        Self::with_config(rules, init, BoardConfig::default())
    }

    /// Create a board from an init string.
    pub fn with_config(rules: R, init: &str, config: BoardConfig) -> Result<Self, InitError> {
        let spec: InitSpec = init.parse()?;
        Self::from_spec(rules, spec, config)
    }

    /// Create a board from a parsed init string.
    pub fn from_spec(rules: R, spec: InitSpec, config: BoardConfig) -> Result<Self, InitError> {
        rules.check(&spec)?;
        let players = spec.players;
        let grid = Grid::new(rules.shape(&spec));
        let registry = Arc::clone(rules.registry());

        let mut board = Self {
            rules,
            init: spec.clone(),
            config,
            registry,
            grid,
            whose_turn: PlayerId::new(0),
            move_number: 1,
            state: BoardState::Puzzle,
            unresign: None,
            win: PlayerMap::with_value(players, false),
            on_board: PlayerMap::with_value(players, 0),
            captured: PlayerMap::with_value(players, Vec::new()),
            swapped: false,
            picked: None,
            sources: Vec::new(),
            dests: Vec::new(),
            priors: Vec::new(),
            robot_stack: Vec::new(),
            history: MoveLog::new(),
            repetitions: FxHashMap::default(),
            last_counted: None,
            animations: Vec::new(),
        };
        board.reset(spec);
        Ok(board)
    }

    /// Re-initialise from an init string. Cells are reused unless the board
    /// shape changes.
    pub fn init(&mut self, init: &str) -> Result<(), InitError> {
        let spec: InitSpec = init.parse()?;
        self.rules.check(&spec)?;
        self.reset(spec);
        Ok(())
    }

    fn reset(&mut self, spec: InitSpec) {
        let shape = self.rules.shape(&spec);
        if *self.grid.shape() == shape {
            self.grid.clear_contents();
        } else {
            self.grid = Grid::new(shape);
        }
        self.rules.setup(&mut self.grid, &spec);

        let players = spec.players;
        self.init = spec;
        self.whose_turn = PlayerId::new(0);
        self.move_number = 1;
        self.state = BoardState::Puzzle;
        self.unresign = None;
        self.win = PlayerMap::with_value(players, false);
        self.captured = PlayerMap::with_value(players, Vec::new());
        self.swapped = false;
        self.picked = None;
        self.sources.clear();
        self.dests.clear();
        self.priors.clear();
        self.robot_stack.clear();
        self.repetitions.clear();
        self.last_counted = None;
        self.animations.clear();
        self.recount();

        self.history = MoveLog::new();
        let digest = self.digest();
        self.history.mark_turn_start(digest);
        tracing::debug!(init = %self.init, digest, "board initialised");
    }

    fn recount(&mut self) {
        let mut counts = PlayerMap::with_value(self.init.players, 0u32);
        for cell in self.grid.board_cells() {
            for &chip in cell.chips() {
                if let Some(owner) = self.registry.owner(chip) {
                    if owner.index() < counts.player_count() {
                        counts[owner] += 1;
                    }
                }
            }
        }
        self.on_board = counts;
    }

    /// Rebuild a board by replaying move text lines.
    ///
    /// Blank lines are skipped. Malformed lines are reported with their
    /// 1-based line number; illegal moves panic like any other illegal
    /// execute.
    pub fn replay<'a, I>(rules: R, config: BoardConfig, init: &str, lines: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut board = Self::with_config(rules, init, config)?;
        for (i, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let m = board
                .parse_move(line)
                .map_err(|source| RecordError::Parse { line: i + 1, source })?;
            board.execute(&m, ReplayMode::Replay);
        }
        tracing::debug!(moves = board.history.len(), digest = board.digest(), "replay complete");
        Ok(board)
    }

    // === Accessors ===

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn init_spec(&self) -> &InitSpec {
        &self.init
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ChipRegistry {
        &self.registry
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.init.players
    }

    #[must_use]
    pub fn whose_turn(&self) -> PlayerId {
        self.whose_turn
    }

    /// Number of the move in progress, starting at 1.
    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    #[must_use]
    pub fn state(&self) -> BoardState {
        self.state
    }

    #[must_use]
    pub fn has_won(&self, player: PlayerId) -> bool {
        self.win[player]
    }

    /// Chips `player` owns on board cells.
    #[must_use]
    pub fn on_board(&self, player: PlayerId) -> u32 {
        self.on_board[player]
    }

    /// Chips captured by `player`, oldest first.
    #[must_use]
    pub fn captured(&self, player: PlayerId) -> &[ChipId] {
        &self.captured[player]
    }

    /// True once the pie rule has been invoked an odd number of times.
    #[must_use]
    pub fn is_swapped(&self) -> bool {
        self.swapped
    }

    /// Colour played by `player`, after any swap.
    #[must_use]
    pub fn color_of(&self, player: PlayerId) -> PlayerId {
        if self.swapped && self.player_count() == 2 {
            PlayerId::new(1 - player.0)
        } else {
            player
        }
    }

    /// The chip in hand, if any.
    #[must_use]
    pub fn picked(&self) -> Option<ChipId> {
        self.picked
    }

    /// Cell the chip in hand was lifted from.
    #[must_use]
    pub fn pick_source(&self) -> Option<CellId> {
        self.picked?;
        self.sources.last().copied().flatten()
    }

    /// Destination of the most recent uncommitted drop.
    #[must_use]
    pub fn last_drop(&self) -> Option<CellId> {
        self.dests.last().copied().flatten()
    }

    /// Committed and in-progress moves.
    #[must_use]
    pub fn history(&self) -> &MoveLog {
        &self.history
    }

    /// Number of robot moves that can be unexecuted.
    #[must_use]
    pub fn robot_depth(&self) -> usize {
        self.robot_stack.len()
    }

    /// Result of the game, once it is over.
    #[must_use]
    pub fn outcome(&self) -> Option<GameResult> {
        if self.state != BoardState::Gameover {
            return None;
        }
        let winners = self
            .win
            .iter()
            .filter(|(_, &won)| won)
            .map(|(player, _)| player)
            .collect();
        Some(GameResult::from_winners(winners))
    }

    /// Complete moves for the player on turn.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        self.rules.legal_moves(self)
    }

    /// Drain the (from, to) pairs recorded since the last call.
    pub fn take_animations(&mut self) -> Vec<(CellId, CellId)> {
        std::mem::take(&mut self.animations)
    }

    // === Input ===

    /// Parse move text and check it names cells and players this board has.
    pub fn parse_move(&self, text: &str) -> ParseResult<Move> {
        let m: Move = text.parse()?;
        if m.player.index() >= self.player_count() {
            return Err(ParseError::PlayerOutOfRange {
                player: m.player.0,
                player_count: self.player_count(),
            });
        }
        if let Some(coord) = m.kind.coords().into_iter().find(|&c| self.grid.cell_at(c).is_none()) {
            return Err(ParseError::OffBoard(coord.to_string()));
        }
        if let Some(reserve) = m.kind.reserve().filter(|&r| self.grid.reserve(r).is_none()) {
            return Err(ParseError::OffBoard(format!("reserve {}", reserve)));
        }
        Ok(m)
    }

    /// Cells a viewer should accept clicks on right now.
    #[must_use]
    pub fn legal_targets(&self) -> Vec<CellId> {
        let puzzle = self.state == BoardState::Puzzle;
        match (self.picked, self.pick_source()) {
            (Some(chip), Some(source)) => self
                .grid
                .cells()
                .map(|c| c.id())
                .filter(|&id| id == source || puzzle || self.rules.legal_drop(self, chip, source, id))
                .collect(),
            _ if self.state == BoardState::Confirm => self.last_drop().into_iter().collect(),
            _ if puzzle => self
                .grid
                .cells()
                .filter(|c| !c.is_empty())
                .map(|c| c.id())
                .collect(),
            _ if self.state.can_move() => self
                .grid
                .cells()
                .filter(|c| !c.is_empty() && self.rules.can_pick(self, c.id()))
                .map(|c| c.id())
                .collect(),
            _ => Vec::new(),
        }
    }

    // === Copies ===

    /// Clone this board, verifying the copy when `verify_clones` is set.
    #[must_use]
    pub fn copy(&self) -> Self {
        let copy = self.clone();
        if self.config.verify_clones {
            copy.same_board(self);
        }
        copy
    }

    /// Assert that `other` is an exact copy of this board.
    ///
    /// Panics naming the first field that differs.
    pub fn same_board(&self, other: &Self) {
        let checks = [
            ("grid", self.grid.same_contents(&other.grid)),
            ("init", self.init == other.init),
            ("whose_turn", self.whose_turn == other.whose_turn),
            ("move_number", self.move_number == other.move_number),
            ("state", self.state == other.state),
            ("unresign", self.unresign == other.unresign),
            ("win", self.win == other.win),
            ("on_board", self.on_board == other.on_board),
            ("captured", self.captured == other.captured),
            ("swapped", self.swapped == other.swapped),
            ("picked", self.picked == other.picked),
            ("sources", self.sources == other.sources),
            ("dests", self.dests == other.dests),
            ("priors", self.priors == other.priors),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, same)| !same) {
            fatal!("board copy mismatch in {}", field);
        }
        let (mine, theirs) = (self.digest(), other.digest());
        if mine != theirs {
            fatal!("board copy digest mismatch: {:#018x} vs {:#018x}", mine, theirs);
        }
    }

    /// True if both boards hold the same position with the same player to
    /// move, regardless of how they got there.
    #[must_use]
    pub fn same_position(&self, other: &Self) -> bool {
        self.position_digest() == other.position_digest()
    }

    // === Internal ===

    /// Set the state, remembering the rollback slot for resignations.
    /// Leaving the game-over state clears the win flags.
    pub(crate) fn set_state(&mut self, state: BoardState) {
        self.unresign = (state == BoardState::Resign).then_some(self.state);
        self.state = state;
        if state != BoardState::Gameover {
            self.win.fill(false);
        }
    }

    /// End the game.
    pub(crate) fn finish(&mut self, result: GameResult) {
        self.set_state(BoardState::Gameover);
        for player in PlayerId::all(self.player_count()) {
            self.win[player] = result.is_winner(player);
        }
        tracing::debug!(?result, move_number = self.move_number, "game over");
    }

    pub(crate) fn cell_or_fatal(&self, location: crate::topology::Location, m: &Move) -> CellId {
        match self.grid.locate(location) {
            Some(id) => id,
            None => fatal!("{} names a cell this board does not have", m),
        }
    }
}

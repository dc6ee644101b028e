//! Moves and their text form.
//!
//! A move is an opcode, the acting player and the operands the opcode
//! needs. The text form is what game records store:
//!
//! ```text
//! [<index>] <opcode> P<player> <operands...>
//! ```
//!
//! Board cells are written as a column letter and a 1-based row, as two
//! tokens (`B 2`). Reserves are plain integers.
//!
//! ```
//! use tabletop::core::{Move, MoveKind, PlayerId};
//! use tabletop::topology::Coord;
//!
//! let m: Move = "12 MOVE p0 a 1 b 2".parse().unwrap();
//! assert_eq!(m.index, Some(12));
//! assert_eq!(m.kind, MoveKind::Move { from: Coord::new(0, 0), to: Coord::new(1, 1) });
//! assert_eq!(m.to_string(), "12 move P0 A 1 B 2");
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::{ParseError, ParseResult};
use super::player::PlayerId;
use crate::topology::Coord;

/// Fieldless move discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Start,
    Edit,
    Done,
    Pass,
    Resign,
    Swap,
    GameOverOnTime,
    PickBoard,
    DropBoard,
    Pick,
    Drop,
    Move,
    Place,
}

const OPCODE_NAMES: [(Opcode, &str); 13] = [
    (Opcode::Start, "start"),
    (Opcode::Edit, "edit"),
    (Opcode::Done, "done"),
    (Opcode::Pass, "pass"),
    (Opcode::Resign, "resign"),
    (Opcode::Swap, "swap"),
    (Opcode::GameOverOnTime, "gameovertime"),
    (Opcode::PickBoard, "pickb"),
    (Opcode::DropBoard, "dropb"),
    (Opcode::Pick, "pick"),
    (Opcode::Drop, "drop"),
    (Opcode::Move, "move"),
    (Opcode::Place, "place"),
];

impl Opcode {
    /// Lower-case text name.
    #[must_use]
    pub fn name(self) -> &'static str {
        OPCODE_NAMES
            .iter()
            .find(|(op, _)| *op == self)
            .map_or("", |(_, name)| name)
    }

    /// Look up an opcode by name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        OPCODE_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(op, _)| *op)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Opcode with its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Begin play with the given player on turn.
    Start,
    /// Return to free editing.
    Edit,
    /// Commit the pending move.
    Done,
    Pass,
    /// Resign, or take back a pending resignation.
    Resign,
    /// Swap colours (pie rule), or take back a pending swap.
    Swap,
    /// The opponent ran out of time.
    GameOverOnTime,
    /// Pick the top chip of a board cell.
    PickBoard(Coord),
    /// Drop the floating chip on a board cell.
    DropBoard(Coord),
    /// Pick a chip from a reserve.
    Pick(u8),
    /// Drop the floating chip into a reserve.
    Drop(u8),
    /// Board to board in one step.
    Move { from: Coord, to: Coord },
    /// Reserve to board in one step.
    Place { reserve: u8, to: Coord },
}

impl MoveKind {
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        match self {
            MoveKind::Start => Opcode::Start,
            MoveKind::Edit => Opcode::Edit,
            MoveKind::Done => Opcode::Done,
            MoveKind::Pass => Opcode::Pass,
            MoveKind::Resign => Opcode::Resign,
            MoveKind::Swap => Opcode::Swap,
            MoveKind::GameOverOnTime => Opcode::GameOverOnTime,
            MoveKind::PickBoard(_) => Opcode::PickBoard,
            MoveKind::DropBoard(_) => Opcode::DropBoard,
            MoveKind::Pick(_) => Opcode::Pick,
            MoveKind::Drop(_) => Opcode::Drop,
            MoveKind::Move { .. } => Opcode::Move,
            MoveKind::Place { .. } => Opcode::Place,
        }
    }

    /// Board coordinates named by the operands.
    #[must_use]
    pub fn coords(&self) -> smallvec::SmallVec<[Coord; 2]> {
        match *self {
            MoveKind::PickBoard(c) | MoveKind::DropBoard(c) | MoveKind::Place { to: c, .. } => {
                smallvec::smallvec![c]
            }
            MoveKind::Move { from, to } => smallvec::smallvec![from, to],
            _ => smallvec::SmallVec::new(),
        }
    }

    /// Reserve index named by the operands.
    #[must_use]
    pub fn reserve(&self) -> Option<u8> {
        match *self {
            MoveKind::Pick(r) | MoveKind::Drop(r) | MoveKind::Place { reserve: r, .. } => Some(r),
            _ => None,
        }
    }
}

/// A move by one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Position in the game record, if known. Not part of move identity
    /// for the board, only for the record.
    pub index: Option<u32>,
    pub player: PlayerId,
    pub kind: MoveKind,
}

impl Move {
    /// Create an unindexed move.
    #[must_use]
    pub const fn new(player: PlayerId, kind: MoveKind) -> Self {
        Self {
            index: None,
            player,
            kind,
        }
    }

    #[must_use]
    pub const fn done(player: PlayerId) -> Self {
        Self::new(player, MoveKind::Done)
    }

    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.kind.opcode()
    }

    /// Same player and operands, ignoring the record index.
    #[must_use]
    pub fn same_move(&self, other: &Move) -> bool {
        self.player == other.player && self.kind == other.kind
    }

    /// Parse from an iterator of tokens, consuming exactly one move.
    pub fn from_tokens<'a, I>(tokens: &mut std::iter::Peekable<I>) -> ParseResult<Self>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut reader = TokenReader {
            tokens,
            seen: String::new(),
        };

        let first = reader.next("opcode").map_err(|_| ParseError::Empty)?;
        let (index, op_token) = match first.parse::<u32>() {
            Ok(index) => (Some(index), reader.next("opcode")?),
            Err(_) => (None, first),
        };
        let opcode =
            Opcode::from_name(op_token).ok_or_else(|| ParseError::UnknownOpcode(op_token.to_string()))?;
        let player = parse_player(reader.next("player")?)?;

        let kind = match opcode {
            Opcode::Start => MoveKind::Start,
            Opcode::Edit => MoveKind::Edit,
            Opcode::Done => MoveKind::Done,
            Opcode::Pass => MoveKind::Pass,
            Opcode::Resign => MoveKind::Resign,
            Opcode::Swap => MoveKind::Swap,
            Opcode::GameOverOnTime => MoveKind::GameOverOnTime,
            Opcode::PickBoard => MoveKind::PickBoard(reader.coord()?),
            Opcode::DropBoard => MoveKind::DropBoard(reader.coord()?),
            Opcode::Move => {
                let from = reader.coord()?;
                let to = reader.coord()?;
                MoveKind::Move { from, to }
            }
            Opcode::Pick => MoveKind::Pick(reader.reserve()?),
            Opcode::Drop => MoveKind::Drop(reader.reserve()?),
            Opcode::Place => {
                let reserve = reader.reserve()?;
                let to = reader.coord()?;
                MoveKind::Place { reserve, to }
            }
        };

        Ok(Self {
            index,
            player,
            kind,
        })
    }
}

/// Pulls tokens, remembering what was read for error messages.
struct TokenReader<'t, I> {
    tokens: &'t mut I,
    seen: String,
}

impl<'a, I> TokenReader<'_, I>
where
    I: Iterator<Item = &'a str>,
{
    fn next(&mut self, expected: &'static str) -> ParseResult<&'a str> {
        let token = self.tokens.next().ok_or_else(|| ParseError::MissingToken {
            expected,
            after: self.seen.trim_end().to_string(),
        })?;
        self.seen.push_str(token);
        self.seen.push(' ');
        Ok(token)
    }

    fn coord(&mut self) -> ParseResult<Coord> {
        let col = parse_col(self.next("column")?)?;
        let row = parse_row(self.next("row")?)?;
        Ok(Coord::new(col, row))
    }

    fn reserve(&mut self) -> ParseResult<u8> {
        let token = self.next("reserve")?;
        token
            .parse::<u8>()
            .map_err(|_| ParseError::BadNumber(token.to_string()))
    }
}

fn parse_player(token: &str) -> ParseResult<PlayerId> {
    token
        .strip_prefix(['P', 'p'])
        .and_then(|n| n.parse::<u8>().ok())
        .map(PlayerId::new)
        .ok_or_else(|| ParseError::BadPlayer(token.to_string()))
}

fn parse_col(token: &str) -> ParseResult<u8> {
    Coord::parse_col_label(token).ok_or_else(|| ParseError::BadColumn(token.to_string()))
}

fn parse_row(token: &str) -> ParseResult<u8> {
    match token.parse::<u16>() {
        Ok(row @ 1..=256) => Ok((row - 1) as u8),
        _ => Err(ParseError::BadRow(token.to_string())),
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().peekable();
        let m = Self::from_tokens(&mut tokens)?;
        let rest: Vec<&str> = tokens.collect();
        if !rest.is_empty() {
            return Err(ParseError::TrailingTokens(rest.join(" ")));
        }
        Ok(m)
    }
}

fn write_coord(f: &mut std::fmt::Formatter<'_>, coord: Coord) -> std::fmt::Result {
    write!(f, " {} {}", coord.col_label(), u32::from(coord.row) + 1)
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(index) = self.index {
            write!(f, "{} ", index)?;
        }
        write!(f, "{} {}", self.opcode(), self.player)?;
        match self.kind {
            MoveKind::PickBoard(c) | MoveKind::DropBoard(c) => write_coord(f, c),
            MoveKind::Pick(r) | MoveKind::Drop(r) => write!(f, " {}", r),
            MoveKind::Move { from, to } => {
                write_coord(f, from)?;
                write_coord(f, to)
            }
            MoveKind::Place { reserve, to } => {
                write!(f, " {}", reserve)?;
                write_coord(f, to)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    #[test]
    fn test_opcode_names_unique() {
        for (op, name) in OPCODE_NAMES {
            assert_eq!(Opcode::from_name(name), Some(op));
            assert_eq!(Opcode::from_name(&name.to_uppercase()), Some(op));
            assert_eq!(op.name(), name);
        }
        assert_eq!(Opcode::from_name("jump"), None);
    }

    #[test]
    fn test_display() {
        let m = Move::new(p(1), MoveKind::Place { reserve: 1, to: Coord::new(2, 2) });
        assert_eq!(m.to_string(), "place P1 1 C 3");
        assert_eq!(Move::done(p(0)).with_index(4).to_string(), "4 done P0");
        assert_eq!(Move::new(p(0), MoveKind::Pick(0)).to_string(), "pick P0 0");
    }

    #[test]
    fn test_wide_board_columns_round_trip() {
        for col in [25, 26, 51, 190, 255] {
            let m = Move::new(p(0), MoveKind::PickBoard(Coord::new(col, 0)));
            let back: Move = m.to_string().parse().unwrap();
            assert_eq!(back, m);
        }
        assert_eq!(
            Move::new(p(0), MoveKind::DropBoard(Coord::new(26, 0))).to_string(),
            "dropb P0 AA 1"
        );
    }

    #[test]
    fn test_parse_ignores_case_and_spacing() {
        let m: Move = "  DropB   P1 c\t10 ".parse().unwrap();
        assert_eq!(m, Move::new(p(1), MoveKind::DropBoard(Coord::new(2, 9))));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Move>(), Err(ParseError::Empty));
        assert_eq!("fly P0".parse::<Move>(), Err(ParseError::UnknownOpcode("fly".into())));
        assert_eq!("done X0".parse::<Move>(), Err(ParseError::BadPlayer("X0".into())));
        assert_eq!("pickb P0 IW 1".parse::<Move>(), Err(ParseError::BadColumn("IW".into())));
        assert_eq!("pickb P0 A1 1".parse::<Move>(), Err(ParseError::BadColumn("A1".into())));
        assert_eq!("pickb P0 A 0".parse::<Move>(), Err(ParseError::BadRow("0".into())));
        assert_eq!("pick P0 x".parse::<Move>(), Err(ParseError::BadNumber("x".into())));
        assert_eq!(
            "move P0 A 1 B".parse::<Move>(),
            Err(ParseError::MissingToken { expected: "row", after: "move P0 A 1 B".into() })
        );
        assert_eq!(
            "done P0 now".parse::<Move>(),
            Err(ParseError::TrailingTokens("now".into()))
        );
    }

    #[test]
    fn test_from_tokens_reads_one_move() {
        let text = "pickb P0 A 1 dropb P0 B 2";
        let mut tokens = text.split_whitespace().peekable();
        let first = Move::from_tokens(&mut tokens).unwrap();
        let second = Move::from_tokens(&mut tokens).unwrap();
        assert_eq!(first.kind, MoveKind::PickBoard(Coord::new(0, 0)));
        assert_eq!(second.kind, MoveKind::DropBoard(Coord::new(1, 1)));
        assert!(tokens.peek().is_none());
    }

    #[test]
    fn test_same_move_ignores_index() {
        let a = Move::new(p(0), MoveKind::Pass);
        assert!(a.same_move(&a.with_index(9)));
        assert_ne!(a, a.with_index(9));
    }

    #[test]
    fn test_operand_accessors() {
        let m = MoveKind::Move { from: Coord::new(0, 0), to: Coord::new(0, 1) };
        assert_eq!(m.coords().len(), 2);
        assert_eq!(m.reserve(), None);
        assert_eq!(MoveKind::Place { reserve: 3, to: Coord::new(0, 0) }.reserve(), Some(3));
    }
}

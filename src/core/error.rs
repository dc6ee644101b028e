//! Recoverable error types.
//!
//! Only malformed *input* is recoverable: move text, init strings and stored
//! game records. Anything that indicates an inconsistent board (an opcode
//! that is illegal in the current state, unbalanced transaction stacks, an
//! unmake that does not restore the digest) is a bug and panics instead.

use thiserror::Error;

/// Errors from parsing move text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No tokens at all.
    #[error("empty move text")]
    Empty,

    /// The opcode token is not in the vocabulary.
    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),

    /// Ran out of tokens.
    #[error("missing {expected} after '{after}'")]
    MissingToken { expected: &'static str, after: String },

    /// A player token that is not `P<n>`.
    #[error("bad player token: {0}")]
    BadPlayer(String),

    /// A column token that is not a single letter.
    #[error("bad column token: {0}")]
    BadColumn(String),

    /// A row token that is not a positive number.
    #[error("bad row token: {0}")]
    BadRow(String),

    /// A numeric operand that does not parse.
    #[error("bad number: {0}")]
    BadNumber(String),

    /// Tokens left over after a complete move.
    #[error("unexpected trailing tokens: {0}")]
    TrailingTokens(String),

    /// The move is well formed but names a cell this board does not have.
    #[error("no such cell on this board: {0}")]
    OffBoard(String),

    /// The move names a player outside this game.
    #[error("player {player} out of range for a {player_count} player game")]
    PlayerOutOfRange { player: u8, player_count: usize },
}

/// Errors from parsing or applying an init string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InitError {
    /// A field of `<gametype> <playerCount> <randomSeed> <revision>` is missing.
    #[error("init string is missing the {0} field")]
    MissingField(&'static str),

    /// A numeric field failed to parse.
    #[error("init field {field} is not a number: {value}")]
    BadNumber { field: &'static str, value: String },

    /// Extra tokens after the revision.
    #[error("unexpected trailing tokens in init string: {0}")]
    TrailingTokens(String),

    /// The rules do not know this game type.
    #[error("unknown game type: {0}")]
    UnknownGame(String),

    /// The rules do not support this many players.
    #[error("{game} does not support {count} players")]
    PlayerCount { game: String, count: usize },
}

/// Errors from replaying or verifying a stored game record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The init string was rejected.
    #[error(transparent)]
    Init(#[from] InitError),

    /// A history line failed to parse.
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    /// Replaying the history did not reproduce the recorded digest.
    #[error("digest mismatch: recorded {expected:#018x}, replayed {actual:#018x}")]
    DigestMismatch { expected: u64, actual: u64 },

    /// Binary encoding or decoding failed.
    #[error("record encoding: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Result alias for move parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Log at error level, then panic.
///
/// Used for invariant violations: these mean the board is corrupt or a
/// caller supplied an illegal move, and must never be patched over.
macro_rules! fatal {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        tracing::error!(%message, "board invariant violated");
        panic!("{}", message)
    }};
}

pub(crate) use fatal;

//! Stored game records.
//!
//! A record is the init string, the move text and the digest the live board
//! had when the record was written. Replaying the moves into a fresh board
//! must reproduce that digest exactly; anything else means the record was
//! damaged or tampered with.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{BoardConfig, InitSpec, RecordError};
use crate::rules::Rules;

/// A finished or in-progress game, ready to store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub init: InitSpec,
    /// One move per line, numbered.
    pub moves: Vec<String>,
    /// Digest of the board that wrote the record.
    pub digest: u64,
    /// Seed the digest was computed with.
    pub digest_seed: u64,
}

impl GameRecord {
    /// Capture the history and digest of `board`.
    #[must_use]
    pub fn from_board<R: Rules>(board: &Board<R>) -> Self {
        Self {
            init: board.init_spec().clone(),
            moves: board.history().lines(),
            digest: board.digest(),
            digest_seed: board.config().digest_seed,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Replay the record into a fresh board and check the digest.
    pub fn verify<R: Rules>(&self, rules: R, config: BoardConfig) -> Result<Board<R>, RecordError> {
        let config = config.with_digest_seed(self.digest_seed);
        let init = self.init.to_string();
        let board = Board::replay(rules, config, &init, self.moves.iter().map(String::as_str))?;
        let actual = board.digest();
        if actual != self.digest {
            tracing::error!(
                init = %self.init,
                expected = self.digest,
                actual,
                "replayed record does not match its digest"
            );
            return Err(RecordError::DigestMismatch {
                expected: self.digest,
                actual,
            });
        }
        Ok(board)
    }

    /// True if both records describe the same game ending in the same
    /// position.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &GameRecord) -> bool {
        self.init == other.init && self.digest_seed == other.digest_seed && self.digest == other.digest
    }
}

//! Game initialization strings and engine configuration.
//!
//! ## InitSpec
//!
//! `<gametype> <playerCount> <randomSeed> <revision>`, whitespace tokenised.
//! The same string is re-parsed by the live board, by every search clone and
//! by full-game replay. The revision selects among dated rule variants.
//!
//! ## BoardConfig
//!
//! Engine switches that do not change game semantics: digest seed and the
//! self-checks run after clones and robot unmakes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::InitError;

/// A parsed init string.
///
/// ```
/// use tabletop::core::InitSpec;
///
/// let spec: InitSpec = "hex 2 12345 101".parse().unwrap();
/// assert_eq!(spec.game, "hex");
/// assert_eq!(spec.revision, 101);
/// assert_eq!(spec.to_string(), "hex 2 12345 101");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InitSpec {
    /// Game type name, matched case-insensitively by the rules.
    pub game: String,

    /// Number of players.
    pub players: usize,

    /// Random key for the game session.
    pub seed: u64,

    /// Rule revision.
    pub revision: u32,
}

impl InitSpec {
    /// Create an init spec from its parts.
    pub fn new(game: impl Into<String>, players: usize, seed: u64, revision: u32) -> Self {
        Self {
            game: game.into(),
            players,
            seed,
            revision,
        }
    }

    /// True if the game type matches `name`, ignoring case.
    #[must_use]
    pub fn is_game(&self, name: &str) -> bool {
        self.game.eq_ignore_ascii_case(name)
    }
}

impl FromStr for InitSpec {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();

        let game = tokens.next().ok_or(InitError::MissingField("gametype"))?;
        let players = number(tokens.next(), "playerCount")?;
        let seed = number(tokens.next(), "randomSeed")?;
        let revision = number(tokens.next(), "revision")?;

        let rest: Vec<&str> = tokens.collect();
        if !rest.is_empty() {
            return Err(InitError::TrailingTokens(rest.join(" ")));
        }

        Ok(Self::new(game, players, seed, revision))
    }
}

fn number<T: FromStr>(token: Option<&str>, field: &'static str) -> Result<T, InitError> {
    let token = token.ok_or(InitError::MissingField(field))?;
    token.parse().map_err(|_| InitError::BadNumber {
        field,
        value: token.to_string(),
    })
}

impl std::fmt::Display for InitSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.game, self.players, self.seed, self.revision)
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Seed for the digest streams. Changing it changes every digest.
    pub digest_seed: u64,

    /// Compare a clone against its original after every `copy`.
    pub verify_clones: bool,

    /// Compare the digest before a robot move with the digest after its
    /// unmake.
    pub verify_unmake: bool,

    /// Record (from, to) animation pairs while executing.
    pub animate: bool,

    /// Override the rules' repetition limit (`Some(0)` disables it).
    pub repetition_limit: Option<u32>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            digest_seed: 64 * 1000,
            verify_clones: true,
            verify_unmake: cfg!(debug_assertions),
            animate: true,
            repetition_limit: None,
        }
    }
}

impl BoardConfig {
    /// Use a different digest seed.
    #[must_use]
    pub fn with_digest_seed(mut self, seed: u64) -> Self {
        self.digest_seed = seed;
        self
    }

    /// Turn the unmake self-check on or off.
    #[must_use]
    pub fn with_verify_unmake(mut self, verify: bool) -> Self {
        self.verify_unmake = verify;
        self
    }

    /// Turn the clone self-check on or off.
    #[must_use]
    pub fn with_verify_clones(mut self, verify: bool) -> Self {
        self.verify_clones = verify;
        self
    }

    /// Turn animation recording on or off.
    #[must_use]
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Override the repetition limit.
    #[must_use]
    pub fn with_repetition_limit(mut self, limit: u32) -> Self {
        self.repetition_limit = Some(limit);
        self
    }
}

//! Chips: the immutable pieces that sit in cells.
//!
//! A `Chip` is a value, not an instance. Two black stones on the board are
//! the same `ChipId` twice. Everything that changes during play lives in the
//! cells, never in the chip.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Identifier for a registered chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChipId(pub u16);

impl ChipId {
    /// Create a new chip ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ChipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chip({})", self.0)
    }
}

/// Piece kind. Games define their own kinds; the engine only compares them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChipKind(pub u8);

/// Static chip data.
///
/// ```
/// use tabletop::core::PlayerId;
/// use tabletop::pieces::{Chip, ChipId, ChipKind};
///
/// let stone = Chip::new(ChipId::new(0), "white-stone", ChipKind(0))
///     .with_owner(PlayerId::new(0))
///     .with_glyph('O');
/// assert_eq!(stone.owner, Some(PlayerId::new(0)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub id: ChipId,

    /// Unique name, used for lookup.
    pub name: String,

    pub kind: ChipKind,

    /// Colour index of the owning player. `None` for neutral chips.
    pub owner: Option<PlayerId>,

    /// Single character for text rendering.
    pub glyph: char,

    /// Random salt, fixed when the registry is built.
    pub salt: u64,
}

impl Chip {
    /// Create an unowned chip. The salt is assigned on registration.
    pub fn new(id: ChipId, name: impl Into<String>, kind: ChipKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            owner: None,
            glyph: '?',
            salt: 0,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    #[must_use]
    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    /// True if `player` owns this chip.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}

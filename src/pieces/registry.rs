//! Chip registry.
//!
//! Built once per game type and shared between every board and clone as an
//! `Arc`. Salts are word `id` of a ChaCha8 stream keyed by the registry
//! seed, so two processes registering the same chips in the same order get
//! the same salts.

use rustc_hash::FxHashMap;

use super::chip::{Chip, ChipId, ChipKind};
use crate::core::{DigestRng, PlayerId};

/// Stream used for chip salts; cell lanes start at zero and never reach it.
const SALT_LANE: u64 = u64::MAX;

/// Registry of chips.
///
/// ```
/// use tabletop::core::PlayerId;
/// use tabletop::pieces::{ChipKind, ChipRegistry};
///
/// let mut registry = ChipRegistry::new(7);
/// let black = registry.register("black", Some(PlayerId::new(0)), ChipKind(0), 'X');
///
/// assert_eq!(registry.by_name("black"), Some(black));
/// assert_eq!(registry.chip(black).glyph, 'X');
/// ```
#[derive(Clone, Debug)]
pub struct ChipRegistry {
    seed: u64,
    chips: Vec<Chip>,
    names: FxHashMap<String, ChipId>,
}

impl ChipRegistry {
    /// Create an empty registry whose salts derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            chips: Vec::new(),
            names: FxHashMap::default(),
        }
    }

    /// Register a chip and return its id.
    ///
    /// Panics if a chip with the same name already exists.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        owner: Option<PlayerId>,
        kind: ChipKind,
        glyph: char,
    ) -> ChipId {
        let name = name.into();
        if self.names.contains_key(&name) {
            panic!("Chip named {:?} already registered", name);
        }
        let id = ChipId(self.chips.len() as u16);
        let mut chip = Chip::new(id, name.clone(), kind).with_glyph(glyph);
        chip.owner = owner;
        chip.salt = DigestRng::salt(self.seed, SALT_LANE, u64::from(id.0));

        self.names.insert(name, id);
        self.chips.push(chip);
        id
    }

    /// Get a chip by id.
    #[must_use]
    pub fn get(&self, id: ChipId) -> Option<&Chip> {
        self.chips.get(id.index())
    }

    /// Get a chip by id, panicking if it was never registered.
    #[must_use]
    pub fn chip(&self, id: ChipId) -> &Chip {
        &self.chips[id.index()]
    }

    /// The chip's digest salt.
    #[must_use]
    pub fn salt(&self, id: ChipId) -> u64 {
        self.chip(id).salt
    }

    /// Owner of a chip, `None` for neutral chips.
    #[must_use]
    pub fn owner(&self, id: ChipId) -> Option<PlayerId> {
        self.chip(id).owner
    }

    /// Look up a chip by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ChipId> {
        self.names.get(name).copied()
    }

    /// First chip of `kind` owned by `player`.
    #[must_use]
    pub fn find_owned(&self, player: PlayerId, kind: ChipKind) -> Option<ChipId> {
        self.chips
            .iter()
            .find(|c| c.kind == kind && c.is_owned_by(player))
            .map(|c| c.id)
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// Iterate over all chips in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Chip> {
        self.chips.iter()
    }
}

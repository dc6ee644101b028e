//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting 1-255 players.
//!
//! ## PlayerMap
//!
//! A fixed row of per-seat values, indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The player who moves after this one in a game of `player_count`.
    ///
    /// ```
    /// use tabletop::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// The board keeps win flags, occupancy counts and captured piles in these.
///
/// ```
/// use tabletop::core::{PlayerId, PlayerMap};
///
/// let mut wins = PlayerMap::with_value(2, false);
/// wins[PlayerId::new(1)] = true;
/// assert_eq!(wins.iter().filter(|(_, &won)| won).count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T: Clone> PlayerMap<T> {
    /// Panics on zero players or more than 255.
    pub fn with_value(player_count: usize, value: T) -> Self {
        assert!(
            (1..=255).contains(&player_count),
            "player count {} outside 1..=255",
            player_count
        );
        Self { seats: vec![value; player_count] }
    }

    /// Reset every seat to `value`.
    pub fn fill(&mut self, value: T) {
        self.seats.fill(value);
    }
}

impl<T> PlayerMap<T> {
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// Seats in player order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.seats[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p1), "P1");
    }

    #[test]
    fn test_player_next_wraps() {
        assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
        assert_eq!(PlayerId::new(0).next(3), PlayerId::new(1));
    }

    #[test]
    fn test_player_map_fill() {
        let mut map = PlayerMap::with_value(3, true);
        map.fill(false);

        assert!(map.iter().all(|(_, v)| !*v));
    }

    #[test]
    fn test_player_map_index_and_iter() {
        let mut map = PlayerMap::with_value(3, Vec::new());
        map[PlayerId::new(2)].push(7);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(map.player_count(), 3);
        assert_eq!(pairs[0], (PlayerId::new(0), &vec![]));
        assert_eq!(pairs[2], (PlayerId::new(2), &vec![7]));
    }

    #[test]
    fn test_player_map_serialization() {
        let mut map = PlayerMap::with_value(2, 1u32);
        map[PlayerId::new(1)] = 2;
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "outside 1..=255")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}

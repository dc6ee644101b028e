//! Deterministic 64-bit board digests.
//!
//! Every contribution is read from `DigestRng::salt`, a pure function of
//! (seed, lane, index). Nothing is threaded through the calls, so two boards
//! with the same logical content hash identically in any process.
//!
//! Cells use their id as the lane. Board-level values use lanes counted down
//! from the top of the range, clear of any cell id and of the chip lane.

use super::Board;
use crate::core::DigestRng;
use crate::rules::Rules;

const AUX_BASE: u64 = u64::MAX - 1024;

const TURN: u64 = 0;
const STATE: u64 = 1;
const FLOATING: u64 = 2;
const MOVE_NUMBER: u64 = 3;
const REVISION: u64 = 4;
const SWAP: u64 = 5;
const WIN: u64 = 6;
const UNRESIGN: u64 = 7;
const PLAYERS: u64 = 8;
const SOURCE: u64 = 9;
/// One lane per player from here on.
const CAPTURED: u64 = 16;

fn aux(seed: u64, lane: u64, index: u64) -> u64 {
    DigestRng::salt(seed, AUX_BASE + lane, index)
}

impl<R: Rules> Board<R> {
    /// Digest of the complete logical board state.
    ///
    /// Covers cell contents and stamps, whose turn it is, the state, the
    /// chip in hand and where it came from, the move number, pending
    /// resignation, win flags and captured piles.
    #[must_use]
    pub fn digest(&self) -> u64 {
        let seed = self.config.digest_seed;
        let mut v = self.common_digest(seed);
        for cell in self.grid.cells() {
            v ^= cell.hash_contribution(&self.registry, seed);
        }

        v ^= aux(seed, STATE, self.state.ordinal() as u64);
        v ^= aux(seed, MOVE_NUMBER, 0).wrapping_mul(u64::from(self.move_number) + 1);
        if let Some(previous) = self.unresign {
            v ^= aux(seed, UNRESIGN, previous.ordinal() as u64);
        }
        for (player, &won) in self.win.iter() {
            if won {
                v ^= aux(seed, WIN, player.index() as u64);
            }
        }
        if let Some(source) = self.pick_source() {
            v ^= aux(seed, SOURCE, u64::from(source.0));
        }
        v
    }

    /// Digest of the position alone: chips, captured piles and the player to
    /// move. Two boards reached by different move orders share it.
    #[must_use]
    pub fn position_digest(&self) -> u64 {
        let seed = self.config.digest_seed;
        self.grid
            .cells()
            .fold(self.common_digest(seed), |acc, cell| {
                acc ^ cell.occupancy_contribution(&self.registry, seed)
            })
    }

    fn common_digest(&self, seed: u64) -> u64 {
        let mut v = aux(seed, TURN, self.whose_turn.index() as u64);
        v ^= aux(seed, REVISION, u64::from(self.init.revision));
        v ^= aux(seed, PLAYERS, self.init.players as u64);
        if self.swapped {
            v ^= aux(seed, SWAP, 0);
        }
        if let Some(chip) = self.picked {
            v ^= aux(seed, FLOATING, 0).wrapping_mul(self.registry.salt(chip) | 1);
        }
        for (player, pile) in self.captured.iter() {
            let lane = CAPTURED + player.index() as u64;
            for (i, &chip) in pile.iter().enumerate() {
                v ^= self.registry.salt(chip).wrapping_mul(aux(seed, lane, i as u64) | 1);
            }
        }
        v ^ self.rules.aux_digest(self)
    }
}

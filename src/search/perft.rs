//! Exhaustive and random tree walks over a `SearchAdapter`.
//!
//! These are the engine's own search drivers: node counting for move
//! generators, a make/unmake self-check, and random playouts.

use std::time::Instant;

use super::stats::WalkStats;
use super::SearchAdapter;
use crate::core::error::fatal;
use crate::core::DigestRng;
use crate::rules::GameResult;

/// Count the leaf positions `depth` plies below the current one.
///
/// Positions where the game is over count as leaves.
pub fn perft<S: SearchAdapter>(state: &mut S, depth: u32) -> u64 {
    if depth == 0 || state.outcome().is_some() {
        return 1;
    }
    let moves = state.legal_moves();
    if moves.is_empty() {
        return 1;
    }
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut total = 0;
    for m in &moves {
        state.make_move(m);
        total += perft(state, depth - 1);
        state.unmake_move(m);
    }
    total
}

/// Walk every line to `depth` plies, checking after each unmake that the
/// digest is the one from before the make.
///
/// Panics on the first mismatch.
pub fn check_inverse<S: SearchAdapter>(state: &mut S, depth: u32) -> WalkStats {
    let start = Instant::now();
    let mut stats = WalkStats::new();
    walk(state, depth, 0, &mut stats);
    stats.time_us = start.elapsed().as_micros() as u64;
    tracing::debug!(nodes = stats.nodes, depth, "inverse check passed");
    stats
}

fn walk<S: SearchAdapter>(state: &mut S, depth: u32, ply: u32, stats: &mut WalkStats) {
    stats.reached(ply);
    if state.outcome().is_some() {
        stats.terminals += 1;
        return;
    }
    if ply == depth {
        stats.leaves += 1;
        return;
    }
    for m in state.legal_moves() {
        let before = state.digest();
        let player = state.current_player();
        state.make_move(&m);
        stats.nodes += 1;
        walk(state, depth, ply + 1, stats);
        state.unmake_move(&m);

        let after = state.digest();
        if after != before || state.current_player() != player {
            fatal!(
                "unmake of {:?} at ply {} changed the board: {:#018x} -> {:#018x}",
                m,
                ply,
                before,
                after
            );
        }
    }
}

/// A finished random game.
#[derive(Clone, Debug)]
pub struct Playout<M> {
    pub moves: Vec<M>,
    /// `None` if the ply limit was reached first.
    pub outcome: Option<GameResult>,
    /// Digest of the final position.
    pub digest: u64,
}

/// Play uniformly random moves until the game ends or `max_plies` moves
/// have been made, then unmake them all.
///
/// The state is left exactly as it was found.
pub fn random_playout<S: SearchAdapter>(
    state: &mut S,
    rng: &mut DigestRng,
    max_plies: usize,
) -> Playout<S::Move> {
    let mut moves = Vec::new();
    while moves.len() < max_plies && state.outcome().is_none() {
        let legal = state.legal_moves();
        let Some(m) = rng.choose(&legal).cloned() else { break };
        state.make_move(&m);
        moves.push(m);
    }
    let outcome = state.outcome();
    let digest = state.digest();
    for m in moves.iter().rev() {
        state.unmake_move(m);
    }
    Playout { moves, outcome, digest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, ReplayMode};
    use crate::core::{BoardConfig, Move, MoveKind, PlayerId};
    use crate::games::{Breakthrough, Hex};

    fn breakthrough(init: &str) -> Board<Breakthrough> {
        let config = BoardConfig::default().with_verify_unmake(true);
        let mut board = Board::with_config(Breakthrough::new(), init, config).unwrap();
        board.execute(&Move::new(PlayerId::new(0), MoveKind::Start), ReplayMode::Live);
        board
    }

    #[test]
    fn test_perft_counts() {
        let mut board = breakthrough("breakthrough-6 2 1 100");
        assert_eq!(perft(&mut board, 0), 1);
        assert_eq!(perft(&mut board, 1), 16);
        // no first move interacts with the opponent's reply on a 6x6 board
        assert_eq!(perft(&mut board, 2), 256);
    }

    #[test]
    fn test_perft_hex() {
        let mut board = Board::new(Hex::new(), "hex 2 1 100").unwrap();
        board.execute(&Move::new(PlayerId::new(0), MoveKind::Start), ReplayMode::Live);
        assert_eq!(perft(&mut board, 2), 49 * 48);
    }

    #[test]
    fn test_perft_hex_with_swap() {
        let mut board = Board::new(Hex::new(), "hex 2 1 101").unwrap();
        board.execute(&Move::new(PlayerId::new(0), MoveKind::Start), ReplayMode::Live);
        // the reply to every opening may also be a swap
        assert_eq!(perft(&mut board, 2), 49 * 49);
    }

    #[test]
    fn test_check_inverse() {
        let mut board = breakthrough("breakthrough-6 2 1 100");
        let before = board.digest();
        let stats = check_inverse(&mut board, 3);
        assert_eq!(stats.max_depth, 3);
        assert!(stats.nodes > 256);
        assert_eq!(board.digest(), before);
        assert_eq!(board.robot_depth(), 0);
    }

    #[test]
    fn test_random_playout_restores_board() {
        let mut board = breakthrough("game 2 12345 100");
        let before = board.clone();
        let mut rng = DigestRng::new(99);
        let playout = random_playout(&mut board, &mut rng, 500);
        assert!(playout.outcome.is_some());
        assert!(!playout.moves.is_empty());
        before.same_board(&board);
    }

    #[test]
    fn test_random_playout_is_deterministic() {
        let mut board = breakthrough("breakthrough 2 3 100");
        let a = random_playout(&mut board, &mut DigestRng::new(5), 40);
        let b = random_playout(&mut board, &mut DigestRng::new(5), 40);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.digest, b.digest);
    }
}

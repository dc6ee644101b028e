//! Robot make/unmake tests.
//!
//! A single board serves a whole search tree: every robot move must be
//! undone exactly, in reverse order, however deep the stack.

use proptest::prelude::*;

use tabletop::board::{Board, ReplayMode};
use tabletop::core::{BoardConfig, DigestRng, Move, MoveKind, PlayerId};
use tabletop::games::{Breakthrough, Hex};
use tabletop::search::{check_inverse, SearchAdapter};

fn started<R: tabletop::Rules>(rules: R, init: &str) -> Board<R> {
    let config = BoardConfig::default().with_verify_unmake(true);
    let mut board = Board::with_config(rules, init, config).unwrap();
    board.execute(&Move::new(PlayerId::new(0), MoveKind::Start), ReplayMode::Live);
    board
}

/// Two makes, two unmakes.
#[test]
fn test_two_makes_two_unmakes() {
    let mut board = started(Breakthrough::new(), "game 2 12345 100");
    let digest = board.digest();
    let turn = board.whose_turn();

    let m1 = board.parse_move("move P0 A 1 B 2").unwrap();
    board.robot_execute(&m1);
    let m2 = board.parse_move("move P1 C 8 C 7").unwrap();
    board.robot_execute(&m2);
    assert_eq!(board.robot_depth(), 2);
    assert_eq!(board.move_number(), 3);

    board.robot_unexecute(&m2);
    board.robot_unexecute(&m1);
    assert_eq!(board.digest(), digest);
    assert_eq!(board.whose_turn(), turn);
    assert_eq!(board.move_number(), 1);
}

#[test]
fn test_robot_history_is_restored() {
    let mut board = started(Breakthrough::new(), "game 2 12345 100");
    let history = board.history().clone();
    let m = board.parse_move("move P0 A 1 A 2").unwrap();
    board.robot_execute(&m);
    assert_eq!(board.history().len(), history.len() + 2);
    board.robot_unexecute(&m);
    assert_eq!(board.history(), &history);
}

#[test]
fn test_inverse_walk_breakthrough() {
    let mut board = started(Breakthrough::new(), "breakthrough 2 1 100");
    let stats = check_inverse(&mut board, 2);
    assert_eq!(stats.leaves, 22 * 22);
}

#[test]
fn test_inverse_walk_hex_with_swap() {
    let mut board = started(Hex::new(), "hex 2 1 101");
    let stats = check_inverse(&mut board, 2);
    assert_eq!(stats.leaves, 49 * 49);
}

#[test]
fn test_adapter_reports_outcome() {
    let mut board = started(Breakthrough::new(), "game 2 12345 100");
    let resign = Move::new(PlayerId::new(0), MoveKind::Resign);
    board.make_move(&resign);
    let outcome = SearchAdapter::outcome(&board).unwrap();
    assert!(outcome.is_winner(PlayerId::new(1)));
    assert!(SearchAdapter::legal_moves(&board).is_empty());
    board.unmake_move(&resign);
    assert!(SearchAdapter::outcome(&board).is_none());
}

proptest! {
    /// Any random line of play unwinds to the starting board.
    #[test]
    fn prop_random_line_unwinds(seed in 0u64..10_000, plies in 1usize..60) {
        let mut board = started(Breakthrough::new(), "breakthrough 2 5 100");
        let reference = board.clone();
        let mut rng = DigestRng::new(seed);
        let mut made = Vec::new();

        for _ in 0..plies {
            let moves = SearchAdapter::legal_moves(&board);
            let Some(m) = rng.choose(&moves).copied() else { break };
            board.make_move(&m);
            made.push(m);
        }
        for m in made.iter().rev() {
            board.unmake_move(m);
        }

        prop_assert_eq!(board.digest(), reference.digest());
        prop_assert_eq!(board.whose_turn(), reference.whose_turn());
        prop_assert_eq!(board.move_number(), reference.move_number());
        prop_assert_eq!(board.state(), reference.state());
    }

    /// Every legal move is accepted by the board.
    #[test]
    fn prop_generated_moves_are_accepted(seed in 0u64..10_000) {
        let mut board = started(Hex::new(), "hex 2 9 101");
        let mut rng = DigestRng::new(seed);
        for _ in 0..20 {
            let moves = SearchAdapter::legal_moves(&board);
            let Some(&m) = rng.choose(&moves) else { break };
            board.make_move(&m);
            prop_assert_eq!(board.tentative_depth(), 0);
        }
    }
}

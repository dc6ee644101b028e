//! Transaction engine tests.
//!
//! Gestures are assembled from picks and drops, and every step can be taken
//! back exactly. These tests drive the engine through the bundled games.

use tabletop::board::{Board, ReplayMode};
use tabletop::core::{Move, MoveKind, PlayerId};
use tabletop::games::{Breakthrough, Hex};
use tabletop::state::BoardState;
use tabletop::topology::{CellId, Coord};

fn run<R: tabletop::Rules>(board: &mut Board<R>, lines: &[&str]) {
    for line in lines {
        let m = board.parse_move(line).unwrap();
        board.execute(&m, ReplayMode::Live);
    }
}

fn cell<R: tabletop::Rules>(board: &Board<R>, label: &str) -> CellId {
    board.grid().cell_at(Coord::from_label(label).unwrap()).unwrap()
}

/// Pick A1, drop B2, done.
#[test]
fn test_pick_drop_done_changes_digest() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    assert_eq!(board.state(), BoardState::Puzzle);
    run(&mut board, &["start P0"]);
    let before = board.digest();

    run(&mut board, &["pickb P0 A 1", "dropb P0 B 2"]);
    assert_eq!(board.state(), BoardState::Confirm);
    assert_eq!(board.tentative_depth(), 2);

    run(&mut board, &["done P0"]);
    assert_eq!(board.state(), BoardState::Play);
    assert_eq!(board.whose_turn(), PlayerId::new(1));
    assert_eq!(board.tentative_depth(), 0);
    assert_ne!(board.digest(), before);
}

/// Pick A1, drop B2, then undrop and unpick.
#[test]
fn test_undo_in_reverse_restores_digest() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    run(&mut board, &["start P0"]);
    let before = board.digest();
    let (a1, b2) = (cell(&board, "A1"), cell(&board, "B2"));

    board.pick(a1);
    board.drop(b2);
    assert_ne!(board.digest(), before);
    board.undrop();
    board.unpick();

    assert_eq!(board.digest(), before);
    assert_eq!(board.tentative_depth(), 0);
    assert!(board.picked().is_none());
}

#[test]
fn test_any_balanced_sequence_restores_digest() {
    let mut board = Board::new(Breakthrough::new(), "breakthrough 2 7 100").unwrap();
    run(&mut board, &["start P0"]);
    let before = board.digest();

    // pick, drop, re-pick, drop elsewhere, then unwind everything
    let (b2, b3, c3) = (cell(&board, "B2"), cell(&board, "B3"), cell(&board, "C3"));
    board.pick(b2);
    board.drop(b3);
    board.undrop();
    board.drop(c3);
    board.undrop();
    board.unpick();
    assert_eq!(board.digest(), before);
}

#[test]
fn test_gesture_then_take_back_is_pruned_from_history() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    run(&mut board, &["start P0", "pickb P0 A 1", "dropb P0 B 2", "pickb P0 B 2", "dropb P0 A 1"]);
    assert_eq!(board.state(), BoardState::Play);
    assert_eq!(board.history().len(), 1);

    run(&mut board, &["move P0 D 1 D 2", "done P0"]);
    assert_eq!(board.history().lines(), ["1 start P0", "2 move P0 D 1 D 2", "3 done P0"]);
}

#[test]
fn test_reserve_gestures() {
    let mut board = Board::new(Hex::new(), "hex 2 4 100").unwrap();
    let reserve = board.grid().reserve(0).unwrap();
    let stock = board.grid().cell(reserve).height();

    run(&mut board, &["start P0", "pick P0 0", "dropb P0 G 7"]);
    assert_eq!(board.grid().cell(reserve).height(), stock - 1);
    run(&mut board, &["pickb P0 G 7", "drop P0 0"]);
    assert_eq!(board.grid().cell(reserve).height(), stock);
    assert!(!board.has_tentative());
    assert_eq!(board.state(), BoardState::Play);
}

#[test]
fn test_edit_abandons_gesture() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    run(&mut board, &["start P0", "pickb P0 A 1", "edit P0"]);
    assert_eq!(board.state(), BoardState::Puzzle);
    assert!(board.picked().is_none());
    assert_eq!(board.grid().cell(cell(&board, "A1")).height(), 1);
}

#[test]
fn test_start_unwinds_gesture() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    run(&mut board, &["start P0"]);
    let before = board.position_digest();
    run(&mut board, &["pickb P0 A 1", "dropb P0 B 2", "start P0"]);
    assert_eq!(board.state(), BoardState::Play);
    assert_eq!(board.position_digest(), before);
}

#[test]
#[should_panic(expected = "not legal in state")]
fn test_move_after_game_over_panics() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    run(&mut board, &["start P0", "resign P0", "done P0"]);
    assert_eq!(board.state(), BoardState::Gameover);
    board.execute(&Move::new(PlayerId::new(1), MoveKind::Pass), ReplayMode::Live);
}

#[test]
#[should_panic(expected = "not a legal destination")]
fn test_illegal_drop_panics() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    run(&mut board, &["start P0", "pickb P0 A 1", "dropb P0 A 3"]);
}

#[test]
fn test_animations_follow_drops() {
    let mut board = Board::new(Breakthrough::new(), "game 2 12345 100").unwrap();
    run(&mut board, &["start P0", "move P0 A 1 B 2"]);
    let (a1, b2) = (cell(&board, "A1"), cell(&board, "B2"));
    assert_eq!(board.take_animations(), vec![(a1, b2)]);
}

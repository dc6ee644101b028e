//! Replay and game record tests.
//!
//! Replaying a history into a fresh board must reproduce the live board's
//! digest exactly.

use tabletop::board::{Board, ReplayMode};
use tabletop::core::{BoardConfig, DigestRng, InitError, RecordError};
use tabletop::games::{Breakthrough, Hex};
use tabletop::record::GameRecord;
use tabletop::search::SearchAdapter;
use tabletop::state::BoardState;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Play a random game through the live gesture path.
fn live_game<R: tabletop::Rules>(rules: R, init: &str, seed: u64, plies: usize) -> Board<R> {
    let mut board = Board::new(rules, init).unwrap();
    let start = board.parse_move("start P0").unwrap();
    board.execute(&start, ReplayMode::Live);

    let mut rng = DigestRng::new(seed);
    for _ in 0..plies {
        let moves = SearchAdapter::legal_moves(&board);
        let Some(&m) = rng.choose(&moves) else { break };
        board.execute(&m, ReplayMode::Live);
        if board.state().is_done_state() {
            let done = board.parse_move(&format!("done {}", m.player)).unwrap();
            board.execute(&done, ReplayMode::Live);
        }
    }
    board
}

#[test]
fn test_replay_matches_live_breakthrough() {
    init_tracing();
    for seed in 0..5 {
        let live = live_game(Breakthrough::new(), "breakthrough 2 77 100", seed, 200);
        let lines = live.history().lines();
        let replayed = Board::replay(
            Breakthrough::new(),
            BoardConfig::default(),
            "breakthrough 2 77 100",
            lines.iter().map(String::as_str),
        )
        .unwrap();
        assert_eq!(replayed.digest(), live.digest(), "seed {}", seed);
        assert_eq!(replayed.state(), live.state());
    }
}

#[test]
fn test_replay_matches_live_hex() {
    init_tracing();
    let live = live_game(Hex::new(), "hex 2 3 101", 11, 200);
    assert_eq!(live.state(), BoardState::Gameover);
    let record = GameRecord::from_board(&live);
    let replayed = record.verify(Hex::new(), BoardConfig::default()).unwrap();
    assert_eq!(replayed.outcome(), live.outcome());
    assert_eq!(replayed.is_swapped(), live.is_swapped());
}

#[test]
fn test_independent_boards_agree() {
    let a = live_game(Breakthrough::new(), "game 2 12345 100", 9, 30);
    let b = live_game(Breakthrough::new(), "game 2 12345 100", 9, 30);
    assert_eq!(a.digest(), b.digest());
    assert!(a.same_position(&b));
}

#[test]
fn test_damaged_record_is_tolerated() {
    let lines = ["start P0", "move P0 A 1 B 2", "done P0", "done P0", "move P1 A 8 A 7", "done P1"];
    let board = Board::replay(
        Breakthrough::new(),
        BoardConfig::default(),
        "game 2 12345 100",
        lines,
    )
    .unwrap();
    assert_eq!(board.move_number(), 3);
    // the duplicate done is skipped, not recorded
    assert_eq!(board.history().len(), 5);
}

#[test]
fn test_replay_skips_blank_lines() {
    let lines = ["start P0", "", "   ", "move P0 A 1 B 2", "done P0"];
    let board = Board::replay(Breakthrough::new(), BoardConfig::default(), "game 2 1 100", lines).unwrap();
    assert_eq!(board.history().len(), 3);
}

#[test]
fn test_bad_init_is_reported() {
    let err = Board::replay(Breakthrough::new(), BoardConfig::default(), "game two 1 100", std::iter::empty::<&str>())
        .unwrap_err();
    assert!(matches!(
        err,
        RecordError::Init(InitError::BadNumber { field: "playerCount", .. })
    ));
}

#[test]
fn test_record_json_round_trip() {
    let live = live_game(Breakthrough::new(), "game 2 12345 100", 4, 12);
    let record = GameRecord::from_board(&live);
    let json = serde_json::to_string(&record).unwrap();
    let back: GameRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
    assert!(back.verify(Breakthrough::new(), BoardConfig::default()).is_ok());
}

#[test]
fn test_record_with_other_digest_seed() {
    let config = BoardConfig::default().with_digest_seed(12);
    let mut board = Board::with_config(Breakthrough::new(), "game 2 12345 100", config).unwrap();
    let start = board.parse_move("start P1").unwrap();
    board.execute(&start, ReplayMode::Live);
    let record = GameRecord::from_board(&board);
    assert_eq!(record.digest_seed, 12);
    // verification uses the record's seed, not the caller's
    assert!(record.verify(Breakthrough::new(), BoardConfig::default()).is_ok());
}

//! Board tests - grid invariants, detection and gravity

use tui_match3::core::{Axis, Board, BoardError, Config, SimpleRng};
use tui_match3::types::{Mode, PieceType, Position};

fn p(row: i16, column: i16) -> Position {
    Position::new(row, column)
}

#[test]
fn test_setup_is_match_free_for_every_mode() {
    for mode in Mode::ALL {
        for seed in 1..20 {
            let config = Config {
                mode,
                ..Config::default()
            };
            let mut rng = SimpleRng::new(seed);
            let mut board = Board::default();
            board.setup(&config, &mut rng);

            assert!(board.is_full(), "seed {} mode {}", seed, mode);
            assert!(
                board.find_matches().is_empty(),
                "seed {} mode {}:\n{}",
                seed,
                mode,
                board
            );
            assert!(board
                .cells()
                .iter()
                .flatten()
                .all(|t| mode.plain_types().contains(t)));
        }
    }
}

#[test]
fn test_setup_is_deterministic_per_seed() {
    let config = Config::default();
    let mut a = Board::default();
    let mut b = Board::default();
    a.setup(&config, &mut SimpleRng::new(42));
    b.setup(&config, &mut SimpleRng::new(42));
    assert_eq!(a, b);
}

#[test]
fn test_swap_is_an_involution() {
    let mut rng = SimpleRng::new(7);
    let mut board = Board::default();
    board.setup(&Config::default(), &mut rng);
    let original = board.clone();

    for pos in original.positions() {
        for other in original.neighbors(pos) {
            board.swap(pos, other).unwrap();
            board.swap(pos, other).unwrap();
            assert_eq!(board, original);
        }
    }
}

#[test]
fn test_swap_errors() {
    let mut board = Board::from_rows(&["DFN", "FDN", "DNF"]).unwrap();
    assert_eq!(
        board.swap(p(0, 0), p(1, 1)),
        Err(BoardError::NotAdjacent(p(0, 0), p(1, 1)))
    );
    assert_eq!(
        board.swap(p(0, 2), p(0, 3)),
        Err(BoardError::OutOfBounds(p(0, 3)))
    );
}

#[test]
fn test_from_rows_errors() {
    assert_eq!(Board::from_rows(&[]), Err(BoardError::EmptyLayout));
    assert!(matches!(
        Board::from_rows(&["DF", "D"]),
        Err(BoardError::RaggedRow { row: 1, .. })
    ));
    assert_eq!(
        Board::from_rows(&["DX"]),
        Err(BoardError::UnknownGlyph('X'))
    );
}

#[test]
fn test_find_matches_groups_shared_cells() {
    // An L: row 2 DDD and column 0 DDD share (2,0).
    let board = Board::from_rows(&["DFN", "DNF", "DDD"]).unwrap();
    let matches = board.find_matches();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.len(), 5);
    assert!(m.is_branching());
    assert_eq!(m.intersection(), Some(p(2, 0)));
    assert_eq!(m.piece, PieceType::Dragon);
}

#[test]
fn test_find_matches_keeps_separate_groups_apart() {
    let board = Board::from_rows(&["DDDF", "NFNF", "NNNF"]).unwrap();
    let matches = board.find_matches();
    assert_eq!(matches.len(), 3);
    let sizes: Vec<usize> = matches.iter().map(|m| m.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3]);
    assert_eq!(matches[1].runs[0].axis, Axis::Vertical);
}

#[test]
fn test_specials_never_match() {
    let board = Board::from_rows(&["---", "DFN", "***"]).unwrap();
    assert!(board.find_matches().is_empty());
    assert!(!board.has_any_match());
}

#[test]
fn test_collapse_then_refill() {
    let config = Config {
        rows: 3,
        columns: 3,
        mode: Mode::Test,
        ..Config::default()
    };
    let mut board = Board::from_rows(&["DFN", "F.N", "..F"]).unwrap();
    let moved = board.collapse();
    assert_eq!(moved, 3);
    assert_eq!(board.to_rows(), vec!["..N", "D.N", "FFF"]);

    let filled = board.refill(&config, &mut SimpleRng::new(3));
    assert_eq!(filled.len(), 3);
    assert!(board.is_full());
    assert_eq!(board.get(p(2, 0)), Some(PieceType::Frog));
}

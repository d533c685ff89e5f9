//! Tests for board-file parsing and the wire format.

use memory_scramble::{Board, Cell, ParseError};

const DEMO: &str = "3x3\n🦄\n🦄\n🌈\n🌈\n⭐\n⭐\n☀\n☀\n🌙";

#[tokio::test]
async fn test_parsed_board_starts_fresh() {
    let board = Board::parse(DEMO).expect("demo board parses");
    assert_eq!(board.rows(), 3);
    assert_eq!(board.cols(), 3);
    assert_eq!(board.version().await, 0);

    let view = board.snapshot().await;
    assert_eq!(view.cells.len(), 9);
    assert!(view.players.is_empty());
    for cell in &view.cells {
        assert!(matches!(cell, Cell::Card { .. }));
        assert_eq!(cell.controller(), None);
    }
    assert_eq!(
        board.look("anyone").await.expect("look"),
        "3x3\ndown\ndown\ndown\ndown\ndown\ndown\ndown\ndown\ndown"
    );
}

#[tokio::test]
async fn test_round_trip_reproduces_layout() {
    let board = Board::parse(DEMO).expect("demo board parses");
    let view = board.snapshot().await;

    // Rebuild the on-disk form from the card values and re-parse it.
    let mut rebuilt = format!("{}x{}", view.rows, view.cols);
    for cell in &view.cells {
        rebuilt.push('\n');
        rebuilt.push_str(cell.value().expect("fresh board has no empty cells"));
    }
    assert_eq!(rebuilt, DEMO);

    let reparsed = Board::parse(&rebuilt).expect("rebuilt board parses");
    assert_eq!(reparsed.snapshot().await.cells, view.cells);
}

#[test]
fn test_single_cell_board() {
    let board = Board::parse("1x1\nlonely").expect("parses");
    assert_eq!(board.rows(), 1);
    assert_eq!(board.cols(), 1);
}

#[test]
fn test_wide_and_tall_boards() {
    assert!(Board::parse("1x4\na\nb\na\nb").is_ok());
    assert!(Board::parse("4x1\na\nb\na\nb").is_ok());
}

#[test]
fn test_grammar_violations() {
    // Missing header.
    assert!(matches!(Board::parse("🦄\n🦄"), Err(ParseError::Header(_))));
    // Card count disagrees with the header.
    assert!(matches!(
        Board::parse("2x2\na\na\nb"),
        Err(ParseError::CardCount { expected: 4, found: 3 })
    ));
    // Blank line before the last card.
    assert!(matches!(
        Board::parse("2x1\na\n\na"),
        Err(ParseError::BlankLine(3))
    ));
    // Card with interior whitespace.
    assert!(matches!(
        Board::parse("1x1\ntwo words"),
        Err(ParseError::Card { line: 2, .. })
    ));
    // Extra cards after the promised count.
    assert!(matches!(
        Board::parse("1x1\na\nb"),
        Err(ParseError::Trailing(3))
    ));
}

#[test]
fn test_trailing_blank_lines_tolerated() {
    assert!(Board::parse("1x1\na\n").is_ok());
    assert!(Board::parse("1x1\na\n\n\n").is_ok());
}

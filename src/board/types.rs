//! Core domain types for the Memory Scramble board.

use crate::board::error::BoardError;
use crate::board::player::FinishedMove;
use serde::{Deserialize, Serialize};

/// Unique identifier for a player.
///
/// IDs are opaque tokens drawn from letters, digits, and underscore.
pub type PlayerId = String;

/// Tokens that would collide with the board string format.
const RESERVED_IDS: [&str; 4] = ["none", "down", "up", "my"];

/// Validates a player ID against the accepted alphabet.
///
/// IDs must be non-empty, contain only letters, digits, and underscore,
/// and must not be one of the reserved spot tokens.
///
/// # Errors
///
/// Returns `BoardError::InvalidPlayerId` for anything else.
pub(crate) fn validate_player_id(id: &str) -> Result<&str, BoardError> {
    let well_formed =
        !id.is_empty() && id.chars().all(|c| c.is_alphanumeric() || c == '_');
    if !well_formed || RESERVED_IDS.contains(&id) {
        return Err(BoardError::InvalidPlayerId(id.to_string()));
    }
    Ok(id)
}

/// Visibility state of a card on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// Value hidden.
    Down,
    /// Value visible.
    Up,
}

/// One square of the grid.
///
/// A cell starts as a face-down card and becomes `Empty` exactly once,
/// when a matched pair is removed. Control is an attribute of the card:
/// an `Empty` cell structurally cannot have a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// The card here was removed; the cell stays empty forever.
    Empty,
    /// A card is present.
    Card {
        /// The card's value: non-empty, no whitespace.
        value: String,
        /// Whether the value is currently visible.
        face: Face,
        /// The player holding this card in an open move, if any.
        controller: Option<PlayerId>,
    },
}

impl Cell {
    /// Creates a face-down, uncontrolled card.
    pub fn new_card(value: impl Into<String>) -> Self {
        Cell::Card {
            value: value.into(),
            face: Face::Down,
            controller: None,
        }
    }

    /// True if the card here has been removed.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The card's value, if a card is present.
    pub fn value(&self) -> Option<&str> {
        match self {
            Cell::Empty => None,
            Cell::Card { value, .. } => Some(value),
        }
    }

    /// The player controlling this cell, if any.
    pub fn controller(&self) -> Option<&str> {
        match self {
            Cell::Empty => None,
            Cell::Card { controller, .. } => controller.as_deref(),
        }
    }

    /// True if a player other than `player` controls this cell.
    pub fn controlled_by_other(&self, player: &str) -> bool {
        matches!(self.controller(), Some(owner) if owner != player)
    }

    /// Renders this cell as one spot of the board string, from the
    /// perspective of `viewer`.
    pub fn spot(&self, viewer: &str) -> String {
        match self {
            Cell::Empty => "none".to_string(),
            Cell::Card {
                face: Face::Down, ..
            } => "down".to_string(),
            Cell::Card {
                value, controller, ..
            } => {
                if controller.as_deref() == Some(viewer) {
                    format!("my {}", value)
                } else {
                    format!("up {}", value)
                }
            }
        }
    }
}

/// A player's move state as seen in a [`BoardView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// The player's ID.
    pub id: PlayerId,
    /// Positions currently controlled in the open move (0, 1, or 2).
    pub current: Vec<usize>,
    /// The completed move awaiting cleanup, if any.
    pub previous: Option<FinishedMove>,
}

/// A consistent snapshot of the whole board.
///
/// Views are freshly constructed on request; holding one never blocks or
/// aliases the live board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Cells in row-major order, `rows * cols` long.
    pub cells: Vec<Cell>,
    /// Every player seen so far, sorted by ID.
    pub players: Vec<PlayerView>,
}

impl BoardView {
    /// The cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row * self.cols + col]
    }
}

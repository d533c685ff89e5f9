//! Controlled-cell invariant: a controlled cell is a face-up card.

use super::Invariant;
use crate::board::types::{BoardView, Cell, Face};

/// Invariant: every controlled cell holds a face-up card.
///
/// An empty cell structurally has no controller; a card that is held by
/// a player in an open move must be showing its value. Cards only lose
/// their controller when released or removed, and both paths leave this
/// property intact.
pub struct ControlledFaceUp;

impl Invariant<BoardView> for ControlledFaceUp {
    fn holds(view: &BoardView) -> bool {
        view.cells.iter().all(|cell| match cell {
            Cell::Empty => true,
            Cell::Card {
                face, controller, ..
            } => controller.is_none() || *face == Face::Up,
        })
    }

    fn description() -> &'static str {
        "A controlled cell is a face-up card"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::PlayerView;

    fn view_of(cells: Vec<Cell>) -> BoardView {
        BoardView {
            rows: 1,
            cols: cells.len(),
            cells,
            players: Vec::<PlayerView>::new(),
        }
    }

    #[test]
    fn test_uncontrolled_board_holds() {
        let view = view_of(vec![Cell::Empty, Cell::new_card("A")]);
        assert!(ControlledFaceUp::holds(&view));
    }

    #[test]
    fn test_controlled_up_card_holds() {
        let view = view_of(vec![Cell::Card {
            value: "A".to_string(),
            face: Face::Up,
            controller: Some("alice".to_string()),
        }]);
        assert!(ControlledFaceUp::holds(&view));
    }

    #[test]
    fn test_controlled_down_card_violates() {
        let view = view_of(vec![Cell::Card {
            value: "A".to_string(),
            face: Face::Down,
            controller: Some("alice".to_string()),
        }]);
        assert!(!ControlledFaceUp::holds(&view));
    }
}

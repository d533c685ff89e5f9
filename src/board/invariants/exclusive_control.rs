//! Exclusive-control invariant: control relations are consistent and
//! unshared.

use super::Invariant;
use crate::board::types::BoardView;

/// Invariant: control is mutually consistent between cells and players.
///
/// Every position in a player's open move is a cell whose controller is
/// that player, no position appears in two players' open moves, and no
/// position appears in two players' pending cleanups.
pub struct ExclusiveControl;

impl Invariant<BoardView> for ExclusiveControl {
    fn holds(view: &BoardView) -> bool {
        let mut held = Vec::new();
        let mut pending = Vec::new();

        for player in &view.players {
            for &pos in &player.current {
                if view.cells.get(pos).map(|cell| cell.controller()) != Some(Some(player.id.as_str())) {
                    return false;
                }
                if held.contains(&pos) {
                    return false;
                }
                held.push(pos);
            }
            if let Some(previous) = &player.previous {
                for &pos in &previous.positions {
                    if pending.contains(&pos) {
                        return false;
                    }
                    pending.push(pos);
                }
            }
        }
        true
    }

    fn description() -> &'static str {
        "Control is exclusive and consistent between cells and players"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::player::FinishedMove;
    use crate::board::types::{Cell, Face, PlayerView};

    fn held_card(owner: &str) -> Cell {
        Cell::Card {
            value: "A".to_string(),
            face: Face::Up,
            controller: Some(owner.to_string()),
        }
    }

    fn player(id: &str, current: Vec<usize>) -> PlayerView {
        PlayerView {
            id: id.to_string(),
            current,
            previous: None,
        }
    }

    #[test]
    fn test_consistent_control_holds() {
        let view = BoardView {
            rows: 1,
            cols: 2,
            cells: vec![held_card("alice"), Cell::new_card("A")],
            players: vec![player("alice", vec![0]), player("bob", vec![])],
        };
        assert!(ExclusiveControl::holds(&view));
    }

    #[test]
    fn test_current_without_cell_control_violates() {
        let view = BoardView {
            rows: 1,
            cols: 2,
            cells: vec![Cell::new_card("A"), Cell::new_card("A")],
            players: vec![player("alice", vec![0])],
        };
        assert!(!ExclusiveControl::holds(&view));
    }

    #[test]
    fn test_shared_pending_cleanup_violates() {
        let finished = FinishedMove {
            positions: vec![0, 1],
            matched: false,
        };
        let mut alice = player("alice", vec![]);
        alice.previous = Some(finished.clone());
        let mut bob = player("bob", vec![]);
        bob.previous = Some(finished);

        let view = BoardView {
            rows: 1,
            cols: 2,
            cells: vec![Cell::new_card("A"), Cell::new_card("A")],
            players: vec![alice, bob],
        };
        assert!(!ExclusiveControl::holds(&view));
    }
}

//! Move-arity invariant: an open move holds at most two cards.

use super::Invariant;
use crate::board::types::BoardView;

/// Invariant: a player controls 0, 1, or 2 cards, and a pair only of
/// equal values.
///
/// Two controlled cards occur only in the transient instant between
/// matching a second card and recording the finished move, and at that
/// instant both cards must hold the same value.
pub struct MoveArity;

impl Invariant<BoardView> for MoveArity {
    fn holds(view: &BoardView) -> bool {
        view.players.iter().all(|player| match player.current.as_slice() {
            [] | [_] => true,
            [first, second] => {
                let first = view.cells.get(*first).and_then(|cell| cell.value());
                let second = view.cells.get(*second).and_then(|cell| cell.value());
                first.is_some() && first == second
            }
            _ => false,
        })
    }

    fn description() -> &'static str {
        "An open move holds at most two cards, a pair only of equal values"
    }
}

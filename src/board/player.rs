//! Per-player move state.
//!
//! A move is a pair of flips: first card, then second card. Between moves
//! the player is idle, possibly with a completed move whose cleanup is
//! deferred to the start of their next move.

use serde::{Deserialize, Serialize};

/// A completed move that has not been cleaned up yet.
///
/// Cleanup runs at the start of the owning player's next move: a matched
/// pair is removed from the board, a non-matching pair is turned back
/// face down (unless claimed by someone else in the meantime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedMove {
    /// The cells the move touched, in flip order.
    pub positions: Vec<usize>,
    /// Whether the two cards matched.
    pub matched: bool,
}

/// A player's live move state, keyed by player ID in the board's table.
///
/// Created lazily on a player's first flip and kept for the lifetime of
/// the board.
#[derive(Debug, Clone, Default)]
pub(crate) struct MoveState {
    /// Positions controlled in the open move: 0 when idle, 1 while
    /// holding a first card. 2 occurs only transiently inside a flip.
    pub current: Vec<usize>,
    /// The completed move awaiting cleanup.
    pub previous: Option<FinishedMove>,
}

impl MoveState {
    /// Ends the open move: drops all controlled positions and records
    /// the finished move for deferred cleanup.
    pub fn finish(&mut self, positions: Vec<usize>, matched: bool) {
        self.current.clear();
        self.previous = Some(FinishedMove { positions, matched });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_clears_current() {
        let mut state = MoveState::default();
        state.current.push(4);
        state.finish(vec![4, 7], false);
        assert!(state.current.is_empty());
        assert_eq!(
            state.previous,
            Some(FinishedMove {
                positions: vec![4, 7],
                matched: false,
            })
        );
    }
}

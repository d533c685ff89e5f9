//! First-class invariants for the board.
//!
//! Invariants are logical properties that must hold after every public
//! board operation. They are testable independently against a
//! [`BoardView`] snapshot and double as documentation of the board's
//! guarantees; the engine checks them in debug builds after mutations.

use crate::board::types::BoardView;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

pub mod controlled_face_up;
pub mod exclusive_control;
pub mod move_arity;

pub use controlled_face_up::ControlledFaceUp;
pub use exclusive_control::ExclusiveControl;
pub use move_arity::MoveArity;

/// Checks every board invariant, returning descriptions of those that
/// fail (empty when the state is sound).
pub fn violations(view: &BoardView) -> Vec<&'static str> {
    let mut failed = Vec::new();
    if !ControlledFaceUp::holds(view) {
        failed.push(ControlledFaceUp::description());
    }
    if !ExclusiveControl::holds(view) {
        failed.push(ExclusiveControl::description());
    }
    if !MoveArity::holds(view) {
        failed.push(MoveArity::description());
    }
    failed
}

//! Memory Scramble - a concurrent matching game board.
//!
//! A grid of face-down cards holds pairs with equal values. Players,
//! identified by opaque string IDs, concurrently flip cards in
//! two-card moves; the board enforces the control and match rules,
//! blocks a flip while its target is held by another player, and wakes
//! observers whenever the visible state changes.
//!
//! # Architecture
//!
//! - **Board**: the shared ADT - `flip`, `look`, `map`, and `watch`
//!   under one lock, with typed waiter queues for parked operations
//! - **Invariants**: first-class, independently testable properties of
//!   board state, checked after every mutation in debug builds
//! - **Server**: a plain-text HTTP surface over a shared board
//!
//! # Example
//!
//! ```no_run
//! use memory_scramble::Board;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let board = Board::parse("1x2\nstar\nstar")?;
//! board.flip("alice", 0, 0).await?;
//! let view = board.flip("alice", 0, 1).await?;
//! assert!(view.contains("up star"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod cli;
mod server;

// Crate-level exports - Board ADT
pub use board::{
    Board, BoardError, BoardView, Cell, Face, FinishedMove, ParseError, PlayerId, PlayerView,
};

// Crate-level exports - Invariants
pub use board::invariants::{ControlledFaceUp, ExclusiveControl, Invariant, MoveArity};

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - HTTP surface
pub use server::{router, serve};

//! Plain-text HTTP surface over a shared board.
//!
//! Routes follow the game's text protocol: every response body is a
//! board string rendered for the requesting player. Rule failures keep
//! serving the player with a short diagnostic; malformed requests are
//! not found.

use crate::board::{Board, BoardError};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{debug, info, instrument, warn};

/// Builds the game router over a shared board.
pub fn router(board: Board) -> Router {
    Router::new()
        .route("/look/{player}", get(look))
        .route("/flip/{player}/{square}", get(flip))
        .route("/watch/{player}", get(watch))
        .with_state(board)
}

/// Binds `host:port` and serves the game router until the process
/// exits.
///
/// # Errors
///
/// Returns the bind or accept error from the listener.
#[instrument(skip(board))]
pub async fn serve(board: Board, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "serving board");
    axum::serve(listener, router(board)).await
}

/// `GET /look/{player}` - the player's current view.
#[instrument(skip(board))]
async fn look(State(board): State<Board>, Path(player): Path<String>) -> Response {
    reply(board.look(&player).await)
}

/// `GET /flip/{player}/{row},{col}` - the next flip in the player's
/// move. May long-poll while the target card is held by someone else.
#[instrument(skip(board))]
async fn flip(
    State(board): State<Board>,
    Path((player, square)): Path<(String, String)>,
) -> Response {
    let Some((row, col)) = parse_square(&square) else {
        warn!(square, "malformed square in flip request");
        return (
            StatusCode::NOT_FOUND,
            format!("malformed square {square:?}, expected ROW,COL"),
        )
            .into_response();
    };
    reply(board.flip(&player, row, col).await)
}

/// `GET /watch/{player}` - long-polls until the board changes, then
/// returns the player's fresh view.
#[instrument(skip(board))]
async fn watch(State(board): State<Board>, Path(player): Path<String>) -> Response {
    reply(board.watch(&player).await)
}

/// Parses the `ROW,COL` path segment.
fn parse_square(square: &str) -> Option<(usize, usize)> {
    let (row, col) = square.split_once(',')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

/// Maps a board result onto the wire: rule failures are conflicts the
/// player can react to, bad input is not found.
fn reply(result: Result<String, BoardError>) -> Response {
    match result {
        Ok(view) => view.into_response(),
        Err(
            err @ (BoardError::NoCardAtPosition { .. } | BoardError::CardControlledByOther { .. }),
        ) => {
            debug!(%err, "rule failure");
            (StatusCode::CONFLICT, err.to_string()).into_response()
        }
        Err(err) => {
            warn!(%err, "rejected request");
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
    }
}

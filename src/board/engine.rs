//! The Memory Scramble board: a concurrent, mutable matching-game grid.
//!
//! All mutable state lives behind one async mutex. An operation acquires
//! the lock, evaluates its rules, and either completes or parks itself on
//! a waiter queue after releasing the lock; on wake it re-acquires and
//! re-evaluates from the top. Second-card rules never wait, so every
//! parked flip is waiting on a single cell whose holder is not itself
//! waiting, and the board cannot deadlock.

use crate::board::error::BoardError;
use crate::board::invariants;
use crate::board::player::MoveState;
use crate::board::types::{validate_player_id, BoardView, Cell, Face, PlayerId, PlayerView};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, instrument, trace};

/// Concurrent board for the Memory Scramble matching game.
///
/// Cheap to clone; every clone addresses the same shared board. All
/// accessors return freshly built strings or snapshots, never the
/// backing grid.
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    state: Arc<Mutex<State>>,
}

/// Everything mutable, guarded by the board's one lock.
struct State {
    /// Cells in row-major order.
    cells: Vec<Cell>,
    /// Per-player move state, created lazily on first flip.
    players: HashMap<PlayerId, MoveState>,
    /// Bumped on every mutation visible through `look`.
    version: u64,
    /// Flips parked on a controlled cell, FIFO per cell.
    position_waiters: HashMap<usize, VecDeque<oneshot::Sender<()>>>,
    /// Watch calls parked until the next version bump.
    change_waiters: Vec<oneshot::Sender<()>>,
}

/// Outcome of one locked evaluation pass of a flip.
enum Step {
    /// The flip completed; render and return.
    Done,
    /// The target cell is held by someone else; wait for this handle.
    Park(oneshot::Receiver<()>),
}

impl Board {
    /// Builds a board from parts the parser has already validated:
    /// `rows * cols` values, each non-empty with no whitespace.
    pub(crate) fn from_parts(rows: usize, cols: usize, values: Vec<String>) -> Self {
        debug_assert!(rows >= 1 && cols >= 1);
        debug_assert_eq!(values.len(), rows * cols);
        let cells = values.into_iter().map(Cell::new_card).collect();
        Self {
            rows,
            cols,
            state: Arc::new(Mutex::new(State {
                cells,
                players: HashMap::new(),
                version: 0,
                position_waiters: HashMap::new(),
                change_waiters: Vec::new(),
            })),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The current change counter.
    ///
    /// Monotonically non-decreasing; strictly increases on every mutation
    /// that alters what any `look` could report.
    pub async fn version(&self) -> u64 {
        self.state.lock().await.version
    }

    /// A consistent snapshot of cells and player move states.
    pub async fn snapshot(&self) -> BoardView {
        let state = self.state.lock().await;
        self.view(&state)
    }

    // ─────────────────────────────────────────────────────────────
    //  look
    // ─────────────────────────────────────────────────────────────

    /// Returns the board as seen by `player`, in the wire format:
    /// a `ROWSxCOLS` line followed by one spot per cell in row-major
    /// order (`none`, `down`, `up VALUE`, or `my VALUE`).
    ///
    /// Never blocks on other players and never mutates; between two
    /// mutations repeated calls yield identical strings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlayerId` if the ID violates the alphabet.
    #[instrument(skip(self))]
    pub async fn look(&self, player: &str) -> Result<String, BoardError> {
        let player = validate_player_id(player)?;
        let state = self.state.lock().await;
        Ok(self.render(&state, player))
    }

    // ─────────────────────────────────────────────────────────────
    //  flip
    // ─────────────────────────────────────────────────────────────

    /// Attempts the next flip in `player`'s move sequence and returns
    /// their updated view of the board.
    ///
    /// An idle player's flip is a first card: it may suspend while the
    /// target is controlled by another player, retrying when the card is
    /// released or removed. A player holding one card flips a second
    /// card, which never suspends: it matches, mismatches, or fails
    /// permanently, releasing the first card on failure. Deferred
    /// cleanup of the player's previous move runs before a first card
    /// is evaluated.
    ///
    /// # Errors
    ///
    /// - `InvalidPlayerId` / `InvalidCoordinates`: rejected before any
    ///   state change.
    /// - `NoCardAtPosition`: the target cell is empty.
    /// - `CardControlledByOther`: the second-card target is held by
    ///   another player, or is the player's own first card.
    #[instrument(skip(self))]
    pub async fn flip(&self, player: &str, row: usize, col: usize) -> Result<String, BoardError> {
        let player = validate_player_id(player)?.to_owned();
        let pos = self.index_of(row, col)?;

        loop {
            let waiter = {
                let mut state = self.state.lock().await;
                let step = self.advance(&mut state, &player, pos, row, col);
                self.assert_invariants(&state);
                match step? {
                    Step::Done => {
                        debug!(version = state.version, "flip completed");
                        return Ok(self.render(&state, &player));
                    }
                    Step::Park(waiter) => waiter,
                }
            };
            trace!(pos, "flip parked on controlled card");
            // A dropped sender also wakes us; the re-evaluation below
            // decides what that means.
            let _ = waiter.await;
        }
    }

    /// One evaluation pass under the lock: dispatches to the first-card
    /// or second-card rules based on the player's move phase.
    fn advance(
        &self,
        state: &mut State,
        player: &str,
        pos: usize,
        row: usize,
        col: usize,
    ) -> Result<Step, BoardError> {
        let held = state
            .players
            .entry(player.to_owned())
            .or_default()
            .current
            .clone();

        match held.as_slice() {
            [] => {
                state.cleanup_previous(player);
                self.first_card(state, player, pos, row, col)
            }
            [first] => {
                let first = *first;
                self.second_card(state, player, first, pos, row, col)?;
                Ok(Step::Done)
            }
            _ => unreachable!("holding-matched state never persists between flips"),
        }
    }

    /// First-card rules. The only place a flip may suspend.
    fn first_card(
        &self,
        state: &mut State,
        player: &str,
        pos: usize,
        row: usize,
        col: usize,
    ) -> Result<Step, BoardError> {
        if state.cells[pos].is_empty() {
            return Err(BoardError::NoCardAtPosition { row, col });
        }
        if state.cells[pos].controlled_by_other(player) {
            let (tx, rx) = oneshot::channel();
            state.position_waiters.entry(pos).or_default().push_back(tx);
            return Ok(Step::Park(rx));
        }

        let turned_up = match &mut state.cells[pos] {
            Cell::Card { face, controller, .. } => {
                let turned_up = *face == Face::Down;
                *face = Face::Up;
                *controller = Some(player.to_owned());
                turned_up
            }
            Cell::Empty => unreachable!("checked non-empty above"),
        };
        state
            .players
            .get_mut(player)
            .expect("player entry created on dispatch")
            .current
            .push(pos);
        if turned_up {
            state.bump();
        }
        Ok(Step::Done)
    }

    /// Second-card rules. These never suspend: the flip matches,
    /// mismatches, or fails permanently while releasing the first card,
    /// which is what keeps waits acyclic.
    fn second_card(
        &self,
        state: &mut State,
        player: &str,
        first: usize,
        pos: usize,
        row: usize,
        col: usize,
    ) -> Result<(), BoardError> {
        // Flipping the held card again ends the move: the card stays
        // face up but is released.
        if pos == first {
            state.release_control(first);
            state
                .players
                .get_mut(player)
                .expect("player entry exists while holding a card")
                .finish(vec![first], false);
            state.bump();
            return Err(BoardError::CardControlledByOther { row, col });
        }

        if state.cells[pos].is_empty() {
            state.release_control(first);
            state
                .players
                .get_mut(player)
                .expect("player entry exists while holding a card")
                .finish(vec![first], false);
            state.bump();
            return Err(BoardError::NoCardAtPosition { row, col });
        }

        // Waiting here could deadlock two players each holding a card
        // the other wants, so a held target fails immediately.
        if state.cells[pos].controlled_by_other(player) {
            state.release_control(first);
            state
                .players
                .get_mut(player)
                .expect("player entry exists while holding a card")
                .finish(vec![first], false);
            state.bump();
            return Err(BoardError::CardControlledByOther { row, col });
        }

        let first_value = state.cells[first]
            .value()
            .expect("held card must be on the board")
            .to_owned();

        let (turned_up, matched) = match &mut state.cells[pos] {
            Cell::Card { value, face, .. } => {
                let turned_up = *face == Face::Down;
                *face = Face::Up;
                (turned_up, *value == first_value)
            }
            Cell::Empty => unreachable!("checked non-empty above"),
        };
        if turned_up {
            state.bump();
        }

        if matched {
            // Transient holding-matched state: take the pair, then let
            // go of both immediately. The cards stay face up and
            // uncontrolled until this player's next move removes them.
            if let Cell::Card { controller, .. } = &mut state.cells[pos] {
                *controller = Some(player.to_owned());
            }
            let mover = state
                .players
                .get_mut(player)
                .expect("player entry exists while holding a card");
            mover.current.push(pos);
            mover.finish(vec![first, pos], true);
            state.release_control(first);
            state.release_control(pos);
            info!(first, second = pos, "matched a pair");
        } else {
            state.release_control(first);
            state
                .players
                .get_mut(player)
                .expect("player entry exists while holding a card")
                .finish(vec![first, pos], false);
        }
        state.bump();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  map
    // ─────────────────────────────────────────────────────────────

    /// Rewrites every card value `v` to `transform(v)`, atomically with
    /// respect to every other operation.
    ///
    /// The transform runs once per distinct value; cells that held equal
    /// values before still hold equal values after. The board's lock is
    /// held across the transform's suspensions, so concurrent flips and
    /// looks observe only the fully pre-map or fully post-map board.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMappedValue` if the transform produces an empty
    /// or whitespace-containing value; no cell is rewritten in that case.
    #[instrument(skip(self, transform))]
    pub async fn map<F, Fut>(&self, transform: F) -> Result<(), BoardError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = String>,
    {
        let mut state = self.state.lock().await;

        let mut distinct: Vec<String> = Vec::new();
        for cell in &state.cells {
            if let Some(value) = cell.value() {
                if !distinct.iter().any(|seen| seen == value) {
                    distinct.push(value.to_owned());
                }
            }
        }

        let mut mapped = HashMap::with_capacity(distinct.len());
        for value in distinct {
            let out = transform(value.clone()).await;
            if out.is_empty() || out.chars().any(char::is_whitespace) {
                return Err(BoardError::InvalidMappedValue(out));
            }
            mapped.insert(value, out);
        }

        let mut changed = false;
        for cell in &mut state.cells {
            if let Cell::Card { value, .. } = cell {
                let next = &mapped[value.as_str()];
                if value != next {
                    value.clone_from(next);
                    changed = true;
                }
            }
        }
        if changed {
            state.bump();
        }
        self.assert_invariants(&state);
        debug!(changed, "map applied");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  watch
    // ─────────────────────────────────────────────────────────────

    /// Returns `player`'s view of the board after the next change.
    ///
    /// Samples the change counter on entry and suspends until it has
    /// strictly advanced, then re-renders. Every bump wakes every
    /// watcher, including one whose own flip caused the change; the
    /// level-triggered counter makes missed wakes harmless.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlayerId` if the ID violates the alphabet.
    #[instrument(skip(self))]
    pub async fn watch(&self, player: &str) -> Result<String, BoardError> {
        let player = validate_player_id(player)?.to_owned();
        let mut observed: Option<u64> = None;

        loop {
            let waiter = {
                let mut state = self.state.lock().await;
                match observed {
                    Some(since) if state.version > since => {
                        return Ok(self.render(&state, &player));
                    }
                    Some(_) => {}
                    None => observed = Some(state.version),
                }
                let (tx, rx) = oneshot::channel();
                state.change_waiters.push(tx);
                rx
            };
            trace!("watch parked until next change");
            let _ = waiter.await;
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Internal helpers
    // ─────────────────────────────────────────────────────────────

    /// Maps `(row, col)` to a linear index, rejecting out-of-range
    /// coordinates before any state is touched.
    fn index_of(&self, row: usize, col: usize) -> Result<usize, BoardError> {
        if row >= self.rows || col >= self.cols {
            return Err(BoardError::InvalidCoordinates { row, col });
        }
        Ok(row * self.cols + col)
    }

    /// Builds the wire-format board string for `viewer`.
    fn render(&self, state: &State, viewer: &str) -> String {
        let mut out = format!("{}x{}", self.rows, self.cols);
        for cell in &state.cells {
            out.push('\n');
            out.push_str(&cell.spot(viewer));
        }
        out
    }

    /// Builds a snapshot of the locked state.
    fn view(&self, state: &State) -> BoardView {
        let mut players: Vec<PlayerView> = state
            .players
            .iter()
            .map(|(id, moves)| PlayerView {
                id: id.clone(),
                current: moves.current.clone(),
                previous: moves.previous.clone(),
            })
            .collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        BoardView {
            rows: self.rows,
            cols: self.cols,
            cells: state.cells.clone(),
            players,
        }
    }

    /// Debug-build check that the board's structural invariants hold
    /// after a mutation.
    fn assert_invariants(&self, state: &State) {
        if cfg!(debug_assertions) {
            let failed = invariants::violations(&self.view(state));
            assert!(failed.is_empty(), "board invariants violated: {failed:?}");
        }
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("cells", &self.cells)
            .field("players", &self.players)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl State {
    /// Advances the change counter and wakes every change waiter.
    fn bump(&mut self) {
        self.version += 1;
        for waiter in self.change_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }

    /// Runs the deferred cleanup of `player`'s completed move, if any.
    /// Matched pairs are removed; non-matching cards are turned back
    /// face down unless someone else has claimed them since.
    fn cleanup_previous(&mut self, player: &str) {
        let Some(finished) = self
            .players
            .get_mut(player)
            .and_then(|moves| moves.previous.take())
        else {
            return;
        };

        let mut changed = false;
        if finished.matched {
            for &pos in &finished.positions {
                if !self.cells[pos].is_empty() {
                    self.remove_card(pos);
                    changed = true;
                }
            }
        } else {
            for &pos in &finished.positions {
                if let Cell::Card {
                    face: face @ Face::Up,
                    controller: None,
                    ..
                } = &mut self.cells[pos]
                {
                    *face = Face::Down;
                    changed = true;
                }
            }
        }
        if changed {
            self.bump();
        }
    }

    /// Removes a matched card from the board. Whoever controls the cell
    /// at this point loses it from their open move, and every flip
    /// parked on the cell is woken to fail with "no card here".
    fn remove_card(&mut self, pos: usize) {
        let owner = match &mut self.cells[pos] {
            Cell::Card { controller, .. } => controller.take(),
            Cell::Empty => None,
        };
        if let Some(owner) = owner {
            if let Some(moves) = self.players.get_mut(&owner) {
                moves.current.retain(|&held| held != pos);
            }
        }
        self.cells[pos] = Cell::Empty;
        self.wake_all_waiters(pos);
    }

    /// Clears the controller of `pos`, if any, and hands the cell to
    /// the next parked flip.
    fn release_control(&mut self, pos: usize) {
        let released = match &mut self.cells[pos] {
            Cell::Card { controller, .. } => controller.take().is_some(),
            Cell::Empty => false,
        };
        if released {
            self.wake_next_waiter(pos);
        }
    }

    /// Wakes exactly one live waiter on `pos`. Waiters whose callers
    /// have gone away are skipped; dropping a stale waiter changes no
    /// board state.
    fn wake_next_waiter(&mut self, pos: usize) {
        if let Some(queue) = self.position_waiters.get_mut(&pos) {
            while let Some(waiter) = queue.pop_front() {
                if waiter.send(()).is_ok() {
                    break;
                }
            }
            if queue.is_empty() {
                self.position_waiters.remove(&pos);
            }
        }
    }

    /// Wakes every waiter on `pos`; used when the cell becomes empty
    /// and can never be acquired again.
    fn wake_all_waiters(&mut self, pos: usize) {
        if let Some(queue) = self.position_waiters.remove(&pos) {
            for waiter in queue {
                let _ = waiter.send(());
            }
        }
    }
}

//! State an agent carries from one turn to the next

use isolation_core::{Cell, GameState, Side};
use log::{trace, warn};

/// Cells occupied after each ply, stored densely from `start_ply`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlyHistory {
    start_ply: usize,
    cells: Vec<Cell>,
}

impl PlyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// First ply covered.
    pub fn start_ply(&self) -> usize {
        self.start_ply
    }

    /// One past the last ply covered.
    pub fn end_ply(&self) -> usize {
        self.start_ply + self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell recorded for `ply`.
    pub fn get(&self, ply: usize) -> Option<Cell> {
        ply.checked_sub(self.start_ply)
            .and_then(|offset| self.cells.get(offset).copied())
    }

    /// Records the cell reached at `ply`.
    ///
    /// Re-recording a covered ply overwrites it. A ply that would leave a gap
    /// restarts the history there, since the earlier cells no longer describe
    /// a contiguous game.
    pub fn record(&mut self, ply: usize, cell: Cell) {
        if self.cells.is_empty() || ply < self.start_ply || ply > self.end_ply() {
            self.start_ply = ply;
            self.cells.clear();
            self.cells.push(cell);
        } else if ply == self.end_ply() {
            self.cells.push(cell);
        } else {
            self.cells[ply - self.start_ply] = cell;
        }
    }

    /// The recorded cells as an opening-book path, when they start at ply 0.
    /// An empty history is the path of the empty board.
    pub fn book_path(&self) -> Option<&[Cell]> {
        (self.start_ply == 0).then_some(self.cells.as_slice())
    }

    /// Returns true once every ply an opening book of `book_depth` can use is
    /// recorded.
    pub fn is_full(&self, book_depth: usize) -> bool {
        self.end_ply() > book_depth
    }
}

/// Cross-turn memory of one agent in one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    side: Side,
    history: PlyHistory,
    staged: Option<PlyHistory>,
}

impl TurnContext {
    /// Creates the context on the agent's first turn.
    ///
    /// The agent moves second only when exactly one player is on the board. If
    /// the agent is already placed, its cell is recorded two plies back.
    pub fn start<G: GameState>(state: &G) -> Self {
        let locs = state.locs();
        let placed = locs.iter().flatten().count();
        let side = if placed == 1 { Side::Second } else { Side::First };

        let mut history = PlyHistory::new();
        if let (Some(own), Some(ply)) = (
            locs[state.player().index()],
            state.ply_count().checked_sub(2),
        ) {
            history.record(ply, own);
        }

        trace!("starting turn context as {side} at ply {}", state.ply_count());
        Self {
            side,
            history,
            staged: None,
        }
    }

    /// Brings the history up to date at the start of a turn.
    ///
    /// Merges the history staged during the previous search, checking its last
    /// cell against where the agent actually stands, then records the
    /// opponent's reply.
    pub fn advance<G: GameState>(&mut self, state: &G, book_depth: usize) {
        let ply = state.ply_count();
        let locs = state.locs();
        let own = locs[state.player().index()];
        let opponent = locs[state.player().opponent().index()];

        if let Some(staged) = self.staged.take() {
            let own_ply = ply.checked_sub(2);
            let staged_cell = own_ply.and_then(|p| staged.get(p));
            self.history = staged;
            if let (Some(own_ply), Some(own)) = (own_ply, own) {
                if staged_cell.is_some() && staged_cell != Some(own) {
                    warn!(
                        "staged cell {:?} at ply {own_ply} disagrees with board cell {own}",
                        staged_cell
                    );
                    self.history.record(own_ply, own);
                }
            }
        }

        if let (Some(opponent), Some(opponent_ply)) = (opponent, ply.checked_sub(1)) {
            if !self.history.is_full(book_depth) {
                self.history.record(opponent_ply, opponent);
            }
        }
        trace!(
            "turn context at ply {ply}: {} cells from ply {}",
            self.history.len(),
            self.history.start_ply()
        );
    }

    /// Stages the history that results from playing to `cell` at `ply`, for
    /// the next turn to merge.
    pub fn stage(&mut self, ply: usize, cell: Option<Cell>, book_depth: usize) {
        let mut next = self.history.clone();
        if let Some(cell) = cell {
            if !next.is_full(book_depth) {
                next.record(ply, cell);
            }
        }
        self.staged = Some(next);
    }

    /// Book path for the search from `state`: only when the history starts at
    /// ply 0, covers every ply played, and the book still applies.
    pub fn search_path<G: GameState>(&self, state: &G, book_depth: usize) -> Option<&[Cell]> {
        let ply = state.ply_count();
        self.history
            .book_path()
            .filter(|path| path.len() == ply && ply <= book_depth)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn history(&self) -> &PlyHistory {
        &self.history
    }

    pub fn staged(&self) -> Option<&PlyHistory> {
        self.staged.as_ref()
    }
}

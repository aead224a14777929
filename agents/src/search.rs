use crate::config::HeuristicWeights;
use crate::evaluation::Evaluator;
use isolation_core::{Action, Cell, GameState, Side};

const INFINITY: f64 = f64::INFINITY;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Option<Action>,
    pub score: f64,
    pub depth: u8,
    pub nodes: u64,
}

/// Depth-limited alpha-beta search with separate min and max nodes.
///
/// Every value is from the root player's point of view. The engine keeps no
/// state between calls apart from the node counter of the last search.
pub struct AlphaBeta<'a> {
    evaluator: Evaluator<'a>,
    book_depth: usize,
    root_player: Side,
    nodes: u64,
}

impl<'a> AlphaBeta<'a> {
    /// Creates an engine searching for the evaluator's player. Paths handed to
    /// [`AlphaBeta::best`] are extended while they hold at most `book_depth`
    /// cells.
    pub fn new(evaluator: Evaluator<'a>, book_depth: usize) -> Self {
        Self {
            root_player: evaluator.player(),
            evaluator,
            book_depth,
            nodes: 0,
        }
    }

    /// Searches to `depth_limit` plies and returns the first action with the
    /// highest value. `path` is the cell history from ply 0 when the opening
    /// book should be consulted.
    pub fn best<G: GameState>(
        &mut self,
        state: &G,
        depth_limit: u8,
        path: Option<&[Cell]>,
    ) -> SearchResult {
        self.nodes = 0;

        let mut result = SearchResult {
            best_move: None,
            score: -INFINITY,
            depth: depth_limit,
            nodes: 0,
        };

        if state.terminal_test() {
            result.score = state.utility(self.root_player);
            return result;
        }

        let mut alpha = -INFINITY;
        let beta = INFINITY;

        for action in state.actions() {
            let child = state.result(action);
            let child_path = self.extend_path(state, action, path);
            let value = self.min_value(&child, alpha, beta, depth_limit, 1, child_path.as_deref());

            if value > result.score {
                result.score = value;
                result.best_move = Some(action);
                alpha = value;
            }
        }

        result.nodes = self.nodes;
        result
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn min_value<G: GameState>(
        &mut self,
        state: &G,
        alpha: f64,
        mut beta: f64,
        depth_limit: u8,
        depth: u8,
        path: Option<&[Cell]>,
    ) -> f64 {
        self.nodes += 1;

        if state.terminal_test() {
            return state.utility(self.root_player);
        }
        if depth >= depth_limit {
            return self.evaluator.evaluate(state, path);
        }

        let actions = state.actions();
        if actions.is_empty() {
            return state.utility(self.root_player);
        }

        let mut value = INFINITY;
        for action in actions {
            let child = state.result(action);
            let child_path = self.extend_path(state, action, path);
            value = value.min(self.max_value(
                &child,
                alpha,
                beta,
                depth_limit,
                depth + 1,
                child_path.as_deref(),
            ));
            if value <= alpha {
                return value;
            }
            beta = beta.min(value);
        }
        value
    }

    fn max_value<G: GameState>(
        &mut self,
        state: &G,
        mut alpha: f64,
        beta: f64,
        depth_limit: u8,
        depth: u8,
        path: Option<&[Cell]>,
    ) -> f64 {
        self.nodes += 1;

        if state.terminal_test() {
            return state.utility(self.root_player);
        }
        if depth >= depth_limit {
            return self.evaluator.evaluate(state, path);
        }

        let actions = state.actions();
        if actions.is_empty() {
            return state.utility(self.root_player);
        }

        let mut value = -INFINITY;
        for action in actions {
            let child = state.result(action);
            let child_path = self.extend_path(state, action, path);
            value = value.max(self.min_value(
                &child,
                alpha,
                beta,
                depth_limit,
                depth + 1,
                child_path.as_deref(),
            ));
            if value >= beta {
                return value;
            }
            alpha = alpha.max(value);
        }
        value
    }

    /// Appends the mover's landing cell while the path is still short enough
    /// to be a book key; past that, book tracking stops.
    fn extend_path<G: GameState>(
        &self,
        state: &G,
        action: Action,
        path: Option<&[Cell]>,
    ) -> Option<Vec<Cell>> {
        let path = path.filter(|p| p.len() <= self.book_depth)?;
        let mover = state.player();
        let cell = action.landing(state.locs()[mover.index()])?;
        let mut extended = Vec::with_capacity(path.len() + 1);
        extended.extend_from_slice(path);
        extended.push(cell);
        Some(extended)
    }
}

/// Fixed-depth search for the player to move with the default heuristic and
/// no opening book.
pub fn search<G: GameState>(state: &G, depth: u8) -> SearchResult {
    let evaluator = Evaluator::new(None, HeuristicWeights::default(), state.player());
    AlphaBeta::new(evaluator, 0).best(state, depth, None)
}

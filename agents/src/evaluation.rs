use isolation_core::{Cell, GameState, Side};

use crate::book::OpeningBook;
use crate::config::HeuristicWeights;

/// Scores frontier positions for one side.
///
/// Inside the opening book the stored win ratio is the score; everywhere else
/// the weighted liberty heuristic is used.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    book: Option<&'a OpeningBook>,
    weights: HeuristicWeights,
    /// Player whose liberties count as "own".
    player: Side,
    /// Side whose win ratio is read from the book.
    book_side: Side,
}

impl<'a> Evaluator<'a> {
    pub fn new(book: Option<&'a OpeningBook>, weights: HeuristicWeights, player: Side) -> Self {
        Self {
            book,
            weights,
            player,
            book_side: player,
        }
    }

    /// Reads book ratios for `side` instead of the evaluated player.
    pub fn with_book_side(mut self, side: Side) -> Self {
        self.book_side = side;
        self
    }

    pub fn player(&self) -> Side {
        self.player
    }

    pub fn book(&self) -> Option<&'a OpeningBook> {
        self.book
    }

    /// Scores `state` for the evaluator's side. `path` is the cell history
    /// from ply 0, when it is being tracked.
    pub fn evaluate<G: GameState>(&self, state: &G, path: Option<&[Cell]>) -> f64 {
        self.book_score(state, path)
            .unwrap_or_else(|| self.heuristic(state))
    }

    /// Looks the position up in the book. The path must account for every ply
    /// played, otherwise it does not identify the position.
    pub fn book_score<G: GameState>(&self, state: &G, path: Option<&[Cell]>) -> Option<f64> {
        let book = self.book?;
        let path = path?;
        if path.len() != state.ply_count() || state.ply_count() > book.depth() + 1 {
            return None;
        }
        book.lookup(path, self.book_side)
    }

    /// Weighted difference of the two players' liberties.
    pub fn heuristic<G: GameState>(&self, state: &G) -> f64 {
        let locs = state.locs();
        let own = state.liberties(locs[self.player.index()]) as f64;
        let opponent = state.liberties(locs[self.player.opponent().index()]) as f64;
        self.weights.opponent * opponent + self.weights.own * own
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isolation_core::{Action, Isolation};

    fn cell(col: u8, row: u8) -> Cell {
        Cell::from_coords(col, row).unwrap()
    }

    /// First mover in the center, second mover in the corner.
    fn center_vs_corner() -> (Isolation, Vec<Cell>) {
        let path = vec![cell(5, 4), cell(0, 0)];
        let state = Isolation::new()
            .result(Action::Place(path[0]))
            .result(Action::Place(path[1]));
        (state, path)
    }

    #[test]
    fn test_accessibility_heuristic() {
        let (state, _) = center_vs_corner();
        let evaluator = Evaluator::new(None, HeuristicWeights::ACCESSIBILITY, Side::First);

        // 2 - 2 * 8
        assert_eq!(evaluator.heuristic(&state), -14.0);
    }

    #[test]
    fn test_mobility_heuristic() {
        let (state, _) = center_vs_corner();
        let evaluator = Evaluator::new(None, HeuristicWeights::MOBILITY, Side::Second);

        assert_eq!(evaluator.heuristic(&state), 2.0 - 8.0);
    }

    #[test]
    fn test_book_hit_is_score() {
        let (state, path) = center_vs_corner();
        let book = OpeningBook::from_entries(5, [(path.clone(), 0.8)]).unwrap();

        let first = Evaluator::new(Some(&book), HeuristicWeights::default(), Side::First);
        let second = Evaluator::new(Some(&book), HeuristicWeights::default(), Side::Second);

        assert_eq!(first.evaluate(&state, Some(path.as_slice())), 0.8);
        assert!((second.evaluate(&state, Some(path.as_slice())) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_book_miss_falls_back() {
        let (state, path) = center_vs_corner();
        let book = OpeningBook::new(5);
        let evaluator = Evaluator::new(Some(&book), HeuristicWeights::default(), Side::First);

        assert_eq!(evaluator.evaluate(&state, Some(path.as_slice())), -14.0);
        assert_eq!(evaluator.evaluate(&state, None), -14.0);
    }

    /// Plays the first listed action for `plies` plies after the center vs
    /// corner opening, returning the position and its full path.
    fn play_on(plies: usize) -> (Isolation, Vec<Cell>) {
        let (mut state, mut path) = center_vs_corner();
        for _ in 0..plies {
            let mover = state.player().index();
            let action = state.actions()[0];
            state = state.result(action);
            path.push(state.locs()[mover].unwrap());
        }
        (state, path)
    }

    #[test]
    fn test_path_beyond_book_depth_uses_heuristic() {
        // Six plies after the opening placement, one past a depth-5 book.
        let (state, path) = play_on(5);
        assert_eq!(path.len(), 7);

        let mut book = OpeningBook::new(5);
        book.insert(&path[..6], 1.0).unwrap();
        assert_eq!(book.lookup(&path[..6], Side::First), Some(1.0));
        assert_eq!(book.lookup(&path, Side::First), None);

        let evaluator = Evaluator::new(Some(&book), HeuristicWeights::default(), Side::First);
        let own = state.liberties(state.locs()[0]) as f64;
        let opponent = state.liberties(state.locs()[1]) as f64;
        assert_eq!(evaluator.evaluate(&state, Some(path.as_slice())), opponent - 2.0 * own);
    }

    #[test]
    fn test_last_book_ply_uses_book() {
        let (state, path) = play_on(4);
        let book = OpeningBook::from_entries(5, [(path.clone(), 0.5)]).unwrap();
        let evaluator = Evaluator::new(Some(&book), HeuristicWeights::default(), Side::Second);

        assert_eq!(evaluator.evaluate(&state, Some(path.as_slice())), 0.5);
    }

    #[test]
    fn test_partial_path_ignored() {
        let (state, path) = play_on(2);
        let book = OpeningBook::from_entries(5, [(path[..3].to_vec(), 0.9)]).unwrap();
        let evaluator = Evaluator::new(Some(&book), HeuristicWeights::default(), Side::First);

        assert_eq!(evaluator.book_score(&state, Some(&path[..3])), None);
        assert_eq!(evaluator.evaluate(&state, Some(&path[..3])), evaluator.heuristic(&state));
    }
}

use crate::types::{Action, Cell, Side};

/// Read-only view of a knight's Isolation position, as consumed by search.
///
/// Implementors own all board bookkeeping. Search never mutates a position; it
/// only asks for successors.
pub trait GameState: Sized {
    /// Legal actions for the player to move. The order is significant: search
    /// keeps the first of equally scored actions.
    fn actions(&self) -> Vec<Action>;

    /// Returns the position after `action`, leaving `self` untouched.
    fn result(&self, action: Action) -> Self;

    /// Returns true when either player is out of moves.
    fn terminal_test(&self) -> bool;

    /// Returns `1.0` if `player` has won, `-1.0` if it has lost and `0.0` if
    /// the game is not over.
    fn utility(&self, player: Side) -> f64;

    /// Counts the open cells reachable in one move from `cell`. An unplaced
    /// player (`None`) may go to any open cell.
    fn liberties(&self, cell: Option<Cell>) -> usize;

    /// Current cell of each player, indexed by [`Side::index`].
    fn locs(&self) -> [Option<Cell>; 2];

    /// Number of plies played so far.
    fn ply_count(&self) -> usize;

    /// Side to move.
    fn player(&self) -> Side {
        Side::from_ply(self.ply_count())
    }
}

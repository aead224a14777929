//! Bitboard implementation of knight's Isolation.
//! Bit `i` of `open` is set when cell `i` can still be entered.
use crate::game_state::GameState;
use crate::types::*;
use std::fmt;

/// Every playable cell open, padding and overflow bits clear.
const BLANK_BOARD: u128 = {
    let mut board = 0u128;
    let mut i = 0u8;
    while i < SIZE {
        if i % PADDED_WIDTH < WIDTH {
            board |= 1u128 << i;
        }
        i += 1;
    }
    board
};

/// Complete knight's Isolation position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Isolation {
    open: u128,
    ply_count: usize,
    locs: [Option<Cell>; 2],
}

impl Isolation {
    /// Creates the empty starting position.
    pub const fn new() -> Self {
        Self {
            open: BLANK_BOARD,
            ply_count: 0,
            locs: [None, None],
        }
    }

    /// Builds an arbitrary position. The players' cells and `blocked` are
    /// closed; the side to move follows from `ply_count`.
    pub fn setup(locs: [Option<Cell>; 2], ply_count: usize, blocked: &[Cell]) -> Self {
        let mut open = BLANK_BOARD;
        for cell in blocked.iter().chain(locs.iter().flatten()) {
            open &= !cell.bit();
        }
        Self {
            open,
            ply_count,
            locs,
        }
    }

    /// Returns true if the cell can still be entered.
    pub const fn is_open(&self, cell: Cell) -> bool {
        self.open & cell.bit() != 0
    }

    /// Iterates over the open cells in index order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::all().filter(move |&cell| self.is_open(cell))
    }

    /// Returns true if `action` is legal for the player to move.
    pub fn is_legal(&self, action: Action) -> bool {
        let from = self.locs[self.player().index()];
        match (action, from) {
            (Action::Place(_), Some(_)) | (Action::Jump(_), None) => false,
            _ => action
                .landing(from)
                .map(|cell| self.is_open(cell))
                .unwrap_or(false),
        }
    }

    fn has_liberties(&self, side: Side) -> bool {
        let loc = self.locs[side.index()];
        match loc {
            None => self.open != 0,
            Some(from) => Direction::ALL
                .iter()
                .filter_map(|&dir| from.offset(dir))
                .any(|to| self.is_open(to)),
        }
    }
}

impl Default for Isolation {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for Isolation {
    fn actions(&self) -> Vec<Action> {
        match self.locs[self.player().index()] {
            None => self.open_cells().map(Action::Place).collect(),
            Some(from) => Direction::ALL
                .iter()
                .copied()
                .filter(|&dir| from.offset(dir).is_some_and(|to| self.is_open(to)))
                .map(Action::Jump)
                .collect(),
        }
    }

    fn result(&self, action: Action) -> Self {
        debug_assert!(self.is_legal(action), "illegal action {action}");
        let player = self.player().index();
        let mut next = *self;
        if let Some(cell) = action.landing(self.locs[player]) {
            next.open &= !cell.bit();
            next.locs[player] = Some(cell);
        }
        next.ply_count += 1;
        next
    }

    fn terminal_test(&self) -> bool {
        let player = self.player();
        !self.has_liberties(player) || !self.has_liberties(player.opponent())
    }

    fn utility(&self, player: Side) -> f64 {
        if !self.terminal_test() {
            return 0.0;
        }
        let active = self.player();
        let active_wins = self.has_liberties(active);
        if active_wins == (player == active) {
            1.0
        } else {
            -1.0
        }
    }

    fn liberties(&self, cell: Option<Cell>) -> usize {
        match cell {
            None => self.open.count_ones() as usize,
            Some(from) => Direction::ALL
                .iter()
                .filter_map(|&dir| from.offset(dir))
                .filter(|&to| self.is_open(to))
                .count(),
        }
    }

    fn locs(&self) -> [Option<Cell>; 2] {
        self.locs
    }

    fn ply_count(&self) -> usize {
        self.ply_count
    }
}

impl fmt::Display for Isolation {
    /// Draws the board with north at the top and the east edge (column 0) on
    /// the right.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            for col in (0..WIDTH).rev() {
                let Some(cell) = Cell::from_coords(col, row) else {
                    continue;
                };
                let symbol = if self.locs[0] == Some(cell) {
                    '1'
                } else if self.locs[1] == Some(cell) {
                    '2'
                } else if self.is_open(cell) {
                    '.'
                } else {
                    '#'
                };
                write!(f, "{symbol} ")?;
            }
            writeln!(f, "| {row}")?;
        }
        write!(f, "ply {}, {} to move", self.ply_count, self.player())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(col: u8, row: u8) -> Cell {
        Cell::from_coords(col, row).unwrap()
    }

    #[test]
    fn test_starting_position_actions() {
        let state = Isolation::new();
        let actions = state.actions();

        assert_eq!(actions.len(), CELL_COUNT);
        assert_eq!(actions[0], Action::Place(cell(0, 0)));
        assert_eq!(state.liberties(None), CELL_COUNT);
        assert!(!state.terminal_test());
        assert_eq!(state.utility(Side::First), 0.0);
    }

    #[test]
    fn test_first_moves_are_placements() {
        let state = Isolation::new()
            .result(Action::Place(cell(5, 4)))
            .result(Action::Place(cell(0, 0)));

        assert_eq!(state.locs(), [Some(cell(5, 4)), Some(cell(0, 0))]);
        assert_eq!(state.ply_count(), 2);
        assert_eq!(state.player(), Side::First);
        assert!(state.actions().iter().all(|a| matches!(a, Action::Jump(_))));
        assert_eq!(state.actions().len(), 8);
    }

    #[test]
    fn test_jump_closes_cell() {
        let state = Isolation::new()
            .result(Action::Place(cell(5, 4)))
            .result(Action::Place(cell(0, 0)));
        let next = state.result(Action::Jump(Direction::NNE));

        assert_eq!(next.locs()[0], Some(cell(4, 6)));
        assert!(!next.is_open(cell(4, 6)));
        assert!(!next.is_open(cell(5, 4)));
        assert!(!next.is_legal(Action::Place(cell(3, 3))));
    }

    #[test]
    fn test_stuck_player_loses() {
        // Player 1 sits in the corner with both exits closed.
        let corner = cell(0, 0);
        let state = Isolation::setup(
            [Some(corner), Some(cell(5, 4))],
            2,
            &[cell(2, 1), cell(1, 2)],
        );

        assert!(state.actions().is_empty());
        assert!(state.terminal_test());
        assert_eq!(state.utility(Side::First), -1.0);
        assert_eq!(state.utility(Side::Second), 1.0);
    }

    #[test]
    fn test_stuck_opponent_is_terminal() {
        let corner = cell(0, 0);
        let state = Isolation::setup(
            [Some(cell(5, 4)), Some(corner)],
            2,
            &[cell(2, 1), cell(1, 2)],
        );

        assert!(state.terminal_test());
        assert_eq!(state.utility(Side::First), 1.0);
        assert_eq!(state.utility(Side::Second), -1.0);
    }

    #[test]
    fn test_display_marks_players() {
        let state = Isolation::new()
            .result(Action::Place(cell(10, 8)))
            .result(Action::Place(cell(0, 0)));
        let drawn = state.to_string();
        let lines: Vec<&str> = drawn.lines().collect();

        assert!(lines[0].starts_with("1 "));
        assert!(lines[8].starts_with(". ") && lines[8].contains("2 | 0"));
    }
}

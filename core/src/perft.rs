use crate::game_state::GameState;
use crate::types::Action;

/// Perft (performance test) results at each depth.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub placements: u64,
    pub jumps: u64,
    pub terminals: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.placements += other.placements;
        self.jumps += other.jumps;
        self.terminals += other.terminals;
    }
}

/// Performs perft test to given depth and returns node count.
pub fn perft<G: GameState>(state: &G, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let actions = state.actions();

    if depth == 1 {
        return actions.len() as u64;
    }

    actions
        .iter()
        .map(|&action| perft(&state.result(action), depth - 1))
        .sum()
}

/// Performs perft test with a per-action breakdown.
pub fn perft_divide<G: GameState>(state: &G, depth: u8) -> Vec<(Action, u64)> {
    state
        .actions()
        .into_iter()
        .map(|action| {
            let nodes = if depth <= 1 {
                1
            } else {
                perft(&state.result(action), depth - 1)
            };
            (action, nodes)
        })
        .collect()
}

/// Performs perft test with detailed statistics.
pub fn perft_detailed<G: GameState>(state: &G, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        return results;
    }

    for action in state.actions() {
        let new_state = state.result(action);

        if depth == 1 {
            results.nodes += 1;
            match action {
                Action::Place(_) => results.placements += 1,
                Action::Jump(_) => results.jumps += 1,
            }
            if new_state.terminal_test() {
                results.terminals += 1;
            }
        } else {
            let child_results = perft_detailed(&new_state, depth - 1);
            results.add(&child_results);
        }
    }

    results
}

/// Known node counts from the empty board.
pub const STARTING_POSITION: &[(u8, u64)] = &[(1, 99), (2, 9702)];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Isolation;
    use crate::types::Cell;

    #[test]
    fn test_perft_starting_position() {
        let state = Isolation::new();

        for &(depth, expected) in STARTING_POSITION {
            let result = perft(&state, depth);
            assert_eq!(
                result, expected,
                "Perft({}) failed: expected {}, got {}",
                depth, expected, result
            );
        }
    }

    #[test]
    fn test_perft_divide() {
        let state = Isolation::new();
        let results = perft_divide(&state, 1);

        assert_eq!(results.len(), 99);
        assert_eq!(results.iter().map(|(_, n)| n).sum::<u64>(), 99);
    }

    #[test]
    fn test_perft_detailed_counts_jumps() {
        let center = Cell::from_coords(5, 4).unwrap();
        let corner = Cell::from_coords(0, 0).unwrap();
        let state = Isolation::setup([Some(center), Some(corner)], 2, &[]);

        let detailed = perft_detailed(&state, 2);
        let divided: u64 = perft_divide(&state, 2).iter().map(|(_, n)| n).sum();

        assert_eq!(detailed.nodes, perft(&state, 2));
        assert_eq!(detailed.nodes, divided);
        assert_eq!(detailed.placements, 0);
        assert_eq!(detailed.jumps, detailed.nodes);
    }
}

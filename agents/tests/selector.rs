use std::sync::Arc;

use isolation_agents::{
    build_from_playouts, search, Agent, GreedyAgent, MinimaxAgent, RandomAgent, SearchConfig,
};
use isolation_core::{Action, Cell, GameState, Isolation, Side};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Plays a full game with `first` and `second`, checking every move is legal.
fn play_out(
    mut state: Isolation,
    first: &mut dyn Agent<Isolation>,
    second: &mut dyn Agent<Isolation>,
) -> Isolation {
    while !state.terminal_test() {
        let mut emitted = Vec::new();
        match state.player() {
            Side::First => first.get_action(&state, &mut emitted),
            Side::Second => second.get_action(&state, &mut emitted),
        }
        let action = *emitted.last().expect("agent emitted no move");
        assert!(state.is_legal(action), "illegal {} on\n{}", action, state);
        state = state.result(action);
    }
    state
}

#[test]
fn test_minimax_plays_legal_game() {
    let opening = Isolation::new()
        .result(Action::Place(Cell::from_coords(5, 4).unwrap()))
        .result(Action::Place(Cell::from_coords(2, 2).unwrap()));
    let mut minimax = MinimaxAgent::new(SearchConfig::depth(3), None).unwrap();
    let mut random = RandomAgent::seeded(1);

    let end = play_out(opening, &mut minimax, &mut random);
    assert!(end.terminal_test());
    assert_ne!(end.utility(Side::First), 0.0);
}

#[test]
fn test_book_agent_tracks_history_through_opening() {
    let mut rng = StdRng::seed_from_u64(21);
    let book = Arc::new(build_from_playouts(&Isolation::new(), 3, 2, &mut rng));
    let config = SearchConfig {
        max_depth: Some(2),
        book_depth: 3,
        ..SearchConfig::default()
    };
    let mut minimax = MinimaxAgent::new(config, Some(book)).unwrap();
    let mut greedy = GreedyAgent::new();

    let mut state = Isolation::new();
    let mut cells = Vec::new();
    for _ in 0..4 {
        let mut emitted = Vec::new();
        let mover = state.player();
        match mover {
            Side::First => minimax.get_action(&state, &mut emitted),
            Side::Second => greedy.get_action(&state, &mut emitted),
        }
        state = state.result(*emitted.last().unwrap());
        cells.push(state.locs()[mover.index()].unwrap());
    }

    // Minimax saw plies 0..=2 and staged its reply at ply 2.
    let context = minimax.context().unwrap();
    assert_eq!(context.side(), Side::First);
    assert_eq!(context.history().cells(), &cells[..2]);
    assert_eq!(context.staged().unwrap().cells(), &cells[..3]);
}

#[test]
fn test_deepening_matches_fixed_depth_search() {
    let state = Isolation::setup(
        [
            Some(Cell::from_coords(3, 4).unwrap()),
            Some(Cell::from_coords(7, 2).unwrap()),
        ],
        4,
        &[Cell::from_coords(5, 5).unwrap(), Cell::from_coords(1, 3).unwrap()],
    );
    let mut agent = MinimaxAgent::new(SearchConfig::depth(4), None).unwrap();
    let mut emitted = Vec::new();
    agent.get_action(&state, &mut emitted);

    let expected: Vec<Action> = (1..=4)
        .map(|depth| search(&state, depth).best_move.unwrap())
        .collect();
    assert_eq!(emitted, expected);
}

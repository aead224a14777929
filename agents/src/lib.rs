pub mod book;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluation;
pub mod greedy;
pub mod minimax;
pub mod random;
pub mod search;
pub mod symmetry;

use std::sync::mpsc::Sender;

use isolation_core::{Action, GameState};

/// Core trait for Isolation agents
pub trait Agent<G: GameState> {
    /// Publish moves for the current position through `sink`.
    ///
    /// An agent may emit several moves, each replacing the previous one; the
    /// supervisor plays the last move it received before its deadline.
    fn get_action(&mut self, state: &G, sink: &mut dyn ActionSink);

    /// Get the agent's name
    fn name(&self) -> &str;
}

/// Output channel for candidate moves.
pub trait ActionSink {
    /// Publishes `action`. Returns false once nobody is listening any more.
    fn put(&mut self, action: Action) -> bool;
}

impl ActionSink for Vec<Action> {
    fn put(&mut self, action: Action) -> bool {
        self.push(action);
        true
    }
}

impl ActionSink for Sender<Action> {
    fn put(&mut self, action: Action) -> bool {
        self.send(action).is_ok()
    }
}

pub use book::{build_from_playouts, OpeningBook, DEFAULT_BOOK_DEPTH};
pub use config::{HeuristicWeights, SearchConfig};
pub use context::{PlyHistory, TurnContext};
pub use error::{Error, Result};
pub use evaluation::Evaluator;
pub use greedy::GreedyAgent;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;
pub use search::*;
pub use symmetry::{canonicalize, is_canonical, Symmetry};

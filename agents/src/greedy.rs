use crate::{ActionSink, Agent};
use isolation_core::GameState;

/// One-ply agent that keeps as many exits open for itself as it can.
pub struct GreedyAgent {
    name: String,
}

impl GreedyAgent {
    pub fn new() -> Self {
        GreedyAgent {
            name: "Greedy".to_string(),
        }
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameState> Agent<G> for GreedyAgent {
    fn get_action(&mut self, state: &G, sink: &mut dyn ActionSink) {
        let mover = state.player().index();
        let mut best = None;
        let mut best_liberties = 0;

        for action in state.actions() {
            let next = state.result(action);
            let liberties = next.liberties(next.locs()[mover]);
            if best.is_none() || liberties > best_liberties {
                best = Some(action);
                best_liberties = liberties;
            }
        }

        if let Some(action) = best {
            sink.put(action);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

use crate::{ActionSink, Agent};
use isolation_core::GameState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible agent for matches run from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameState> Agent<G> for RandomAgent {
    fn get_action(&mut self, state: &G, sink: &mut dyn ActionSink) {
        if let Some(&action) = state.actions().choose(&mut self.rng) {
            sink.put(action);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

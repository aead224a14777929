use std::sync::Arc;

use isolation_core::{Cell, GameState};
use log::debug;
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::book::OpeningBook;
use crate::config::SearchConfig;
use crate::context::TurnContext;
use crate::error::Result;
use crate::evaluation::Evaluator;
use crate::search::AlphaBeta;
use crate::{ActionSink, Agent};

/// Iterative-deepening alpha-beta agent.
///
/// Emits the best move of every completed depth, so the supervisor always
/// holds the deepest finished answer when it stops listening.
pub struct MinimaxAgent {
    name: String,
    config: SearchConfig,
    book: Option<Arc<OpeningBook>>,
    context: Option<TurnContext>,
}

impl MinimaxAgent {
    pub fn new(config: SearchConfig, book: Option<Arc<OpeningBook>>) -> Result<Self> {
        config.validate()?;
        let name = match (config.random_baseline, config.max_depth) {
            (true, _) => "Minimax(random)".to_string(),
            (false, Some(depth)) => format!("Minimax(depth={})", depth),
            (false, None) => "Minimax(iterative)".to_string(),
        };
        Ok(MinimaxAgent {
            name,
            config,
            book,
            context: None,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Cross-turn state, once the agent has taken its first turn.
    pub fn context(&self) -> Option<&TurnContext> {
        self.context.as_ref()
    }

    /// Forgets the current game.
    pub fn reset(&mut self) {
        self.context = None;
    }
}

impl<G: GameState> Agent<G> for MinimaxAgent {
    fn get_action(&mut self, state: &G, sink: &mut dyn ActionSink) {
        if self.config.random_baseline {
            if let Some(&action) = state.actions().choose(&mut thread_rng()) {
                sink.put(action);
            }
            return;
        }

        let book_depth = self.config.book_depth;
        let context = self.context.get_or_insert_with(|| TurnContext::start(state));
        context.advance(state, book_depth);

        let mover = state.player();
        let evaluator = Evaluator::new(self.book.as_deref(), self.config.weights, mover)
            .with_book_side(context.side());
        let path: Option<Vec<Cell>> = context.search_path(state, book_depth).map(<[Cell]>::to_vec);
        let from = state.locs()[mover.index()];

        let mut depth = 1u8;
        loop {
            let mut engine = AlphaBeta::new(evaluator, book_depth);
            let result = engine.best(state, depth, path.as_deref());
            let Some(action) = result.best_move else {
                debug!("depth {}: no legal move", depth);
                break;
            };
            debug!(
                "depth {}: {} score {} ({} nodes)",
                depth, action, result.score, result.nodes
            );

            context.stage(state.ply_count(), action.landing(from), book_depth);
            if !sink.put(action) {
                break;
            }
            if self.config.max_depth.is_some_and(|max| depth >= max) || depth == u8::MAX {
                break;
            }
            depth += 1;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

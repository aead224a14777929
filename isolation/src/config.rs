//! Match configuration loaded from JSON

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use isolation_agents::{Agent, GreedyAgent, MinimaxAgent, OpeningBook, RandomAgent, SearchConfig};
use isolation_core::Isolation;
use serde::{Deserialize, Serialize};

/// Agents available to the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Minimax,
    Greedy,
    Random,
}

impl AgentKind {
    /// Builds a fresh agent for one game.
    pub fn build(
        self,
        search: &SearchConfig,
        book: Option<Arc<OpeningBook>>,
        seed: u64,
    ) -> Result<Box<dyn Agent<Isolation> + Send>> {
        Ok(match self {
            AgentKind::Minimax => Box::new(
                MinimaxAgent::new(search.clone(), book).context("invalid search configuration")?,
            ),
            AgentKind::Greedy => Box::new(GreedyAgent::new()),
            AgentKind::Random => Box::new(RandomAgent::seeded(seed)),
        })
    }
}

/// Settings of a match between two agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Time each agent gets per turn, in milliseconds
    pub time_limit_ms: u64,

    /// Number of games; sides alternate between games
    pub games: usize,

    /// Random plies played before the agents take over
    pub opening_plies: usize,

    /// Random playouts per canonical start for the opening book. Zero disables
    /// the book.
    pub book_playouts: u32,

    /// Random seed for reproducibility
    pub seed: Option<u64>,

    pub player: AgentKind,
    pub opponent: AgentKind,

    /// Configuration of every minimax agent in the match
    pub search: SearchConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 150,
            games: 10,
            opening_plies: 2,
            book_playouts: 0,
            seed: None,
            player: AgentKind::Minimax,
            opponent: AgentKind::Greedy,
            search: SearchConfig::default(),
        }
    }
}

impl MatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.time_limit_ms > 0, "time_limit_ms must be positive");
        ensure!(self.games > 0, "games must be positive");
        self.search
            .validate()
            .context("invalid search configuration")?;
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

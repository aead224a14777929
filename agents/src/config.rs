//! Search configuration handed to agents at construction

use serde::{Deserialize, Serialize};

use crate::book::DEFAULT_BOOK_DEPTH;
use crate::error::{Error, Result};

/// Linear weights of the liberty heuristic.
///
/// The score is `opponent * liberties(opponent) + own * liberties(own)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub own: f64,
    pub opponent: f64,
}

impl HeuristicWeights {
    /// `liberties(opponent) - 2 * liberties(own)`.
    pub const ACCESSIBILITY: Self = Self {
        own: -2.0,
        opponent: 1.0,
    };

    /// `liberties(own) - liberties(opponent)`.
    pub const MOBILITY: Self = Self {
        own: 1.0,
        opponent: -1.0,
    };
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self::ACCESSIBILITY
    }
}

/// Configuration of the iterative-deepening agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Deepest iteration to run. `None` keeps deepening until the caller stops
    /// listening.
    pub max_depth: Option<u8>,

    /// Plies after the opening placement answered by the opening book.
    pub book_depth: usize,

    /// Frontier heuristic used outside the book.
    pub weights: HeuristicWeights,

    /// Play a uniformly random legal move instead of searching.
    pub random_baseline: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            book_depth: DEFAULT_BOOK_DEPTH,
            weights: HeuristicWeights::default(),
            random_baseline: false,
        }
    }
}

impl SearchConfig {
    /// Fixed-depth configuration.
    pub fn depth(depth: u8) -> Self {
        Self {
            max_depth: Some(depth),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if !self.weights.own.is_finite() || !self.weights.opponent.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!("heuristic weights must be finite, got {:?}", self.weights),
            });
        }
        Ok(())
    }
}

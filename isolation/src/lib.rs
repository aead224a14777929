pub mod config;
pub mod harness;

pub use config::{AgentKind, MatchConfig};
pub use harness::{
    play_game, random_opening, run_match, run_turn, Forfeit, GameRecord, MatchSummary, TurnOutcome,
};

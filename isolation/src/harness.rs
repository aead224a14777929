//! Turn supervision, games and matches
//!
//! Every turn runs the agent on a scoped worker thread. The supervisor keeps
//! the latest move the agent publishes before the deadline, then hangs up and
//! waits for the worker to notice.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use isolation_agents::{build_from_playouts, Agent};
use isolation_core::{Action, GameState, Isolation, Side};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};

use crate::config::MatchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forfeit {
    /// Nothing was published before the deadline.
    NoMove,
    IllegalMove(Action),
}

impl fmt::Display for Forfeit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Forfeit::NoMove => write!(f, "no move before the deadline"),
            Forfeit::IllegalMove(action) => write!(f, "illegal move {action}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved(Action),
    Forfeit(Forfeit),
}

/// Runs one turn of `agent` with a deadline of `time_limit`.
pub fn run_turn<G, A>(agent: &mut A, state: &G, time_limit: Duration) -> TurnOutcome
where
    G: GameState + Sync,
    A: Agent<G> + Send + ?Sized,
{
    let deadline = Instant::now() + time_limit;
    let (tx, rx) = mpsc::channel::<Action>();

    let latest = thread::scope(|scope| {
        let worker = scope.spawn(move || {
            let mut tx = tx;
            agent.get_action(state, &mut tx);
        });

        let mut latest = None;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match rx.recv_timeout(remaining) {
                Ok(action) => latest = Some(action),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        if let Some(action) = rx.try_iter().last() {
            latest = Some(action);
        }
        drop(rx);

        if worker.join().is_err() {
            warn!("agent panicked during its turn");
        }
        latest
    });

    match latest {
        None => TurnOutcome::Forfeit(Forfeit::NoMove),
        Some(action) if !state.actions().contains(&action) => {
            TurnOutcome::Forfeit(Forfeit::IllegalMove(action))
        }
        Some(action) => TurnOutcome::Moved(action),
    }
}

/// Outcome of one game.
#[derive(Debug, Clone)]
pub struct GameRecord<G> {
    pub winner: Side,
    pub actions: Vec<Action>,
    /// Side that forfeited, if the game did not end on the board.
    pub forfeit: Option<(Side, Forfeit)>,
    pub final_state: G,
}

/// Plays `initial` to the end. `agents` is indexed by side.
pub fn play_game<G>(
    initial: G,
    agents: &mut [Box<dyn Agent<G> + Send>; 2],
    time_limit: Duration,
) -> GameRecord<G>
where
    G: GameState + Sync,
{
    let mut state = initial;
    let mut actions = Vec::new();

    while !state.terminal_test() {
        let side = state.player();
        match run_turn(agents[side.index()].as_mut(), &state, time_limit) {
            TurnOutcome::Moved(action) => {
                debug!("ply {}: {} plays {}", state.ply_count(), side, action);
                actions.push(action);
                state = state.result(action);
            }
            TurnOutcome::Forfeit(reason) => {
                info!("{} ({}) forfeits: {}", side, agents[side.index()].name(), reason);
                return GameRecord {
                    winner: side.opponent(),
                    actions,
                    forfeit: Some((side, reason)),
                    final_state: state,
                };
            }
        }
    }

    let winner = if state.utility(Side::First) > 0.0 {
        Side::First
    } else {
        Side::Second
    };
    GameRecord {
        winner,
        actions,
        forfeit: None,
        final_state: state,
    }
}

/// Plays `plies` uniformly random moves from the empty board, stopping early
/// rather than ending the game.
pub fn random_opening<R: Rng + ?Sized>(plies: usize, rng: &mut R) -> Isolation {
    let mut state = Isolation::new();
    for _ in 0..plies {
        let Some(&action) = state.actions().choose(rng) else {
            break;
        };
        let next = state.result(action);
        if next.terminal_test() {
            break;
        }
        state = next;
    }
    state
}

/// Results of a match from the point of view of the configured player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub player_forfeits: usize,
    pub opponent_forfeits: usize,
}

impl MatchSummary {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} wins, {} losses in {} games ({:.1}%), forfeits {}/{}",
            self.wins,
            self.losses,
            self.games,
            100.0 * self.win_rate(),
            self.player_forfeits,
            self.opponent_forfeits
        )
    }
}

/// Plays `config.games` games, alternating which side the player takes.
pub fn run_match(config: &MatchConfig) -> Result<MatchSummary> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(|| thread_rng().gen());
    info!("match seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let book = (config.book_playouts > 0).then(|| {
        Arc::new(build_from_playouts(
            &Isolation::new(),
            config.search.book_depth,
            config.book_playouts,
            &mut rng,
        ))
    });

    let mut summary = MatchSummary::default();
    for game in 0..config.games {
        let player_side = if game % 2 == 0 { Side::First } else { Side::Second };
        let initial = random_opening(config.opening_plies, &mut rng);

        let player = config
            .player
            .build(&config.search, book.clone(), rng.gen())?;
        let opponent = config
            .opponent
            .build(&config.search, book.clone(), rng.gen())?;
        let mut agents = match player_side {
            Side::First => [player, opponent],
            Side::Second => [opponent, player],
        };

        let record = play_game(initial, &mut agents, config.time_limit());
        summary.games += 1;
        if record.winner == player_side {
            summary.wins += 1;
        } else {
            summary.losses += 1;
        }
        match record.forfeit {
            Some((side, _)) if side == player_side => summary.player_forfeits += 1,
            Some(_) => summary.opponent_forfeits += 1,
            None => {}
        }
        info!(
            "game {}: player as {} {} after {} plies",
            game + 1,
            player_side,
            if record.winner == player_side { "won" } else { "lost" },
            record.actions.len()
        );
    }
    Ok(summary)
}

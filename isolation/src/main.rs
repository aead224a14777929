use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use isolation::{play_game, random_opening, run_match, AgentKind, MatchConfig};
use isolation_agents::{build_from_playouts, canonicalize, Agent, Symmetry};
use isolation_core::{perft_detailed, perft_divide, Cell, GameState, Isolation};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "isolation")]
#[command(version, about = "Knight's Isolation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game and print every position
    Play(MatchArgs),

    /// Play a match and report the player's win rate
    Match(MatchArgs),

    /// Count move-generation nodes from the empty board
    Perft {
        depth: u8,

        /// Print the node count below each first move
        #[arg(long)]
        divide: bool,
    },

    /// Show the canonical form of a path of cell indices
    Canonical {
        #[arg(required = true)]
        cells: Vec<usize>,
    },
}

/// Flags that override the match configuration file.
#[derive(Args)]
struct MatchArgs {
    /// JSON match configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    player: Option<AgentKind>,

    #[arg(long, value_enum)]
    opponent: Option<AgentKind>,

    #[arg(long)]
    games: Option<usize>,

    /// Milliseconds per turn
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Deepest search iteration
    #[arg(long)]
    depth: Option<u8>,

    #[arg(long)]
    opening_plies: Option<usize>,

    /// Random playouts per canonical start for the opening book
    #[arg(long)]
    book_playouts: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,
}

impl MatchArgs {
    fn resolve(self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        if let Some(player) = self.player {
            config.player = player;
        }
        if let Some(opponent) = self.opponent {
            config.opponent = opponent;
        }
        if let Some(games) = self.games {
            config.games = games;
        }
        if let Some(ms) = self.time_limit_ms {
            config.time_limit_ms = ms;
        }
        if let Some(depth) = self.depth {
            config.search.max_depth = Some(depth);
        }
        if let Some(plies) = self.opening_plies {
            config.opening_plies = plies;
        }
        if let Some(playouts) = self.book_playouts {
            config.book_playouts = playouts;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn play(config: &MatchConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(|| thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    let book = (config.book_playouts > 0).then(|| {
        Arc::new(build_from_playouts(
            &Isolation::new(),
            config.search.book_depth,
            config.book_playouts,
            &mut rng,
        ))
    });
    let initial = random_opening(config.opening_plies, &mut rng);

    let mut agents: [Box<dyn Agent<Isolation> + Send>; 2] = [
        config.player.build(&config.search, book.clone(), rng.gen())?,
        config.opponent.build(&config.search, book, rng.gen())?,
    ];
    let names = [agents[0].name().to_string(), agents[1].name().to_string()];
    println!("{} vs {} (seed {})", names[0], names[1], seed);

    let record = play_game(initial, &mut agents, config.time_limit());

    let mut state = initial;
    println!("{}", state);
    for action in &record.actions {
        let mover = state.player();
        state = state.result(*action);
        println!("{} plays {}", names[mover.index()], action);
        println!("{}", state);
    }

    if let Some((side, reason)) = record.forfeit {
        println!("{} forfeits: {}", names[side.index()], reason);
    }
    println!("{} wins after {} plies", names[record.winner.index()], record.actions.len());
    Ok(())
}

fn perft(depth: u8, divide: bool) -> Result<()> {
    let state = Isolation::new();
    println!("Running perft({})...", depth);

    let start = Instant::now();
    if divide {
        let mut total = 0;
        for (action, count) in perft_divide(&state, depth) {
            println!("{}: {}", action, count);
            total += count;
        }
        println!("\nTotal: {}", total);
    } else {
        let results = perft_detailed(&state, depth);
        let elapsed = start.elapsed();
        println!("Nodes: {}", results.nodes);
        println!("Placements: {}", results.placements);
        println!("Jumps: {}", results.jumps);
        println!("Terminals: {}", results.terminals);
        println!("Time: {:.2}s", elapsed.as_secs_f64());
        println!("NPS: {:.0}", results.nodes as f64 / elapsed.as_secs_f64());
    }
    Ok(())
}

fn canonical(indices: &[usize]) -> Result<()> {
    let path = indices
        .iter()
        .map(|&index| Cell::try_from_index(index).with_context(|| format!("bad cell {index}")))
        .collect::<Result<Vec<_>>>()?;
    let Some(&first) = path.first() else {
        bail!("path is empty");
    };

    let canonical = canonicalize(&path);
    let indices: Vec<u8> = canonical.iter().map(|cell| cell.index()).collect();
    println!("symmetry: {:?}", Symmetry::for_cell(first));
    println!("canonical: {:?}", indices);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play(&args.resolve()?),
        Commands::Match(args) => {
            let config = args.resolve()?;
            println!("{:?} vs {:?}, {} games", config.player, config.opponent, config.games);
            let summary = run_match(&config)?;
            println!("{}", summary);
            Ok(())
        }
        Commands::Perft { depth, divide } => perft(depth, divide),
        Commands::Canonical { cells } => canonical(&cells),
    }
}

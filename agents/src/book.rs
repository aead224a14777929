//! Opening book keyed by canonical paths
//!
//! Each entry stores the win ratio of the side that made the first move of the
//! path. Keys are canonicalized on insertion, so statistics gathered from one
//! quadrant answer queries from every starting cell.

use std::collections::HashMap;

use isolation_core::{Cell, GameState, Side};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::symmetry::{canonicalize, is_canonical};

/// Default number of plies after the opening placement covered by the book.
pub const DEFAULT_BOOK_DEPTH: usize = 5;

/// Read-only table of opening statistics.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: HashMap<Vec<Cell>, f64>,
    depth: usize,
}

impl OpeningBook {
    /// Creates an empty book covering paths of up to `depth + 1` cells.
    pub fn new(depth: usize) -> Self {
        Self {
            entries: HashMap::new(),
            depth,
        }
    }

    /// Builds a book from `(path, ratio)` pairs.
    pub fn from_entries<I>(depth: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<Cell>, f64)>,
    {
        let mut book = Self::new(depth);
        for (path, ratio) in entries {
            book.insert(&path, ratio)?;
        }
        Ok(book)
    }

    /// Stores the first mover's win ratio for `path`.
    pub fn insert(&mut self, path: &[Cell], ratio: f64) -> Result<()> {
        if path.is_empty() {
            return Err(Error::EmptyPath);
        }
        if !self.covers(path) {
            return Err(Error::PathTooLong {
                len: path.len(),
                depth: self.depth,
            });
        }
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::InvalidRatio { ratio });
        }
        self.entries.insert(canonicalize(path).into_owned(), ratio);
        Ok(())
    }

    /// Looks up the win ratio of `perspective` after `path`.
    ///
    /// Stored ratios belong to the first mover; the second mover reads
    /// `|1 - ratio|`. Returns `None` for paths beyond the book depth or absent
    /// from the table.
    pub fn lookup(&self, path: &[Cell], perspective: Side) -> Option<f64> {
        if path.is_empty() || !self.covers(path) {
            return None;
        }
        let ratio = self.entries.get(&*canonicalize(path))?;
        Some((perspective.index() as f64 - ratio).abs())
    }

    /// Returns true if a path of this length is within the book depth.
    pub fn covers(&self, path: &[Cell]) -> bool {
        path.len().saturating_sub(1) <= self.depth
    }

    /// Maximum ply covered after the opening placement.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Win and game tallies for one path prefix.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    wins: u32,
    games: u32,
}

/// Builds a book offline from random playouts.
///
/// For every cell of the canonical region, plays `games_per_start` random games
/// from `initial` with the first mover placed on that cell, and records the
/// first mover's win ratio for each path prefix of up to `depth + 1` cells.
pub fn build_from_playouts<G, R>(
    initial: &G,
    depth: usize,
    games_per_start: u32,
    rng: &mut R,
) -> OpeningBook
where
    G: GameState,
    R: Rng + ?Sized,
{
    let mut tallies: HashMap<Vec<Cell>, Tally> = HashMap::new();
    let starts: Vec<_> = initial
        .actions()
        .into_iter()
        .filter(|action| {
            action
                .landing(initial.locs()[initial.player().index()])
                .is_some_and(is_canonical)
        })
        .collect();

    for &start in &starts {
        for _ in 0..games_per_start {
            let mut state = initial.result(start);
            let mut path = Vec::with_capacity(depth + 1);
            record_landing(&state, &mut path, depth);

            while !state.terminal_test() {
                let actions = state.actions();
                let Some(&action) = actions.choose(rng) else {
                    break;
                };
                state = state.result(action);
                record_landing(&state, &mut path, depth);
            }

            let first_mover_won = state.utility(Side::First) > 0.0;
            for len in 1..=path.len() {
                let tally = tallies.entry(path[..len].to_vec()).or_default();
                tally.games += 1;
                if first_mover_won {
                    tally.wins += 1;
                }
            }
        }
    }

    let mut book = OpeningBook::new(depth);
    book.entries = tallies
        .into_iter()
        .map(|(path, tally)| (path, f64::from(tally.wins) / f64::from(tally.games)))
        .collect();

    info!(
        "built opening book: {} paths from {} starts x {} playouts",
        book.len(),
        starts.len(),
        games_per_start
    );
    book
}

/// Appends the cell of the player who just moved while the path is short
/// enough to be a book key.
fn record_landing<G: GameState>(state: &G, path: &mut Vec<Cell>, depth: usize) {
    if path.len() > depth {
        return;
    }
    let mover = state.player().opponent();
    if let Some(cell) = state.locs()[mover.index()] {
        path.push(cell);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that searches for emitter placements solving a safe.
//!
//! The [`backtrack`] module holds a generic depth-first engine; the [`safe`]
//! module adapts it to lasers grids. [`solve`] and [`hint`] wrap both for
//! adapters that only need an answer.

pub mod backtrack;
pub mod safe;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use lasers_core::CellCoord;
use lasers_world::Grid;
use tracing::info;

use crate::{
    backtrack::{Backtracker, Interruption, Outcome, SearchStats},
    safe::SafeConfig,
};

/// Limits applied to a single search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl Config {
    /// Creates a new configuration; `None` leaves that dimension unbounded.
    #[must_use]
    pub const fn new(time_limit: Option<Duration>, node_limit: Option<u64>) -> Self {
        Self {
            time_limit,
            node_limit,
        }
    }

    /// Wall-clock budget for a search.
    #[must_use]
    pub const fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Maximum number of nodes a search may visit.
    #[must_use]
    pub const fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }
}

/// Shared flag that asks a running search to stop.
///
/// Clones observe the same flag, so a token may be handed to another thread
/// and triggered while the search runs.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every search holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Reports whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Answer produced by [`solve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    /// A grid with every cell lit and every pillar satisfied.
    Solved(Grid),
    /// No placement extending the existing emitters solves the safe.
    NoSolution,
    /// The search stopped early.
    Interrupted(Interruption),
}

/// Next step suggested by [`hint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    /// Place an emitter at this cell.
    Place(CellCoord),
    /// The placed emitters already solve the safe.
    NoNextStep,
    /// No solution extends the emitters already placed.
    Unsolvable,
    /// The search stopped early.
    Interrupted(Interruption),
}

/// Solver driving a [`Backtracker`] over safe configurations.
#[derive(Debug)]
pub struct Solver {
    backtracker: Backtracker,
}

impl Solver {
    /// Creates a solver honouring `config` and stopping when `cancel` fires.
    #[must_use]
    pub fn new(config: Config, cancel: CancelToken) -> Self {
        Self {
            backtracker: Backtracker::new(config, cancel),
        }
    }

    /// Searches for a placement of emitters solving the pillars of `grid`.
    ///
    /// Emitters already on `grid` are kept as part of the answer; the input
    /// is not modified.
    pub fn solve(&mut self, grid: &Grid) -> Solution {
        let solution = match self.backtracker.solve(SafeConfig::new(grid)) {
            Outcome::Solved(config) => Solution::Solved(config.into_grid()),
            Outcome::Exhausted => Solution::NoSolution,
            Outcome::Interrupted(interruption) => Solution::Interrupted(interruption),
        };

        let stats = self.stats();
        info!(
            width = grid.width(),
            height = grid.height(),
            visited = stats.visited,
            pruned = stats.pruned,
            solved = matches!(solution, Solution::Solved(_)),
            "solver finished"
        );
        solution
    }

    /// Suggests the next emitter to place on `grid`.
    ///
    /// Solves the safe around the emitters already placed and returns the
    /// first emitter of that solution, in row-major order, that is not yet on
    /// `grid`. Placements that admit no solution yield [`Hint::Unsolvable`].
    pub fn hint(&mut self, grid: &Grid) -> Hint {
        match self.solve(grid) {
            Solution::Solved(solved) => solved
                .emitters()
                .iter()
                .find(|cell| !grid.emitters().contains(*cell))
                .map_or(Hint::NoNextStep, |cell| Hint::Place(*cell)),
            Solution::NoSolution => Hint::Unsolvable,
            Solution::Interrupted(interruption) => Hint::Interrupted(interruption),
        }
    }

    /// Counters from the most recent search.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.backtracker.stats()
    }
}

/// Solves `grid` without limits, stopping only when `cancel` fires.
pub fn solve(grid: &Grid, cancel: &CancelToken) -> Solution {
    Solver::new(Config::default(), cancel.clone()).solve(grid)
}

/// Suggests the next emitter for `grid` without limits.
pub fn hint(grid: &Grid, cancel: &CancelToken) -> Hint {
    Solver::new(Config::default(), cancel.clone()).hint(grid)
}

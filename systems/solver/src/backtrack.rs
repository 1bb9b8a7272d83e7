//! Depth-first backtracking over any [`Configuration`].
//!
//! Each node is checked before its successors are generated:
//!
//! 1. stop conditions (cancellation, wall-clock limit, node limit);
//! 2. goal test, returning the node as the solution;
//! 3. validity test, pruning the whole subtree when it fails;
//! 4. recursion into successors in the order they were produced.
//!
//! The search stops at the first goal found.

use std::time::Instant;

use tracing::{debug, trace};

use crate::{CancelToken, Config};

/// A node of the search tree.
pub trait Configuration: Sized {
    /// Children of this node, in the order they should be explored.
    fn successors(&self) -> Vec<Self>;

    /// Whether this node can still lead to a goal.
    fn is_valid(&self) -> bool;

    /// Whether this node is a solution.
    fn is_goal(&self) -> bool;
}

/// Why a search stopped before finishing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interruption {
    /// The cancellation token was triggered.
    Cancelled,
    /// The configured wall-clock limit elapsed.
    TimedOut,
    /// The configured number of nodes was visited.
    NodeLimit,
}

/// Result of one backtracking run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<C> {
    /// The first goal reached.
    Solved(C),
    /// Every branch was explored without reaching a goal.
    Exhausted,
    /// The search stopped early; a goal may still exist.
    Interrupted(Interruption),
}

/// Counters collected during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes checked against the goal and validity tests.
    pub visited: u64,
    /// Nodes rejected by the validity test.
    pub pruned: u64,
    /// Deepest level reached, the root being zero.
    pub max_depth: usize,
}

/// Generic depth-first search driver.
#[derive(Debug)]
pub struct Backtracker {
    config: Config,
    cancel: CancelToken,
    deadline: Option<Instant>,
    stats: SearchStats,
}

impl Backtracker {
    /// Creates a driver that honours `config` and stops when `cancel` fires.
    #[must_use]
    pub fn new(config: Config, cancel: CancelToken) -> Self {
        Self {
            config,
            cancel,
            deadline: None,
            stats: SearchStats::default(),
        }
    }

    /// Searches the tree rooted at `initial` for the first goal.
    pub fn solve<C: Configuration>(&mut self, initial: C) -> Outcome<C> {
        self.stats = SearchStats::default();
        self.deadline = self
            .config
            .time_limit()
            .map(|limit| Instant::now() + limit);

        let outcome = self.explore(initial, 0);
        debug!(
            visited = self.stats.visited,
            pruned = self.stats.pruned,
            max_depth = self.stats.max_depth,
            solved = matches!(outcome, Outcome::Solved(_)),
            "search finished"
        );
        outcome
    }

    /// Counters from the most recent run.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    fn explore<C: Configuration>(&mut self, node: C, depth: usize) -> Outcome<C> {
        if let Some(interruption) = self.interruption() {
            trace!(?interruption, depth, "search interrupted");
            return Outcome::Interrupted(interruption);
        }

        self.stats.visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if node.is_goal() {
            return Outcome::Solved(node);
        }

        if !node.is_valid() {
            self.stats.pruned += 1;
            trace!(depth, "pruned branch");
            return Outcome::Exhausted;
        }

        for child in node.successors() {
            match self.explore(child, depth + 1) {
                Outcome::Exhausted => {}
                finished => return finished,
            }
        }
        Outcome::Exhausted
    }

    fn interruption(&self) -> Option<Interruption> {
        if self.cancel.is_cancelled() {
            return Some(Interruption::Cancelled);
        }
        if self
            .config
            .node_limit()
            .is_some_and(|limit| self.stats.visited >= limit)
        {
            return Some(Interruption::NodeLimit);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(Interruption::TimedOut);
        }
        None
    }
}

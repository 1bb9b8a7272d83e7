//! Machine-readable summary of a solver run.

use lasers_core::CellCoord;
use lasers_system_solver::{
    backtrack::{Interruption, SearchStats},
    Solution,
};
use lasers_world::query;
use serde::Serialize;

/// How the search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Status {
    Solved,
    NoSolution,
    Cancelled,
    TimedOut,
    NodeLimit,
}

/// Search counters as reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct StatsReport {
    visited: u64,
    pruned: u64,
    max_depth: usize,
}

/// Outcome of `lasers solve --json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct SolveReport {
    status: Status,
    emitters: Vec<CellCoord>,
    rows: Vec<String>,
    stats: StatsReport,
}

impl SolveReport {
    pub(crate) fn new(solution: &Solution, stats: SearchStats) -> Self {
        let (status, emitters, rows) = match solution {
            Solution::Solved(grid) => {
                let rows = query::rows(grid)
                    .iter()
                    .map(|cells| {
                        cells
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect();
                (Status::Solved, query::emitters(grid), rows)
            }
            Solution::NoSolution => (Status::NoSolution, Vec::new(), Vec::new()),
            Solution::Interrupted(interruption) => {
                let status = match interruption {
                    Interruption::Cancelled => Status::Cancelled,
                    Interruption::TimedOut => Status::TimedOut,
                    Interruption::NodeLimit => Status::NodeLimit,
                };
                (status, Vec::new(), Vec::new())
            }
        };

        Self {
            status,
            emitters,
            rows,
            stats: StatsReport {
                visited: stats.visited,
                pruned: stats.pruned,
                max_depth: stats.max_depth,
            },
        }
    }
}

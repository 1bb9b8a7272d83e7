#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for playing, solving and verifying lasers safes.

mod console;
mod report;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use lasers_core::{CellCoord, Command};
use lasers_rendering::{describe_event, render_grid};
use lasers_system_solver::{CancelToken, Config, Solution, Solver};
use lasers_world::{self as world, load_grid, Grid};
use tracing::{info, Level};

use crate::{
    console::{describe_interruption, Session},
    report::SolveReport,
};

/// Play, solve or verify a lasers safe.
#[derive(Debug, Parser)]
#[command(name = "lasers", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Place lasers interactively, optionally replaying a script first.
    Play {
        /// Safe description file.
        safe: PathBuf,
        /// Console commands to run before prompting.
        input: Option<PathBuf>,
        #[command(flatten)]
        limits: Limits,
    },
    /// Search for a placement of lasers that solves the safe.
    Solve {
        /// Safe description file.
        safe: PathBuf,
        #[command(flatten)]
        limits: Limits,
        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check a safe, optionally after placing lasers listed as `row column` lines.
    Verify {
        /// Safe description file.
        safe: PathBuf,
        /// File with one `row column` pair per line.
        #[arg(long)]
        placements: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, clap::Args)]
struct Limits {
    /// Stop searching after this many seconds.
    #[arg(long, value_name = "SECS")]
    time_limit: Option<f64>,
    /// Stop searching after visiting this many nodes.
    #[arg(long, value_name = "N")]
    node_limit: Option<u64>,
}

impl Limits {
    fn config(self) -> Result<Config> {
        let time_limit = self
            .time_limit
            .map(Duration::try_from_secs_f64)
            .transpose()
            .context("time limit must be a non-negative number of seconds")?;
        Ok(Config::new(time_limit, self.node_limit))
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    install_tracing(cli.verbose);

    match cli.command {
        Mode::Play {
            safe,
            input,
            limits,
        } => play(&safe, input.as_deref(), limits.config()?),
        Mode::Solve { safe, limits, json } => solve(&safe, limits.config()?, json),
        Mode::Verify { safe, placements } => verify(&safe, placements.as_deref()),
    }
}

fn install_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn read_safe(path: &Path) -> Result<Grid> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read safe file '{}'", path.display()))?;
    let grid = load_grid(&source)
        .with_context(|| format!("failed to parse safe file '{}'", path.display()))?;
    info!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        pillars = grid.pillars().len(),
        "loaded safe"
    );
    Ok(grid)
}

fn play(safe: &Path, input: Option<&Path>, config: Config) -> Result<ExitCode> {
    let grid = read_safe(safe)?;
    let stdout = io::stdout();
    let mut session = Session::new(grid, config, stdout.lock());

    if let Some(input) = input {
        let script = fs::read_to_string(input)
            .with_context(|| format!("failed to read input file '{}'", input.display()))?;
        session.run_script(&script)?;
    }
    session.run_interactive(io::stdin().lock())?;
    Ok(ExitCode::SUCCESS)
}

fn solve(safe: &Path, config: Config, json: bool) -> Result<ExitCode> {
    let grid = read_safe(safe)?;
    let mut solver = Solver::new(config, CancelToken::new());
    let solution = solver.solve(&grid);

    let mut stdout = io::stdout().lock();
    if json {
        let report = SolveReport::new(&solution, solver.stats());
        serde_json::to_writer_pretty(&mut stdout, &report).context("failed to write report")?;
        writeln!(stdout)?;
    } else {
        match &solution {
            Solution::Solved(solved) => writeln!(stdout, "{}", render_grid(solved))?,
            Solution::NoSolution => writeln!(stdout, "This safe has no solution!")?,
            Solution::Interrupted(interruption) => {
                writeln!(stdout, "{}", describe_interruption(*interruption))?;
            }
        }
    }

    Ok(match solution {
        Solution::Solved(_) => ExitCode::SUCCESS,
        Solution::NoSolution | Solution::Interrupted(_) => ExitCode::FAILURE,
    })
}

fn verify(safe: &Path, placements: Option<&Path>) -> Result<ExitCode> {
    let mut grid = read_safe(safe)?;
    let mut events = Vec::new();

    if let Some(path) = placements {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read placements file '{}'", path.display()))?;
        for cell in parse_placements(&source)
            .with_context(|| format!("failed to parse placements file '{}'", path.display()))?
        {
            world::apply(&mut grid, Command::AddEmitter { cell }, &mut events);
        }
    }
    world::apply(&mut grid, Command::Verify, &mut events);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render_grid(&grid))?;
    for event in &events {
        writeln!(stdout, "{}", describe_event(event))?;
    }

    Ok(if world::query::verdict(&grid).is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse_placements(source: &str) -> Result<Vec<CellCoord>> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let mut tokens = line.split_whitespace().map(str::parse::<u32>);
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(Ok(row)), Some(Ok(column)), None) => Ok(CellCoord::new(row, column)),
                _ => anyhow::bail!("line {}: expected `row column`, found '{line}'", index + 1),
            }
        })
        .collect()
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for a lasers safe.
//!
//! The [`Grid`] stores the cells, the [`beam`] module projects beams through
//! it, and the [`validate`] module checks placements against the pillars.
//! Adapters mutate a live grid only through [`apply`], which repaints beams
//! after every accepted change and reports what happened as events.

pub mod beam;
mod grid;
mod parse;
pub mod validate;

use lasers_core::{Action, Cell, CellCoord, Command, Event, MutationError};
use tracing::debug;

pub use grid::Grid;
pub use parse::{load_grid, ParseError};

/// Applies the provided command to the grid, reporting the outcome as events.
///
/// Rejected commands leave the grid untouched and push [`Event::Rejected`].
pub fn apply(grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AddEmitter { cell } => match add_emitter(grid, cell) {
            Ok(()) => out_events.push(Event::EmitterAdded { cell }),
            Err(reason) => reject(Action::Add, cell, reason, out_events),
        },
        Command::RemoveEmitter { cell } => match remove_emitter(grid, cell) {
            Ok(()) => out_events.push(Event::EmitterRemoved { cell }),
            Err(reason) => reject(Action::Remove, cell, reason, out_events),
        },
        Command::Verify => {
            let verdict = validate::verify(grid);
            debug!(?verdict, "verified grid");
            out_events.push(Event::Verified { verdict });
        }
        Command::Reset => {
            grid.reset_non_pillars();
            out_events.push(Event::GridReset);
        }
    }
}

fn add_emitter(grid: &mut Grid, cell: CellCoord) -> Result<(), MutationError> {
    match grid.get(cell)? {
        Cell::Pillar(_) => Err(MutationError::Pillar),
        Cell::Emitter => Err(MutationError::Occupied),
        Cell::Empty | Cell::Beam => {
            grid.set(cell, Cell::Emitter)?;
            beam::update_beams(grid);
            Ok(())
        }
    }
}

fn remove_emitter(grid: &mut Grid, cell: CellCoord) -> Result<(), MutationError> {
    match grid.get(cell)? {
        Cell::Pillar(_) => Err(MutationError::Pillar),
        Cell::Empty | Cell::Beam => Err(MutationError::NoEmitter),
        Cell::Emitter => {
            grid.set(cell, Cell::Empty)?;
            beam::clear_from(grid, cell);
            beam::update_beams(grid);
            Ok(())
        }
    }
}

fn reject(action: Action, cell: CellCoord, reason: MutationError, out_events: &mut Vec<Event>) {
    debug!(?action, %cell, %reason, "rejected grid mutation");
    out_events.push(Event::Rejected {
        action,
        cell,
        reason,
    });
}

/// Query functions that provide read-only access to the grid state.
pub mod query {
    use lasers_core::{Cell, CellCoord, Verdict};

    use super::{validate, Grid};

    /// Captures the grid as rows of cells, top to bottom.
    #[must_use]
    pub fn rows(grid: &Grid) -> Vec<Vec<Cell>> {
        let width = grid.width() as usize;
        let cells: Vec<Cell> = grid.cells().map(|(_, cell)| cell).collect();
        cells.chunks(width).map(<[Cell]>::to_vec).collect()
    }

    /// Emitters currently placed, in row-major order.
    #[must_use]
    pub fn emitters(grid: &Grid) -> Vec<CellCoord> {
        grid.emitters().iter().copied().collect()
    }

    /// Runs a verification pass without emitting events.
    #[must_use]
    pub fn verdict(grid: &Grid) -> Verdict {
        validate::verify(grid)
    }
}

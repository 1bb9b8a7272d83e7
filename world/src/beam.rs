//! Beam projection along the four axis directions.
//!
//! A walk starts next to its origin and moves one cell at a time. Pillars
//! always stop it. An emitter stops painting and clearing, but counts as a
//! conflict when detecting. Empty and lit floor is painted, cleared or skipped
//! depending on the mode, and the grid boundary ends the walk quietly.

use lasers_core::{Cell, CellCoord, Direction};

use crate::grid::Grid;

/// What a beam walk does to the cells it crosses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BeamMode {
    /// Writes [`Cell::Beam`] into every floor cell reached.
    Paint,
    /// Writes [`Cell::Empty`] into every floor cell reached.
    Clear,
    /// Leaves the grid untouched and looks for another emitter.
    Detect,
}

/// Walks from `origin` toward `direction` applying `mode`.
///
/// Returns `true` only in [`BeamMode::Detect`], and only when an emitter is
/// reached before any pillar or the boundary.
pub fn project(grid: &mut Grid, origin: CellCoord, direction: Direction, mode: BeamMode) -> bool {
    let fill = match mode {
        BeamMode::Detect => return detect(grid, origin, direction),
        BeamMode::Paint => Cell::Beam,
        BeamMode::Clear => Cell::Empty,
    };

    let mut next = origin.step(direction);
    while let Some(cell) = next {
        match grid.get(cell) {
            Ok(Cell::Empty | Cell::Beam) => grid.overwrite(cell, fill),
            Ok(Cell::Emitter | Cell::Pillar(_)) | Err(_) => break,
        }
        next = cell.step(direction);
    }
    false
}

/// Read-only lookup of an emitter visible from `origin` along `direction`.
#[must_use]
pub fn detect(grid: &Grid, origin: CellCoord, direction: Direction) -> bool {
    let mut next = origin.step(direction);
    while let Some(cell) = next {
        match grid.get(cell) {
            Ok(Cell::Emitter) => return true,
            Ok(Cell::Pillar(_)) | Err(_) => return false,
            Ok(Cell::Empty | Cell::Beam) => {}
        }
        next = cell.step(direction);
    }
    false
}

/// Reports whether any emitter is visible from `origin` in any direction.
#[must_use]
pub fn detect_conflict(grid: &Grid, origin: CellCoord) -> bool {
    Direction::ALL
        .into_iter()
        .any(|direction| detect(grid, origin, direction))
}

/// Repaints the beams of every placed emitter.
///
/// Painting never removes stale beams; callers clear first when an emitter
/// disappears.
pub fn update_beams(grid: &mut Grid) {
    let emitters: Vec<CellCoord> = grid.emitters().iter().copied().collect();
    for emitter in emitters {
        for direction in Direction::ALL {
            let _ = project(grid, emitter, direction, BeamMode::Paint);
        }
    }
}

/// Drops every beam and paints the current emitters' beams again.
pub fn repaint(grid: &mut Grid) {
    grid.clear_beams();
    update_beams(grid);
}

/// Clears the four beams that would leave `origin`.
pub fn clear_from(grid: &mut Grid, origin: CellCoord) {
    for direction in Direction::ALL {
        let _ = project(grid, origin, direction, BeamMode::Clear);
    }
}

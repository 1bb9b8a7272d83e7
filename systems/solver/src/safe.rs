//! Search configuration that fills a safe one cell at a time.
//!
//! Pillars and emitters present when the search starts are fixed; the
//! search only decides the remaining floor cells.

use lasers_core::{Cell, CellCoord};
use lasers_world::{beam, validate, Grid};

use crate::backtrack::Configuration;

/// Partial placement of emitters together with the next cell to decide.
///
/// Cells before the cursor in row-major order are decided; cells from the
/// cursor onwards are still open. A cursor of `None` means every cell has
/// been decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeConfig {
    grid: Grid,
    cursor: Option<CellCoord>,
}

impl SafeConfig {
    /// Starts a search from `grid`, keeping its pillars and emitters fixed.
    ///
    /// Beams are repainted from the placed emitters; every other cell is
    /// left for the search to decide.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        let mut grid = grid.clone();
        beam::repaint(&mut grid);
        Self {
            grid,
            cursor: Some(CellCoord::new(0, 0)),
        }
    }

    /// Grid holding the decisions made so far.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consumes the configuration, returning its grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Next cell to decide, if any remain.
    #[must_use]
    pub const fn cursor(&self) -> Option<CellCoord> {
        self.cursor
    }

    fn first_open_cell(&self) -> Option<CellCoord> {
        let mut cursor = self.cursor?;
        while matches!(self.grid.get(cursor), Ok(Cell::Pillar(_) | Cell::Emitter)) {
            cursor = self.grid.next_in_order(cursor)?;
        }
        Some(cursor)
    }

    fn advanced(&self, cursor: Option<CellCoord>) -> Self {
        Self {
            grid: self.grid.clone(),
            cursor,
        }
    }
}

impl Configuration for SafeConfig {
    /// Decides the next open cell, trying an emitter before leaving it
    /// unlit. Pillars and fixed emitters are skipped without branching.
    fn successors(&self) -> Vec<Self> {
        if self.cursor.is_none() {
            return Vec::new();
        }

        let Some(open) = self.first_open_cell() else {
            return vec![self.advanced(None)];
        };
        let next = self.grid.next_in_order(open);

        let mut lit = self.advanced(next);
        if lit.grid.set(open, Cell::Emitter).is_ok() {
            beam::update_beams(&mut lit.grid);
        }
        let dark = self.advanced(next);

        vec![lit, dark]
    }

    fn is_valid(&self) -> bool {
        validate::is_locally_valid(&self.grid)
    }

    fn is_goal(&self) -> bool {
        self.cursor.is_none()
            && validate::is_locally_valid(&self.grid)
            && validate::is_satisfied(&self.grid)
    }
}

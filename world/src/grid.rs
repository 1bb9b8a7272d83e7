//! Dense cell storage for a single safe.

use std::{collections::BTreeSet, sync::Arc};

use lasers_core::{BoundsError, Cell, CellCoord, Direction, MutationError};

use crate::parse::ParseError;

/// Rectangular safe layout holding one [`Cell`] per position.
///
/// Cloning a grid deep-copies the cells and the emitter set. The pillar list
/// never changes after construction and is shared between clones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    emitters: BTreeSet<CellCoord>,
    pillars: Arc<[CellCoord]>,
}

impl Grid {
    /// Builds a grid from row-major cells.
    ///
    /// Fails when either dimension is zero or the cell count does not match
    /// `width * height`.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> Result<Self, ParseError> {
        if width == 0 || height == 0 {
            return Err(ParseError::ZeroDimension { width, height });
        }

        let expected = u64::from(width) * u64::from(height);
        if cells.len() as u64 != expected {
            return Err(ParseError::CellCount {
                expected,
                found: cells.len(),
            });
        }

        let mut emitters = BTreeSet::new();
        let mut pillars = Vec::new();
        for (index, cell) in cells.iter().enumerate() {
            let coord = coord_at(width, index);
            match cell {
                Cell::Emitter => {
                    let _ = emitters.insert(coord);
                }
                Cell::Pillar(_) => pillars.push(coord),
                Cell::Empty | Cell::Beam => {}
            }
        }

        Ok(Self {
            width,
            height,
            cells,
            emitters,
            pillars: pillars.into(),
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.height && cell.column() < self.width
    }

    /// Returns the cell stored at the coordinate.
    pub fn get(&self, cell: CellCoord) -> Result<Cell, BoundsError> {
        self.index(cell)
            .map(|index| self.cells[index])
            .ok_or(BoundsError {
                cell,
                width: self.width,
                height: self.height,
            })
    }

    /// Overwrites a non-pillar cell, keeping the emitter set in sync.
    ///
    /// Pillar positions and pillar values are both refused; the grid is left
    /// untouched on error.
    pub fn set(&mut self, cell: CellCoord, value: Cell) -> Result<(), MutationError> {
        if self.get(cell)?.is_pillar() || value.is_pillar() {
            return Err(MutationError::Pillar);
        }
        self.overwrite(cell, value);
        Ok(())
    }

    /// Sets every non-pillar cell to [`Cell::Empty`] and forgets all emitters.
    pub fn reset_non_pillars(&mut self) {
        for cell in &mut self.cells {
            if !cell.is_pillar() {
                *cell = Cell::Empty;
            }
        }
        self.emitters.clear();
    }

    pub(crate) fn clear_beams(&mut self) {
        for cell in &mut self.cells {
            if *cell == Cell::Beam {
                *cell = Cell::Empty;
            }
        }
    }

    /// Coordinates currently holding an emitter, in row-major order.
    #[must_use]
    pub fn emitters(&self) -> &BTreeSet<CellCoord> {
        &self.emitters
    }

    /// Coordinates of every pillar, in row-major order.
    #[must_use]
    pub fn pillars(&self) -> &[CellCoord] {
        &self.pillars
    }

    /// Reports whether both grids share the same pillar list allocation.
    #[must_use]
    pub fn shares_pillars_with(&self, other: &Grid) -> bool {
        Arc::ptr_eq(&self.pillars, &other.pillars)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (coord_at(width, index), *cell))
    }

    /// Orthogonal neighbours of `cell` that lie inside the grid.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(move |neighbor| self.contains(*neighbor))
    }

    /// Coordinate following `cell` in row-major order, or `None` past the end.
    #[must_use]
    pub fn next_in_order(&self, cell: CellCoord) -> Option<CellCoord> {
        if cell.column() + 1 < self.width {
            Some(CellCoord::new(cell.row(), cell.column() + 1))
        } else if cell.row() + 1 < self.height {
            Some(CellCoord::new(cell.row() + 1, 0))
        } else {
            None
        }
    }

    pub(crate) fn overwrite(&mut self, cell: CellCoord, value: Cell) {
        let Some(index) = self.index(cell) else {
            return;
        };
        debug_assert!(!self.cells[index].is_pillar(), "pillar at {cell} overwritten");
        self.cells[index] = value;
        if value.is_emitter() {
            let _ = self.emitters.insert(cell);
        } else {
            let _ = self.emitters.remove(&cell);
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

fn coord_at(width: u32, index: usize) -> CellCoord {
    let width = width as usize;
    CellCoord::new((index / width) as u32, (index % width) as u32)
}

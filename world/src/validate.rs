//! Constraint checks over a grid.
//!
//! [`is_locally_valid`] is the relaxed check used while a placement is still
//! being built: pillars may not be over-served, but under-served pillars and
//! unlit floor are tolerated. [`is_satisfied`] and [`verify`] demand the
//! finished state.

use lasers_core::{Cell, CellCoord, Requirement, Verdict, Violation};

use crate::{beam, grid::Grid};

/// Counts emitters on the orthogonal neighbours of `cell`.
#[must_use]
pub fn adjacent_emitters(grid: &Grid, cell: CellCoord) -> u8 {
    grid.neighbors(cell)
        .filter(|neighbor| matches!(grid.get(*neighbor), Ok(Cell::Emitter)))
        .count() as u8
}

/// Reports whether a partial placement can still lead to a solution.
///
/// Fails on the first emitter that sees another emitter, or on any numeric
/// pillar touching more emitters than it demands.
#[must_use]
pub fn is_locally_valid(grid: &Grid) -> bool {
    if grid
        .emitters()
        .iter()
        .any(|emitter| beam::detect_conflict(grid, *emitter))
    {
        return false;
    }

    grid.pillars().iter().all(|pillar| match grid.get(*pillar) {
        Ok(Cell::Pillar(Requirement::Exactly(required))) => {
            adjacent_emitters(grid, *pillar) <= required
        }
        _ => true,
    })
}

/// Reports whether no floor is unlit and every numeric pillar is served exactly.
#[must_use]
pub fn is_satisfied(grid: &Grid) -> bool {
    grid.cells().all(|(coord, cell)| match cell {
        Cell::Empty => false,
        Cell::Pillar(Requirement::Exactly(required)) => adjacent_emitters(grid, coord) == required,
        Cell::Emitter | Cell::Beam | Cell::Pillar(Requirement::Any) => true,
    })
}

/// Scans the grid in row-major order and reports the first violation.
///
/// Beams are read as they are; callers repaint them before verifying.
#[must_use]
pub fn verify(grid: &Grid) -> Verdict {
    for (cell, contents) in grid.cells() {
        if let Some(violation) = violation_at(grid, cell, contents) {
            return Verdict::FirstViolation { cell, violation };
        }
    }
    Verdict::Valid
}

fn violation_at(grid: &Grid, cell: CellCoord, contents: Cell) -> Option<Violation> {
    match contents {
        Cell::Emitter if beam::detect_conflict(grid, cell) => Some(Violation::EmitterConflict),
        Cell::Pillar(Requirement::Exactly(required)) => {
            let found = adjacent_emitters(grid, cell);
            (found != required).then_some(Violation::PillarMismatch { required, found })
        }
        Cell::Empty => Some(Violation::Unlit),
        Cell::Emitter | Cell::Beam | Cell::Pillar(Requirement::Any) => None,
    }
}

#[cfg(test)]
mod tests {
    use lasers_core::{Cell, CellCoord, Requirement, Verdict, Violation};

    use super::{adjacent_emitters, is_locally_valid, is_satisfied, verify};
    use crate::{beam::update_beams, grid::Grid};

    fn lit(width: u32, symbols: &str) -> Grid {
        let cells: Vec<Cell> = symbols
            .chars()
            .map(|symbol| Cell::from_symbol(symbol).expect("known symbol"))
            .collect();
        let height = cells.len() as u32 / width;
        let mut grid = Grid::from_cells(width, height, cells).expect("valid grid");
        update_beams(&mut grid);
        grid
    }

    #[test]
    fn adjacent_emitters_counts_orthogonal_neighbours_only() {
        let grid = lit(3, "L.L.2.L.L");
        assert_eq!(adjacent_emitters(&grid, CellCoord::new(1, 1)), 0);

        let grid = grid_with_cross();
        assert_eq!(adjacent_emitters(&grid, CellCoord::new(1, 1)), 4);
    }

    fn grid_with_cross() -> Grid {
        lit(3, "XLXL4LXLX")
    }

    #[test]
    fn local_validity_tolerates_under_served_pillars() {
        let grid = lit(3, ".L......3");
        assert!(is_locally_valid(&grid));
        assert!(!is_satisfied(&grid));
    }

    #[test]
    fn local_validity_rejects_over_served_pillars() {
        let grid = lit(3, "XLX.1L...");
        assert!(!is_locally_valid(&grid));
    }

    #[test]
    fn any_pillars_never_constrain() {
        let grid = grid_with_cross();
        assert!(is_locally_valid(&grid));

        let grid = lit(3, "XLXLXLXLX");
        assert!(is_locally_valid(&grid));
        assert!(is_satisfied(&grid));
    }

    #[test]
    fn local_validity_rejects_emitters_in_line() {
        let grid = lit(3, "L.L......");
        assert!(!is_locally_valid(&grid));
    }

    #[test]
    fn verify_stops_at_first_violation_in_row_major_order() {
        let grid = lit(3, "...L.L...");
        assert_eq!(
            verify(&grid),
            Verdict::FirstViolation {
                cell: CellCoord::new(0, 1),
                violation: Violation::Unlit,
            }
        );

        let grid = lit(2, "L*L*");
        assert_eq!(
            verify(&grid),
            Verdict::FirstViolation {
                cell: CellCoord::new(0, 0),
                violation: Violation::EmitterConflict,
            }
        );
    }

    #[test]
    fn verify_reports_pillar_mismatch_counts() {
        let grid = lit(3, "L2*");
        assert_eq!(
            verify(&grid),
            Verdict::FirstViolation {
                cell: CellCoord::new(0, 1),
                violation: Violation::PillarMismatch {
                    required: 2,
                    found: 1,
                },
            }
        );
    }

    #[test]
    fn verify_accepts_a_finished_safe() {
        let grid = lit(3, "L2L");
        assert_eq!(verify(&grid), Verdict::Valid);
        assert!(is_satisfied(&grid));
    }

    #[test]
    fn satisfied_requires_exact_pillar_counts() {
        let grid = lit(3, "L2*");
        assert!(is_locally_valid(&grid));
        assert!(!is_satisfied(&grid));

        let cells = vec![Cell::Pillar(Requirement::Exactly(2))];
        let lonely = Grid::from_cells(1, 1, cells).expect("valid grid");
        assert!(is_locally_valid(&lonely));
        assert!(!is_satisfied(&lonely));
    }
}

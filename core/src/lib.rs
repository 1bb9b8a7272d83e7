#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the lasers safe engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative grid, and the solver. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! happened. Every rejected mutation and every verification produces an event
//! carrying the offending coordinate so adapters can present it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of emitters a pillar can ever touch.
pub const MAX_REQUIREMENT: u8 = 4;

/// Number of adjacent emitters demanded by a pillar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// The pillar must touch exactly this many emitters (0 to 4).
    Exactly(u8),
    /// The pillar accepts any number of adjacent emitters.
    Any,
}

impl Requirement {
    /// Returns the exact neighbour count demanded, if the pillar is numeric.
    #[must_use]
    pub const fn exact(self) -> Option<u8> {
        match self {
            Self::Exactly(count) => Some(count),
            Self::Any => None,
        }
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Unlit floor that still needs a beam or an emitter.
    Empty,
    /// Laser emitter projecting beams in the four cardinal directions.
    Emitter,
    /// Floor lit by at least one emitter.
    Beam,
    /// Fixed pillar blocking beams and constraining adjacent emitters.
    Pillar(Requirement),
}

impl Cell {
    /// Decodes the single-character symbol used by safe files.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Empty),
            'L' => Some(Self::Emitter),
            '*' => Some(Self::Beam),
            'X' => Some(Self::Pillar(Requirement::Any)),
            '0'..='4' => Some(Self::Pillar(Requirement::Exactly(symbol as u8 - b'0'))),
            _ => None,
        }
    }

    /// Encodes the cell as its single-character symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Emitter => 'L',
            Self::Beam => '*',
            Self::Pillar(Requirement::Any) => 'X',
            Self::Pillar(Requirement::Exactly(count)) => {
                if count <= MAX_REQUIREMENT {
                    (b'0' + count) as char
                } else {
                    '?'
                }
            }
        }
    }

    /// Reports whether the cell is a fixed pillar.
    #[must_use]
    pub const fn is_pillar(self) -> bool {
        matches!(self, Self::Pillar(_))
    }

    /// Reports whether the cell holds an emitter.
    #[must_use]
    pub const fn is_emitter(self) -> bool {
        matches!(self, Self::Emitter)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Cardinal directions along which beams travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];
}

/// Location of a single grid cell expressed as row and column.
///
/// Ordering is row-major, so sorted collections of coordinates iterate in the
/// same order the grid is scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Coordinate one step away in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant. The
    /// far edges are not known here; grids reject those coordinates on lookup.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(row, self.column)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(self.row, column)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(row, self.column)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(self.row, column)),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Commands that express all permissible grid mutations and checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Places an emitter on a non-pillar cell.
    AddEmitter {
        /// Cell that should receive the emitter.
        cell: CellCoord,
    },
    /// Removes a previously placed emitter.
    RemoveEmitter {
        /// Cell holding the emitter to remove.
        cell: CellCoord,
    },
    /// Checks the whole grid and reports the first violation, if any.
    Verify,
    /// Clears every emitter and beam, leaving only the pillars.
    Reset,
}

/// Mutation requested by a command, carried by rejection events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Emitter placement.
    Add,
    /// Emitter removal.
    Remove,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that an emitter was placed and beams were repainted.
    EmitterAdded {
        /// Cell now holding the emitter.
        cell: CellCoord,
    },
    /// Confirms that an emitter was removed and beams were repainted.
    EmitterRemoved {
        /// Cell that held the emitter.
        cell: CellCoord,
    },
    /// Reports that a mutation was rejected and left the grid untouched.
    Rejected {
        /// Mutation that was attempted.
        action: Action,
        /// Cell named by the rejected command.
        cell: CellCoord,
        /// Specific reason the mutation failed.
        reason: MutationError,
    },
    /// Reports the outcome of a verification pass.
    Verified {
        /// Result of the row-major scan.
        verdict: Verdict,
    },
    /// Confirms that every emitter and beam was cleared.
    GridReset,
}

/// Reasons a grid mutation may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MutationError {
    /// The coordinate lies outside the grid.
    #[error("coordinate lies outside the grid")]
    OutOfBounds,
    /// The coordinate names a pillar, which never changes.
    #[error("pillars cannot be modified")]
    Pillar,
    /// The cell already holds an emitter.
    #[error("an emitter is already placed there")]
    Occupied,
    /// The cell holds no emitter to remove.
    #[error("no emitter is placed there")]
    NoEmitter,
}

/// Lookup of a coordinate outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("cell {cell} lies outside the {height}x{width} grid")]
pub struct BoundsError {
    /// Coordinate that was requested.
    pub cell: CellCoord,
    /// Number of columns in the grid.
    pub width: u32,
    /// Number of rows in the grid.
    pub height: u32,
}

impl From<BoundsError> for MutationError {
    fn from(_: BoundsError) -> Self {
        Self::OutOfBounds
    }
}

/// Result of verifying a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Every emitter, pillar and floor cell passes.
    Valid,
    /// The row-major scan stopped at this cell.
    FirstViolation {
        /// Offending cell.
        cell: CellCoord,
        /// What is wrong with it.
        violation: Violation,
    },
}

impl Verdict {
    /// Reports whether the grid passed verification.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Kinds of constraint violations found by verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    /// The emitter sees another emitter along an unobstructed line.
    EmitterConflict,
    /// A numeric pillar touches the wrong number of emitters.
    PillarMismatch {
        /// Count demanded by the pillar.
        required: u8,
        /// Count actually adjacent.
        found: u8,
    },
    /// A floor cell is neither lit nor holding an emitter.
    Unlit,
}

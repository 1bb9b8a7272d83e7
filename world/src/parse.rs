//! Text format accepted for safe descriptions.
//!
//! The first non-blank line holds the width and height. Each following
//! non-blank line is one grid row of `width` whitespace-separated
//! single-character tokens, and there must be exactly `height` rows.

use lasers_core::Cell;
use thiserror::Error;

use crate::{beam, grid::Grid};

/// Errors produced while reading a safe description.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The source held no tokens at all.
    #[error("safe description is empty")]
    Empty,
    /// The header line did not hold exactly two tokens.
    #[error("line {line}: expected width and height")]
    MissingDimensions {
        /// One-based line number of the header.
        line: usize,
    },
    /// A dimension token was not a non-negative integer.
    #[error("line {line}: could not parse dimension '{token}'")]
    InvalidDimension {
        /// One-based line number of the header.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// One of the dimensions was zero.
    #[error("grid dimensions must be positive, found {width}x{height}")]
    ZeroDimension {
        /// Parsed width.
        width: u32,
        /// Parsed height.
        height: u32,
    },
    /// The number of grid rows did not match the declared height.
    #[error("expected {expected} rows, found {found}")]
    RowCount {
        /// Declared height.
        expected: u32,
        /// Rows present in the source.
        found: usize,
    },
    /// A grid row did not match the declared width.
    #[error("line {line}: row {row} has {found} cells, expected {expected}")]
    RowLength {
        /// One-based line number.
        line: usize,
        /// Zero-based grid row.
        row: usize,
        /// Declared width.
        expected: u32,
        /// Tokens present on the line.
        found: usize,
    },
    /// A token did not name a known cell.
    #[error("line {line}: unrecognized symbol '{token}' at row {row}, column {column}")]
    UnknownSymbol {
        /// One-based line number.
        line: usize,
        /// Zero-based grid row.
        row: usize,
        /// Zero-based grid column.
        column: usize,
        /// Offending token.
        token: String,
    },
    /// Row-major cells did not match the declared dimensions.
    #[error("expected {expected} cells, found {found}")]
    CellCount {
        /// `width * height`.
        expected: u64,
        /// Cells supplied.
        found: usize,
    },
}

/// Parses a safe description into a grid.
///
/// Beams written in the source are discarded and the beams of the described
/// emitters are painted, so the grid is ready to query.
pub fn load_grid(source: &str) -> Result<Grid, ParseError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines.next().ok_or(ParseError::Empty)?;
    let (width, height) = parse_dimensions(header_line, header)?;

    let rows: Vec<(usize, &str)> = lines.collect();
    if rows.len() != height as usize {
        return Err(ParseError::RowCount {
            expected: height,
            found: rows.len(),
        });
    }

    let mut cells = Vec::new();
    for (row, (line, text)) in rows.into_iter().enumerate() {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != width as usize {
            return Err(ParseError::RowLength {
                line,
                row,
                expected: width,
                found: tokens.len(),
            });
        }

        for (column, token) in tokens.into_iter().enumerate() {
            let cell = parse_cell(token).ok_or_else(|| ParseError::UnknownSymbol {
                line,
                row,
                column,
                token: token.to_owned(),
            })?;
            cells.push(cell);
        }
    }

    let mut grid = Grid::from_cells(width, height, cells)?;
    beam::repaint(&mut grid);
    Ok(grid)
}

fn parse_dimensions(line: usize, header: &str) -> Result<(u32, u32), ParseError> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    let [width, height] = tokens.as_slice() else {
        return Err(ParseError::MissingDimensions { line });
    };

    let parse = |token: &str| {
        token
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidDimension {
                line,
                token: token.to_owned(),
            })
    };
    let width = parse(*width)?;
    let height = parse(*height)?;

    if width == 0 || height == 0 {
        return Err(ParseError::ZeroDimension { width, height });
    }

    Ok((width, height))
}

fn parse_cell(token: &str) -> Option<Cell> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Cell::from_symbol(symbol),
        _ => None,
    }
}

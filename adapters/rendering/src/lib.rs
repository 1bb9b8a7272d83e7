#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text presentation shared by lasers adapters.

use std::fmt::Display;

use lasers_core::{Action, Event, Verdict};
use lasers_world::{query, Grid};

const HORIZONTAL_DIVIDER: char = '-';
const VERTICAL_DIVIDER: char = '|';

/// Draws the grid as text with column labels, a divider and row labels.
///
/// ```text
///   0 1 2
///   -----
/// 0|* L *
/// 1|. 2 *
/// ```
///
/// The last row is not followed by a newline.
#[must_use]
pub fn render_grid(grid: &Grid) -> String {
    let width = grid.width() as usize;
    let mut output = String::from("  ");

    for column in 0..width {
        output.push_str(&column.to_string());
        output.push(' ');
    }
    output.push_str("\n  ");
    output.extend(std::iter::repeat(HORIZONTAL_DIVIDER).take(2 * width - 1));
    output.push('\n');

    let rows: Vec<String> = query::rows(grid)
        .into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let symbols: Vec<String> = cells.iter().map(ToString::to_string).collect();
            format!("{row}{VERTICAL_DIVIDER}{}", symbols.join(" "))
        })
        .collect();
    output.push_str(&rows.join("\n"));
    output
}

/// Produces the user-facing notification for an event.
#[must_use]
pub fn describe_event(event: &Event) -> String {
    match event {
        Event::EmitterAdded { cell } => format!("Laser added at: {cell}"),
        Event::EmitterRemoved { cell } => format!("Laser removed at: {cell}"),
        Event::Rejected { action, cell, .. } => describe_rejection(*action, cell),
        Event::Verified {
            verdict: Verdict::Valid,
        } => "Safe is fully verified!".to_owned(),
        Event::Verified {
            verdict: Verdict::FirstViolation { cell, .. },
        } => format!("Error verifying at: {cell}"),
        Event::GridReset => "Safe reset".to_owned(),
    }
}

/// Notification for a mutation refused at `position`.
///
/// Adapters use it directly for positions that cannot name a grid cell, such
/// as negative coordinates typed by a player.
#[must_use]
pub fn describe_rejection(action: Action, position: impl Display) -> String {
    match action {
        Action::Add => format!("Error adding laser at: {position}"),
        Action::Remove => format!("Error removing laser at: {position}"),
    }
}

use lasers_core::{CellCoord, Command};
use lasers_system_solver::{
    backtrack::Interruption, hint, solve, CancelToken, Config, Hint, Solution, Solver,
};
use lasers_world::{self as world, load_grid, query, Grid};
use rstest::rstest;

const CENTER_PILLAR: &str = "3 3
. . .
. 2 .
. . .
";

fn grid(source: &str) -> Grid {
    load_grid(source).expect("valid safe")
}

fn solved(source: &str) -> Grid {
    match solve(&grid(source), &CancelToken::new()) {
        Solution::Solved(grid) => grid,
        other => panic!("expected a solution, got {other:?}"),
    }
}

#[test]
fn open_safe_is_solved_by_the_diagonal() {
    let solution = solved("3 3\n. . .\n. . .\n. . .");

    assert_eq!(
        query::emitters(&solution),
        vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 1),
            CellCoord::new(2, 2)
        ]
    );
    assert!(query::verdict(&solution).is_valid());
}

#[test]
fn center_pillar_is_satisfied() {
    let solution = solved(CENTER_PILLAR);

    assert_eq!(
        query::emitters(&solution),
        vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 2),
            CellCoord::new(2, 1)
        ]
    );
    assert!(query::verdict(&solution).is_valid());
}

#[test]
fn unnumbered_pillars_split_rows() {
    let solution = solved("3 1\n. X .");

    assert_eq!(
        query::emitters(&solution),
        vec![CellCoord::new(0, 0), CellCoord::new(0, 2)]
    );
}

#[rstest]
#[case::lone_pillar("1 1\n2")]
#[case::zero_pillar_between_dark_cells("3 1\n. 0 .")]
#[case::pillar_needs_more_neighbours_than_exist("2 1\n3 .")]
fn impossible_layouts_have_no_solution(#[case] source: &str) {
    assert_eq!(
        solve(&grid(source), &CancelToken::new()),
        Solution::NoSolution
    );
}

#[test]
fn solving_keeps_existing_placements_and_the_input() {
    let mut safe = grid(CENTER_PILLAR);
    let mut events = Vec::new();
    world::apply(
        &mut safe,
        Command::AddEmitter {
            cell: CellCoord::new(0, 1),
        },
        &mut events,
    );
    let before = safe.clone();

    let solution = solve(&safe, &CancelToken::new());

    assert_eq!(safe, before, "the input grid is never modified");
    let Solution::Solved(found) = solution else {
        panic!("expected a solution, got {solution:?}");
    };
    assert_eq!(
        query::emitters(&found),
        vec![
            CellCoord::new(0, 1),
            CellCoord::new(1, 0),
            CellCoord::new(2, 2)
        ]
    );
    assert!(query::verdict(&found).is_valid());
}

#[test]
fn emitters_in_the_source_are_fixed() {
    let solution = solved("3 3\n. L .\n. . .\n. . .");

    assert_eq!(
        query::emitters(&solution),
        vec![
            CellCoord::new(0, 1),
            CellCoord::new(1, 0),
            CellCoord::new(2, 2)
        ]
    );
    assert!(query::verdict(&solution).is_valid());
}

#[test]
fn conflicting_placements_have_no_solution() {
    assert_eq!(
        solve(&grid("3 1\nL . L"), &CancelToken::new()),
        Solution::NoSolution
    );
}

#[test]
fn cancelled_search_reports_interruption() {
    let cancel = CancelToken::new();
    cancel.cancel();

    assert_eq!(
        solve(&grid(CENTER_PILLAR), &cancel),
        Solution::Interrupted(Interruption::Cancelled)
    );
    assert_eq!(
        hint(&grid(CENTER_PILLAR), &cancel),
        Hint::Interrupted(Interruption::Cancelled)
    );
}

#[test]
fn node_limit_is_reported_with_statistics() {
    let mut solver = Solver::new(Config::new(None, Some(3)), CancelToken::new());

    assert_eq!(
        solver.solve(&grid(CENTER_PILLAR)),
        Solution::Interrupted(Interruption::NodeLimit)
    );
    assert_eq!(solver.stats().visited, 3);
}

#[test]
fn statistics_describe_a_finished_search() {
    let mut solver = Solver::new(Config::default(), CancelToken::new());
    let _ = solver.solve(&grid("3 3\n. . .\n. . .\n. . ."));

    let stats = solver.stats();
    assert!(stats.pruned > 0, "conflicting emitters are pruned");
    assert!(stats.visited > stats.pruned);
    assert_eq!(stats.max_depth, 9, "one level per cell");
}

#[test]
fn hint_walks_towards_the_solution() {
    let mut safe = grid(CENTER_PILLAR);
    let cancel = CancelToken::new();
    let mut events = Vec::new();

    let mut placed = Vec::new();
    loop {
        match hint(&safe, &cancel) {
            Hint::Place(cell) => {
                placed.push(cell);
                world::apply(&mut safe, Command::AddEmitter { cell }, &mut events);
            }
            Hint::NoNextStep => break,
            other => panic!("unexpected hint {other:?}"),
        }
    }

    assert_eq!(
        placed,
        vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 2),
            CellCoord::new(2, 1)
        ]
    );
    assert!(query::verdict(&safe).is_valid());
}

#[test]
fn hint_builds_on_the_player_placements() {
    let mut safe = grid(CENTER_PILLAR);
    let cancel = CancelToken::new();
    let mut events = Vec::new();
    world::apply(
        &mut safe,
        Command::AddEmitter {
            cell: CellCoord::new(0, 1),
        },
        &mut events,
    );

    let mut placed = Vec::new();
    while let Hint::Place(cell) = hint(&safe, &cancel) {
        placed.push(cell);
        world::apply(&mut safe, Command::AddEmitter { cell }, &mut events);
    }

    assert_eq!(placed, vec![CellCoord::new(1, 0), CellCoord::new(2, 2)]);
    assert_eq!(hint(&safe, &cancel), Hint::NoNextStep);
    assert!(query::verdict(&safe).is_valid());
}

#[test]
fn hint_reports_placements_that_cannot_be_completed() {
    let mut safe = grid(CENTER_PILLAR);
    let mut events = Vec::new();
    for cell in [
        CellCoord::new(0, 1),
        CellCoord::new(1, 0),
        CellCoord::new(1, 2),
    ] {
        world::apply(&mut safe, Command::AddEmitter { cell }, &mut events);
    }

    assert_eq!(hint(&safe, &CancelToken::new()), Hint::Unsolvable);
}

#[test]
fn hint_reports_unsolvable_layouts() {
    assert_eq!(
        hint(&grid("3 1\n. 0 ."), &CancelToken::new()),
        Hint::Unsolvable
    );
}

//! Line-oriented console for playing a safe by hand.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use lasers_core::{Action, CellCoord, Command, Event};
use lasers_rendering::{describe_event, describe_rejection, render_grid};
use lasers_system_solver::{
    backtrack::Interruption, CancelToken, Config, Hint, Solution, Solver,
};
use lasers_world::{self as world, Grid};
use tracing::debug;

const HELP: &str = "\
a|add r c: Add laser to (r,c)
d|display: Display safe
h|help: Print this help message
q|quit: Exit program
r|remove r c: Remove laser from (r,c)
s|solve: Solve the safe
t|hint: Add the next laser of a solution
v|verify: Verify safe correctness
x|restart: Remove every laser";

const NO_SOLUTION: &str = "This safe has no solution!";

/// Row and column as typed, which may lie outside every grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Position {
    row: i64,
    column: i64,
}

impl Position {
    fn cell(self) -> Option<CellCoord> {
        let row = u32::try_from(self.row).ok()?;
        let column = u32::try_from(self.column).ok()?;
        Some(CellCoord::new(row, column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Instruction typed at the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Instruction {
    Add(Position),
    Remove(Position),
    Display,
    Verify,
    Solve,
    Hint,
    Restart,
    Help,
    Quit,
}

/// Reasons a console line could not be turned into an instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InstructionError {
    IncorrectCoordinates,
    Unrecognized(String),
}

impl fmt::Display for InstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncorrectCoordinates => write!(f, "Incorrect coordinates"),
            Self::Unrecognized(line) => write!(f, "Unrecognized command: {line}"),
        }
    }
}

impl std::error::Error for InstructionError {}

/// Parses one console line; blank lines yield `Ok(None)`.
pub(crate) fn parse_instruction(line: &str) -> Result<Option<Instruction>, InstructionError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, arguments)) = tokens.split_first() else {
        return Ok(None);
    };

    let instruction = match keyword {
        "a" | "add" => Instruction::Add(parse_coordinates(arguments)?),
        "r" | "remove" => Instruction::Remove(parse_coordinates(arguments)?),
        "d" | "display" => Instruction::Display,
        "v" | "verify" => Instruction::Verify,
        "s" | "solve" => Instruction::Solve,
        "t" | "hint" => Instruction::Hint,
        "x" | "restart" => Instruction::Restart,
        "h" | "help" => Instruction::Help,
        "q" | "quit" => Instruction::Quit,
        _ => return Err(InstructionError::Unrecognized(line.trim().to_owned())),
    };
    Ok(Some(instruction))
}

fn parse_coordinates(arguments: &[&str]) -> Result<Position, InstructionError> {
    let [row, column] = arguments else {
        return Err(InstructionError::IncorrectCoordinates);
    };
    let row = row
        .parse()
        .map_err(|_| InstructionError::IncorrectCoordinates)?;
    let column = column
        .parse()
        .map_err(|_| InstructionError::IncorrectCoordinates)?;
    Ok(Position { row, column })
}

/// Interactive session owning the live grid.
#[derive(Debug)]
pub(crate) struct Session<W> {
    grid: Grid,
    solver_config: Config,
    output: W,
    running: bool,
    events: Vec<Event>,
}

impl<W: Write> Session<W> {
    pub(crate) fn new(grid: Grid, solver_config: Config, output: W) -> Self {
        Self {
            grid,
            solver_config,
            output,
            running: true,
            events: Vec::new(),
        }
    }

    /// Replays a script, echoing every non-blank line before executing it.
    pub(crate) fn run_script(&mut self, script: &str) -> io::Result<()> {
        for line in script.lines() {
            if !self.running {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            writeln!(self.output, "> {line}")?;
            self.execute_line(line)?;
        }
        Ok(())
    }

    /// Prompts for commands until `quit` or the end of the input.
    pub(crate) fn run_interactive<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        self.display()?;
        let mut lines = input.lines();
        while self.running {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = lines.next() else {
                writeln!(self.output)?;
                break;
            };
            self.execute_line(&line?)?;
        }
        Ok(())
    }

    /// Parses and runs a single console line.
    pub(crate) fn execute_line(&mut self, line: &str) -> io::Result<()> {
        match parse_instruction(line) {
            Ok(Some(instruction)) => self.execute(instruction),
            Ok(None) => Ok(()),
            Err(error) => writeln!(self.output, "{error}"),
        }
    }

    fn execute(&mut self, instruction: Instruction) -> io::Result<()> {
        debug!(?instruction, "console instruction");
        match instruction {
            Instruction::Add(position) => self.mutate(Action::Add, position),
            Instruction::Remove(position) => self.mutate(Action::Remove, position),
            Instruction::Verify => self.apply(Command::Verify, ""),
            Instruction::Restart => self.apply(Command::Reset, ""),
            Instruction::Display => self.display(),
            Instruction::Solve => self.solve(),
            Instruction::Hint => self.hint(),
            Instruction::Help => writeln!(self.output, "{HELP}"),
            Instruction::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }

    fn mutate(&mut self, action: Action, position: Position) -> io::Result<()> {
        let Some(cell) = position.cell() else {
            debug!(?action, %position, "coordinates outside every grid");
            writeln!(self.output, "{}", describe_rejection(action, position))?;
            return self.display();
        };
        let command = match action {
            Action::Add => Command::AddEmitter { cell },
            Action::Remove => Command::RemoveEmitter { cell },
        };
        self.apply(command, "")
    }

    fn apply(&mut self, command: Command, prefix: &str) -> io::Result<()> {
        self.events.clear();
        world::apply(&mut self.grid, command, &mut self.events);
        for event in &self.events {
            writeln!(self.output, "{prefix}{}", describe_event(event))?;
        }
        self.display()
    }

    fn solve(&mut self) -> io::Result<()> {
        let mut solver = Solver::new(self.solver_config, CancelToken::new());
        match solver.solve(&self.grid) {
            Solution::Solved(solved) => {
                self.grid = solved;
                writeln!(self.output, "Solved!")?;
                self.display()
            }
            Solution::NoSolution => writeln!(self.output, "{NO_SOLUTION}"),
            Solution::Interrupted(interruption) => {
                writeln!(self.output, "{}", describe_interruption(interruption))
            }
        }
    }

    fn hint(&mut self) -> io::Result<()> {
        let mut solver = Solver::new(self.solver_config, CancelToken::new());
        match solver.hint(&self.grid) {
            Hint::Place(cell) => self.apply(Command::AddEmitter { cell }, "Hint: "),
            Hint::NoNextStep => writeln!(self.output, "Hint: no next step!"),
            Hint::Unsolvable => writeln!(self.output, "{NO_SOLUTION}"),
            Hint::Interrupted(interruption) => {
                writeln!(self.output, "{}", describe_interruption(interruption))
            }
        }
    }

    fn display(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", render_grid(&self.grid))
    }
}

/// Message printed when a search stops early.
pub(crate) const fn describe_interruption(interruption: Interruption) -> &'static str {
    match interruption {
        Interruption::Cancelled => "Search cancelled",
        Interruption::TimedOut => "Search stopped: time limit reached",
        Interruption::NodeLimit => "Search stopped: node limit reached",
    }
}

#[cfg(test)]
mod tests {
    use lasers_core::{Cell, CellCoord};
    use lasers_system_solver::Config;
    use lasers_world::load_grid;

    use super::{parse_instruction, Instruction, InstructionError, Position, Session};

    const SAFE: &str = "3 3\n. . .\n. 2 .\n. . .";

    fn session() -> Session<Vec<u8>> {
        Session::new(load_grid(SAFE).expect("valid safe"), Config::default(), Vec::new())
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.output).expect("console writes utf-8")
    }

    #[test]
    fn long_and_short_keywords_are_equivalent() {
        for (short, long) in [
            ("a 1 2", "add 1 2"),
            ("r 0 0", "remove 0 0"),
            ("d", "display"),
            ("v", "verify"),
            ("s", "solve"),
            ("t", "hint"),
            ("x", "restart"),
            ("h", "help"),
            ("q", "quit"),
        ] {
            assert_eq!(parse_instruction(short), parse_instruction(long), "{short}");
        }
        assert_eq!(
            parse_instruction("  add   1  2 "),
            Ok(Some(Instruction::Add(Position { row: 1, column: 2 })))
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_instruction("   "), Ok(None));
    }

    #[test]
    fn malformed_coordinates_are_reported() {
        for line in ["a 1", "a 1 2 3", "r x 2", "add 1 1.5"] {
            assert_eq!(
                parse_instruction(line),
                Err(InstructionError::IncorrectCoordinates),
                "{line}"
            );
        }
    }

    #[test]
    fn coordinates_outside_every_grid_are_rejected_like_bounds_errors() {
        let mut session = session();
        session
            .run_script("add -1 0\nr 0 99999999999")
            .expect("in-memory output");

        assert!(session.grid.emitters().is_empty());
        let text = output(session);
        assert!(text.contains("> add -1 0\nError adding laser at: (-1, 0)\n"), "{text}");
        assert!(text.contains("Error removing laser at: (0, 99999999999)\n"), "{text}");
        assert!(!text.contains("Incorrect coordinates"));
    }

    #[test]
    fn unknown_keywords_echo_the_line() {
        let error = parse_instruction("fly 1 2").expect_err("unknown keyword");
        assert_eq!(error.to_string(), "Unrecognized command: fly 1 2");
    }

    #[test]
    fn script_lines_are_echoed_and_applied() {
        let mut session = session();
        session
            .run_script("a 0 0\n\nr 0 0\nbogus\n")
            .expect("in-memory output");

        let text = output(session);
        assert!(text.starts_with("> a 0 0\nLaser added at: (0, 0)\n"));
        assert!(text.contains("> r 0 0\nLaser removed at: (0, 0)\n"));
        assert!(text.ends_with("> bogus\nUnrecognized command: bogus\n"));
    }

    #[test]
    fn quit_stops_the_script() {
        let mut session = session();
        session.run_script("q\na 0 0").expect("in-memory output");

        assert!(!session.running);
        assert!(session.grid.emitters().is_empty());
    }

    #[test]
    fn solve_completes_the_player_placements() {
        let mut session = session();
        session.run_script("a 0 1\ns\nv").expect("in-memory output");

        assert_eq!(
            session.grid.get(CellCoord::new(0, 1)),
            Ok(Cell::Emitter),
            "the player's laser is part of the solution"
        );
        let text = output(session);
        assert!(text.contains("Solved!\n"));
        assert!(text.contains("Safe is fully verified!"));
    }

    #[test]
    fn hint_places_the_next_laser() {
        let mut session = session();
        session.run_script("t").expect("in-memory output");

        assert_eq!(session.grid.get(CellCoord::new(0, 0)), Ok(Cell::Emitter));
        assert!(output(session).contains("Hint: Laser added at: (0, 0)"));
    }

    #[test]
    fn node_limit_is_reported_by_solve() {
        let grid = load_grid(SAFE).expect("valid safe");
        let mut session = Session::new(grid, Config::new(None, Some(1)), Vec::new());
        session.run_script("s").expect("in-memory output");

        assert!(output(session).contains("Search stopped: node limit reached"));
    }

    #[test]
    fn interactive_session_ends_at_end_of_input() {
        let mut session = session();
        session
            .run_interactive("a 2 2\n".as_bytes())
            .expect("in-memory output");

        assert!(session.running, "no quit was typed");
        let text = output(session);
        assert!(text.starts_with("  0 1 2 \n  -----\n0|. . .\n"));
        assert!(text.contains("> Laser added at: (2, 2)"));
    }
}

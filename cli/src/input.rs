use minado_core::{Coord, Coord2};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Quit,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input. Please enter two integers.")]
    NotIntegers,
    #[error("Coordinates out of range. Try again.")]
    OutOfRange,
}

pub type Result<T> = core::result::Result<T, InputError>;

/// Parses one line of player input: `row col`, or `q`/`quit`.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(Command::Quit);
    }

    let mut tokens = line.split_whitespace();
    let (Some(row), Some(col), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(InputError::NotIntegers);
    };

    Ok(Command::Reveal((parse_axis(row)?, parse_axis(col)?)))
}

fn parse_axis(token: &str) -> Result<Coord> {
    let value: i64 = token.parse().map_err(|_| InputError::NotIntegers)?;
    Coord::try_from(value).map_err(|_| InputError::OutOfRange)
}

/// Whether the answer to a yes/no prompt is yes. Only the first non-blank character counts.
pub fn is_yes(line: &str) -> bool {
    line.trim_start().starts_with(['y', 'Y'])
}

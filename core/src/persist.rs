//! Flat text save files.
//!
//! ```text
//! Puntos: 3
//! Tablero:
//! 0 1 0
//! 1 0 0
//! Revelado:
//! 1 0 0
//! 0 1 1
//! ```
//!
//! Grid dimensions are not stored, they are taken from the rows themselves. Decoding builds a new
//! [`GameState`] and only returns it once the whole file has been read, so a failed load never leaves
//! a half-overwritten game behind.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use thiserror::Error;

use crate::{Board, Cell, CellCount, GameError, GameState};

pub const SCORE_MARKER: &str = "Puntos:";
pub const BOARD_MARKER: &str = "Tablero:";
pub const REVEALED_MARKER: &str = "Revelado:";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing {0:?} section")]
    MissingSection(&'static str),
    #[error("Line {line}: expected {expected:?}")]
    UnexpectedLine { line: usize, expected: &'static str },
    #[error("Line {line}: invalid score")]
    InvalidScore { line: usize },
    #[error("Line {line}: invalid value {value:?}")]
    InvalidValue { line: usize, value: String },
    #[error("Line {line}: expected {expected} values, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Revealed grid has {found} rows, board has {expected}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("Line {line}: unexpected data after revealed grid")]
    TrailingData { line: usize },
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = core::result::Result<T, PersistError>;

pub fn encode<W: Write>(state: &GameState, mut out: W) -> Result<()> {
    writeln!(out, "{} {}", SCORE_MARKER, state.score())?;

    writeln!(out, "{}", BOARD_MARKER)?;
    for row in state.board().cells().rows() {
        for cell in row {
            write!(out, "{} ", cell.code())?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", REVEALED_MARKER)?;
    for row in state.revealed().rows() {
        for &revealed in row {
            write!(out, "{} ", u8::from(revealed))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

pub fn decode<R: BufRead>(reader: R) -> Result<GameState> {
    let mut lines = ContentLines::new(reader);

    let (line, text) = lines
        .next_content()?
        .ok_or(PersistError::MissingSection(SCORE_MARKER))?;
    let score = parse_score(line, &text)?;

    let (line, text) = lines
        .next_content()?
        .ok_or(PersistError::MissingSection(BOARD_MARKER))?;
    expect_marker(line, &text, BOARD_MARKER)?;

    let mut cells = Vec::new();
    let mut cols = None;
    let mut rows = 0;
    loop {
        let (line, text) = lines
            .next_content()?
            .ok_or(PersistError::MissingSection(REVEALED_MARKER))?;
        if is_marker(&text, REVEALED_MARKER) {
            if rows == 0 {
                return Err(PersistError::UnexpectedLine {
                    line,
                    expected: "board row",
                });
            }
            break;
        }
        if looks_like_marker(&text) {
            return Err(PersistError::UnexpectedLine {
                line,
                expected: REVEALED_MARKER,
            });
        }

        let row = parse_row(line, &text, cols, parse_cell)?;
        cols = Some(row.len());
        cells.extend(row);
        rows += 1;
    }
    // at least one row was read, so the width is known
    let cols = cols.unwrap_or_default();

    let mut revealed = Vec::with_capacity(rows * cols);
    for found in 0..rows {
        let (line, text) = lines
            .next_content()?
            .ok_or(PersistError::ShapeMismatch {
                expected: rows,
                found,
            })?;
        revealed.extend(parse_row(line, &text, Some(cols), parse_flag)?);
    }

    if let Some((line, _)) = lines.next_content()? {
        return Err(PersistError::TrailingData { line });
    }

    let board = Board::from_cells(
        Array2::from_shape_vec((rows, cols), cells).map_err(|_| GameError::InvalidBoardShape)?,
    )?;
    let revealed =
        Array2::from_shape_vec((rows, cols), revealed).map_err(|_| GameError::InvalidBoardShape)?;
    Ok(GameState::from_parts(board, revealed, score)?)
}

/// Writes `state` to `path`, replacing whatever was there.
///
/// The game is written to a sibling `.tmp` file first and renamed over `path` once complete, so a failed save
/// leaves the previous file as it was.
pub fn save_to_path(state: &GameState, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = temp_path_for(path);

    let written = write_file(state, &tmp_path)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(PersistError::from));
    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            log::trace!("No temporary save to clean up at {}: {}", tmp_path.display(), cleanup);
        }
        return Err(err);
    }

    log::debug!("Saved game to {}", path.display());
    Ok(())
}

fn write_file(state: &GameState, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    encode(state, &mut out)?;
    out.flush()?;
    out.get_ref().sync_all()?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<GameState> {
    let path = path.as_ref();
    let state = decode(BufReader::new(File::open(path)?))?;
    log::debug!(
        "Loaded {}x{} game from {}",
        state.size().0,
        state.size().1,
        path.display()
    );
    Ok(state)
}

/// Non-blank lines with their 1-based line numbers.
struct ContentLines<R> {
    inner: io::Lines<R>,
    number: usize,
}

impl<R: BufRead> ContentLines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            number: 0,
        }
    }

    fn next_content(&mut self) -> Result<Option<(usize, String)>> {
        for text in self.inner.by_ref() {
            self.number += 1;
            let text = text?;
            if !text.trim().is_empty() {
                return Ok(Some((self.number, text)));
            }
        }
        Ok(None)
    }
}

fn is_marker(text: &str, marker: &str) -> bool {
    text.trim_start().starts_with(marker)
}

/// Any `Word:` line. Grid rows never end with a colon.
fn looks_like_marker(text: &str) -> bool {
    text.trim_end().ends_with(':')
}

fn expect_marker(line: usize, text: &str, marker: &'static str) -> Result<()> {
    if is_marker(text, marker) {
        Ok(())
    } else {
        Err(PersistError::UnexpectedLine {
            line,
            expected: marker,
        })
    }
}

fn parse_score(line: usize, text: &str) -> Result<CellCount> {
    let value = text
        .trim()
        .strip_prefix(SCORE_MARKER)
        .ok_or(PersistError::UnexpectedLine {
            line,
            expected: SCORE_MARKER,
        })?;
    value
        .trim()
        .parse()
        .map_err(|_| PersistError::InvalidScore { line })
}

fn parse_cell(code: i64) -> Option<Cell> {
    Cell::from_code(code)
}

fn parse_flag(code: i64) -> Option<bool> {
    match code {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// Parses one grid row, checking its width against `cols` when known.
fn parse_row<T>(
    line: usize,
    text: &str,
    cols: Option<usize>,
    parse: impl Fn(i64) -> Option<T>,
) -> Result<Vec<T>> {
    let row = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .ok()
                .and_then(&parse)
                .ok_or_else(|| PersistError::InvalidValue {
                    line,
                    value: token.to_owned(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    match cols {
        Some(expected) if expected != row.len() => Err(PersistError::RowLength {
            line,
            expected,
            found: row.len(),
        }),
        _ => Ok(row),
    }
}

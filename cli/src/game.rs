use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use minado_core::persist;
use minado_core::*;

use crate::input::{self, Command, InputError};

/// How a session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Won,
    Lost,
    Quit,
    EndOfInput,
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub config: GameConfig,
    pub seed: u64,
    pub save_file: PathBuf,
    pub save: bool,
}

/// Runs a whole session: pick a saved or fresh game, play it, show the result and save it.
pub fn run<R: BufRead, W: Write>(
    options: &SessionOptions,
    input: &mut R,
    out: &mut W,
) -> io::Result<Ending> {
    let Some(mut game) = start_game(options, input, out)? else {
        log::info!("Input closed before the game started");
        return Ok(Ending::EndOfInput);
    };

    let ending = play(&mut game, input, out)?;
    log::info!("Session ended: {:?}, score {}", ending, game.score());

    match ending {
        Ending::Won | Ending::Lost => {
            write!(out, "{}", BoardView::revealed(&game))?;
            writeln!(out, "Final score: {}", game.score())?;
            save(options, &game, out)?;
        }
        Ending::Quit => save(options, &game, out)?,
        Ending::EndOfInput => writeln!(out, "\nInput closed, game not saved.")?,
    }

    Ok(ending)
}

/// Offers the saved game when one exists, falling back to a fresh board. `None` when input ends first.
pub fn start_game<R: BufRead, W: Write>(
    options: &SessionOptions,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<GameState>> {
    if options.save_file.exists() {
        write!(out, "A saved game was found. Load saved game? (y/n): ")?;
        out.flush()?;

        let Some(answer) = read_line(input)? else {
            return Ok(None);
        };

        if input::is_yes(&answer) {
            match persist::load_from_path(&options.save_file) {
                Ok(game) => {
                    writeln!(out, "Saved game loaded.")?;
                    return Ok(Some(game));
                }
                Err(err) => {
                    log::warn!(
                        "Could not load {}: {}",
                        options.save_file.display(),
                        err
                    );
                    writeln!(out, "Could not load saved game ({err}). Starting a new game.")?;
                }
            }
        }
    }

    Ok(Some(new_game(options)))
}

fn new_game(options: &SessionOptions) -> GameState {
    log::debug!("New game with seed {}", options.seed);
    GameState::new(RandomBoardGenerator::new(options.seed).generate(options.config))
}

/// Prompts for moves until the game is won or lost, or the player stops.
pub fn play<R: BufRead, W: Write>(
    game: &mut GameState,
    input: &mut R,
    out: &mut W,
) -> io::Result<Ending> {
    loop {
        write!(out, "{}", BoardView::hidden(game))?;
        write!(out, "Enter coordinates to reveal (row col): ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(Ending::EndOfInput);
        };

        let coords = match input::parse_command(&line) {
            Ok(Command::Reveal(coords)) => coords,
            Ok(Command::Quit) => return Ok(Ending::Quit),
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match game.reveal(coords) {
            Ok(RevealOutcome::HitMine) => {
                writeln!(out, "You hit a mine! Game over.")?;
                return Ok(Ending::Lost);
            }
            Ok(RevealOutcome::Won) => {
                writeln!(out, "You cleared every empty cell! You win.")?;
                return Ok(Ending::Won);
            }
            Ok(RevealOutcome::Revealed(_) | RevealOutcome::AlreadyRevealed(_)) => {}
            Err(GameError::InvalidCoords) => writeln!(out, "{}", InputError::OutOfRange)?,
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}

fn save<W: Write>(options: &SessionOptions, game: &GameState, out: &mut W) -> io::Result<()> {
    if !options.save {
        return Ok(());
    }

    match persist::save_to_path(game, &options.save_file) {
        Ok(()) => writeln!(out, "Game saved to {}.", options.save_file.display()),
        Err(err) => {
            log::error!(
                "Could not save game to {}: {}",
                options.save_file.display(),
                err
            );
            writeln!(out, "Could not save the game: {err}")
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

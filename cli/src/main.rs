use std::io;
use std::path::PathBuf;

use clap::Parser;
use minado_core::{Coord, GameConfig};

mod game;
mod input;

/// Console minesweeper. Reveal cells one at a time and avoid the mines.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rows of a new board
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(1..))]
    rows: Coord,

    /// Columns of a new board
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(1..))]
    cols: Coord,

    /// Where the game is saved and loaded from
    #[arg(short, long, default_value = "estado_juego.txt")]
    file: PathBuf,

    /// Do not write the game to the save file
    #[arg(long)]
    no_save: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let options = game::SessionOptions {
        config: GameConfig::new((args.rows, args.cols)),
        seed,
        save_file: args.file,
        save: !args.no_save,
    };

    let stdin = io::stdin();
    let ending = game::run(&options, &mut stdin.lock(), &mut io::stdout().lock())?;
    log::debug!("Exited with {:?}", ending);
    Ok(())
}

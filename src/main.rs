
use life_tiles::{
    config::{ Args, Config },
    draw,
    error::{ Error, Result },
    proc::Board,
    sim::{ Headless, Simulation },
};

use clap::Parser;
use std::{
    io::{ stdin, BufRead },
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = Config::try_from(args)?;

    if config.headless {
        let board = read_board(stdin().lock(), config.grid.board_size())?;
        let mut sim = Simulation::new(&config, board)?;
        sim.run(&mut Headless)?;
        print!("{}", sim.board());
    } else if let Some(board) = draw::run(&config)? {
        print!("{board}");
    }
    Ok(())
}

/// Reads a text board up to EOF or the first empty line. No input at all
/// means an empty board.
fn read_board(input: impl BufRead, size: usize) -> Result<Board> {
    let mut s = String::new();
    for w in input.lines() {
        let w = w?;
        if !w.is_empty() {
            s.push_str(&w);
            s.push('\n')
        } else {
            break
        }
    }

    if s.is_empty() {
        return Ok(Board::new(size));
    }
    let board: Board = s.parse()?;
    if board.size() != size {
        return Err(Error::SizeMismatch { expected: size, found: board.size() });
    }
    Ok(board)
}

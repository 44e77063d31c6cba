use std::time::Duration;

use clap::Parser;

use crate::{
    error::Error,
    sched::TileGrid,
};

/// Conway's Game of Life, computed tile by tile on a grid of worker threads.
///
/// Click cells to seed the board, press `q` or Enter to start, Ctrl-C to quit.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Board side length in cells
    pub board_size: usize,

    /// Tiles per axis; must divide the board size
    pub tiles: usize,

    /// Number of generations to simulate
    pub generations: u64,

    /// Pause between generations, in milliseconds
    #[arg(short, long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Read the initial board from stdin and print the final one instead of
    /// using the terminal
    #[arg(long)]
    pub headless: bool,

    /// Log per-generation progress
    #[arg(short, long)]
    pub verbose: bool,
}

/// Checked run settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub grid: TileGrid,
    pub generations: u64,
    pub delay: Duration,
    pub headless: bool,
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Ok(Config {
            grid: TileGrid::new(args.board_size, args.tiles)?,
            generations: args.generations,
            delay: Duration::from_millis(args.delay_ms),
            headless: args.headless,
        })
    }
}

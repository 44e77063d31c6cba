//! Conway's Game of Life on a square board, advanced one generation at a time
//! by a grid of worker threads that each own one tile.

pub mod config;
pub mod draw;
pub mod error;
pub mod proc;
pub mod sched;
pub mod sim;

pub use error::{ Error, Result };

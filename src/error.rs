//! Error types for the simulator.

use thiserror::Error;

/// Crate result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Board side length of zero.
    #[error("board size must be positive")]
    EmptyBoard,

    /// Board side past the supported maximum.
    #[error("board size {board} is too large, at most {max} is supported")]
    BoardTooLarge { board: usize, max: usize },

    /// Zero tiles per axis.
    #[error("tile grid dimension must be positive")]
    NoTiles,

    /// Board side not divisible by the tile grid dimension.
    #[error("board size {board} must be divisible by the tile grid dimension {tiles}")]
    Indivisible { board: usize, tiles: usize },

    #[error("a {size}x{size} board does not fit the terminal ({width}x{height}, one line is kept for status)")]
    TerminalTooSmall { size: usize, width: u16, height: u16 },

    /// Text board that could not be read.
    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("expected a {expected}x{expected} board, got {found}x{found}")]
    SizeMismatch { expected: usize, found: usize },

    /// The OS refused to start a tile worker.
    #[error("failed to spawn tile worker: {0}")]
    Spawn(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

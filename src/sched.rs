//! Splitting the board into tiles and advancing it one generation with a
//! worker thread per tile.
//!
//! Workers read the shared current board and write to disjoint slices of the
//! next one, so cell data needs no locking. The controller waits for one
//! completion message per tile before it hands the next board back.

use std::{
    sync::mpsc,
    thread,
};

use tracing::trace;

use crate::{
    error::{ Error, Result },
    proc::{ self, Board, Tile, TileMut },
};

/// Largest accepted board side. Two boards of this size take 32 MiB.
pub const MAX_BOARD_SIZE: usize = 4096;

/// Validated partition of a `board` x `board` field into `per_axis` x
/// `per_axis` equal tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    board: usize,
    per_axis: usize,
    block: usize,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    grid: TileGrid,
}

impl TileGrid {
    pub fn new(board: usize, per_axis: usize) -> Result<Self> {
        if board == 0 {
            return Err(Error::EmptyBoard);
        }
        if board.checked_mul(board).is_none() || board > MAX_BOARD_SIZE {
            return Err(Error::BoardTooLarge { board, max: MAX_BOARD_SIZE });
        }
        if per_axis == 0 {
            return Err(Error::NoTiles);
        }
        if board % per_axis != 0 {
            return Err(Error::Indivisible { board, tiles: per_axis });
        }
        Ok(TileGrid {
            board,
            per_axis,
            block: board / per_axis,
        })
    }

    #[inline]
    pub fn board_size(&self) -> usize {
        self.board
    }

    #[inline]
    pub fn per_axis(&self) -> usize {
        self.per_axis
    }

    /// Side length of every tile.
    #[inline]
    pub fn block(&self) -> usize {
        self.block
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.per_axis * self.per_axis
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.count()).map(move |k| {
            let (r, c) = (k / self.per_axis, k % self.per_axis);
            Tile {
                rows: r * self.block..(r + 1) * self.block,
                cols: c * self.block..(c + 1) * self.block,
            }
        })
    }

    /// Carves `board` into one exclusive view per tile, in the order of
    /// [`TileGrid::tiles`].
    pub fn split<'a>(&self, board: &'a mut Board) -> Vec<TileMut<'a>> {
        assert_eq!(board.size(), self.board, "board does not match the tile grid");

        let mut views: Vec<TileMut<'a>> = self
            .tiles()
            .map(|tile| TileMut::new(tile, Vec::with_capacity(self.block)))
            .collect();

        for (i, row) in board.cells_mut().chunks_mut(self.board).enumerate() {
            let band = i / self.block;
            for (c, part) in row.chunks_mut(self.block).enumerate() {
                views[band * self.per_axis + c].push_row(part);
            }
        }
        views
    }
}

impl Scheduler {
    #[inline]
    pub fn new(grid: TileGrid) -> Self {
        Scheduler { grid }
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Fills `next` with the generation after `current`.
    ///
    /// Spawns one thread per tile and returns once every tile has reported
    /// completion, so `next` is never observed half written.
    pub fn advance(&self, current: &Board, next: &mut Board) -> Result<()> {
        assert_eq!(current.size(), self.grid.board, "board does not match the tile grid");

        let views = self.grid.split(next);
        let expected = views.len();
        let (tx, rx) = mpsc::channel();

        thread::scope(|s| -> Result<()> {
            for mut view in views {
                let tx = tx.clone();
                let name = format!("tile {}:{}", view.tile().rows.start, view.tile().cols.start);
                thread::Builder::new()
                    .name(name)
                    .spawn_scoped(s, move || {
                        proc::evaluate(current, &mut view);
                        let _ = tx.send(view.tile().clone());
                    })
                    .map_err(Error::Spawn)?;
            }
            drop(tx);

            let done = rx.iter().inspect(|tile| trace!(?tile, "tile done")).take(expected).count();
            assert_eq!(done, expected, "tile workers exited without reporting");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::Cell;

    #[test]
    fn rejects_bad_grids() {
        assert!(matches!(TileGrid::new(10, 3), Err(Error::Indivisible { board: 10, tiles: 3 })));
        assert!(matches!(TileGrid::new(0, 1), Err(Error::EmptyBoard)));
        assert!(matches!(TileGrid::new(8, 0), Err(Error::NoTiles)));
        assert!(matches!(TileGrid::new(3, 4), Err(Error::Indivisible { .. })));
        assert!(matches!(TileGrid::new(MAX_BOARD_SIZE + 1, 1), Err(Error::BoardTooLarge { .. })));
        assert!(TileGrid::new(MAX_BOARD_SIZE, 4).is_ok());
    }

    #[test]
    fn tiles_cover_board_once() {
        for (m, n) in [(1, 1), (6, 1), (6, 2), (6, 3), (6, 6), (12, 4)] {
            let grid = TileGrid::new(m, n).unwrap();
            let mut hits = vec![0u32; m * m];
            for tile in grid.tiles() {
                assert_eq!(tile.rows.len(), grid.block());
                assert_eq!(tile.cols.len(), grid.block());
                for i in tile.rows.clone() {
                    for j in tile.cols.clone() {
                        hits[i * m + j] += 1;
                    }
                }
            }
            assert_eq!(grid.tiles().count(), n * n);
            assert!(hits.iter().all(|&h| h == 1), "{m}x{m} split {n} ways");
        }
    }

    #[test]
    fn split_matches_tiles() {
        let grid = TileGrid::new(4, 2).unwrap();
        let mut board = Board::new(4);
        {
            let views = grid.split(&mut board);
            let tiles: Vec<Tile> = grid.tiles().collect();
            assert_eq!(views.len(), 4);
            for (view, tile) in views.iter().zip(&tiles) {
                assert_eq!(view.tile(), tile);
            }
        }
        // the third view is the bottom-left tile; of a full board only its
        // corner cell survives
        let full: Board = "####\n####\n####\n####\n".parse().unwrap();
        let mut views = grid.split(&mut board);
        proc::evaluate(&full, &mut views[2]);
        drop(views);
        assert_eq!(board.population(), 1);
        assert_eq!(board.get(3, 0), Cell::Alive);
    }

    #[test]
    fn advance_runs_blinker() {
        let scheduler = Scheduler::new(TileGrid::new(6, 3).unwrap());
        let current: Board = "......\n......\n.###..\n......\n......\n......\n".parse().unwrap();
        let mut next = Board::new(6);
        scheduler.advance(&current, &mut next).unwrap();
        assert_eq!(next.to_string(), "......\n..#...\n..#...\n..#...\n......\n......\n");
    }

    #[test]
    fn advance_overwrites_stale_next() {
        let scheduler = Scheduler::new(TileGrid::new(4, 2).unwrap());
        let current = Board::new(4);
        let mut next: Board = "####\n####\n####\n####\n".parse().unwrap();
        scheduler.advance(&current, &mut next).unwrap();
        assert_eq!(next, current);
    }
}

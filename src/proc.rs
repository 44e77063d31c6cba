use std::{
    fmt,
    ops::Range,
    str::FromStr,
};

use crate::error::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

/// Square field of cells, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

/// Rectangular region of a board, half-open on both axes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

/// Exclusive view of one tile of a board: one slice per tile row.
pub struct TileMut<'a> {
    tile: Tile,
    rows: Vec<&'a mut [Cell]>,
}

const OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Cell::Alive => Cell::Dead,
            Cell::Dead => Cell::Alive,
        }
    }

    /// B3/S23: the state of this cell in the next generation.
    #[inline]
    pub fn next(self, neighbors: u8) -> Self {
        match (self, neighbors) {
            (Cell::Alive, 2 | 3) => Cell::Alive,
            (Cell::Dead, 3) => Cell::Alive,
            _ => Cell::Dead,
        }
    }
}

impl Board {
    /// All-dead board of `size` x `size` cells.
    #[inline]
    pub fn new(size: usize) -> Self {
        let len = size
            .checked_mul(size)
            .unwrap_or_else(|| panic!("a {size}x{size} board has more cells than fit in memory"));
        Board {
            size,
            cells: vec![Cell::Dead; len],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let i = self.index(row, col);
        self.cells[i] = cell;
    }

    /// Flips the cell and returns its new state.
    #[inline]
    pub fn toggle(&mut self, row: usize, col: usize) -> Cell {
        let cell = self.get(row, col).toggled();
        self.set(row, col, cell);
        cell
    }

    #[inline]
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics
        self.cells.chunks(self.size.max(1))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) is outside a {0}x{0} board",
            self.size
        );
        row * self.size + col
    }
}

impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut data: Vec<Vec<Cell>> = vec![];

        for line in s.lines() {
            let r: Vec<Cell> = line
                .chars()
                .map(|c| match c {
                    '0' | ' ' | '.' => Cell::Dead,
                    _ => Cell::Alive,
                })
                .collect();
            if !r.is_empty() {
                data.push(r);
            }
        }

        let size = data.len();
        if let Some((i, r)) = data.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(Error::MalformedBoard(format!(
                "row {i} has {} cells, expected {size} for a square board",
                r.len()
            )));
        }

        Ok(Board {
            size,
            cells: data.into_iter().flatten().collect(),
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row {
                f.write_str(if c.is_alive() { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl<'a> TileMut<'a> {
    /// `rows` must hold one slice per row of `tile`, each as wide as the tile.
    pub(crate) fn new(tile: Tile, rows: Vec<&'a mut [Cell]>) -> Self {
        TileMut { tile, rows }
    }

    #[inline]
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    #[inline]
    pub(crate) fn push_row(&mut self, row: &'a mut [Cell]) {
        self.rows.push(row);
    }
}

/// Number of live cells among the 8 neighbours of (`row`, `col`).
/// Neighbours past the board edge do not exist; there is no wraparound.
pub fn count_neighbors(board: &Board, row: usize, col: usize) -> u8 {
    let size = board.size();
    OFFSETS
        .iter()
        .filter_map(|&(dr, dc)| {
            let i = row.checked_add_signed(dr).filter(|&i| i < size)?;
            let j = col.checked_add_signed(dc).filter(|&j| j < size)?;
            Some(board.get(i, j))
        })
        .filter(|c| c.is_alive())
        .count() as u8
}

/// Writes the next generation of `out`'s tile, reading only from `current`.
pub fn evaluate(current: &Board, out: &mut TileMut<'_>) {
    let tile = &out.tile;
    assert!(
        tile.rows.end <= current.size() && tile.cols.end <= current.size(),
        "tile {tile:?} exceeds a {0}x{0} board",
        current.size()
    );
    assert_eq!(out.rows.len(), tile.rows.len(), "tile view has the wrong number of rows");

    for (i, row) in tile.rows.clone().zip(out.rows.iter_mut()) {
        assert_eq!(row.len(), tile.cols.len(), "tile view row has the wrong width");
        for (j, cell) in tile.cols.clone().zip(row.iter_mut()) {
            *cell = current.get(i, j).next(count_neighbors(current, i, j));
        }
    }
}

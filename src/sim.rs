//! The generation loop: advance, swap buffers, show, pace.

use std::{
    mem,
    thread,
    time::Duration,
};

use tracing::{ debug, info };

use crate::{
    config::Config,
    error::{ Error, Result },
    proc::Board,
    sched::Scheduler,
};

/// Whatever shows the board after each generation.
pub trait Surface {
    fn render(&mut self, board: &Board, generation: u64, max: u64) -> Result<()>;
}

/// Surface that only logs progress.
pub struct Headless;

impl Surface for Headless {
    fn render(&mut self, board: &Board, generation: u64, max: u64) -> Result<()> {
        debug!(generation, max, population = board.population(), "generation done");
        Ok(())
    }
}

pub struct Simulation {
    scheduler: Scheduler,
    current: Board,
    next: Board,
    generation: u64,
    max: u64,
    delay: Duration,
}

impl Simulation {
    /// Takes over a seeded board. Its size must match the configured grid.
    pub fn new(config: &Config, board: Board) -> Result<Self> {
        let expected = config.grid.board_size();
        if board.size() != expected {
            return Err(Error::SizeMismatch { expected, found: board.size() });
        }
        Ok(Simulation {
            scheduler: Scheduler::new(config.grid),
            next: Board::new(expected),
            current: board,
            generation: 0,
            max: config.generations,
            delay: config.delay,
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.current
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.generation >= self.max
    }

    pub fn into_board(self) -> Board {
        self.current
    }

    /// Advances one generation. The freshly written buffer becomes current,
    /// the old one is reused as scratch.
    pub fn step(&mut self) -> Result<()> {
        self.scheduler.advance(&self.current, &mut self.next)?;
        mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;
        Ok(())
    }

    /// Runs the remaining generations, rendering each one.
    pub fn run<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let grid = self.scheduler.grid();
        info!(
            board = grid.board_size(),
            tiles_per_axis = grid.per_axis(),
            workers = grid.count(),
            generations = self.max,
            "simulation started"
        );

        while !self.is_done() {
            self.step()?;
            surface.render(&self.current, self.generation, self.max)?;
            if !self.is_done() {
                sleep(self.delay);
            }
        }

        info!(
            generations = self.generation,
            population = self.current.population(),
            "simulation finished"
        );
        Ok(())
    }
}

fn sleep(t: Duration) {
    if !t.is_zero() {
        thread::sleep(t)
    }
}

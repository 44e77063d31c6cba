use std::{
    io::{ self, Stdout, Write },
    time::Duration,
};

use crossterm::{
    terminal::{ self, EnterAlternateScreen, LeaveAlternateScreen, enable_raw_mode, disable_raw_mode, SetTitle, },
    cursor::{ MoveTo, Show, Hide },
    style::Print,
    execute,
    queue,
    event::{
        self,
        Event,
        KeyModifiers,
        KeyCode, KeyEventKind,
        MouseButton, MouseEventKind,
        EnableMouseCapture, DisableMouseCapture,
    },
};
use tracing::{ debug, warn };

use crate::{
    config::Config,
    error::{ Error, Result },
    proc::{ Board, Cell },
    sim::{ Simulation, Surface },
};

/// How the seeding phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeding {
    Start,
    Abort,
}

pub struct Terminal {
    out: Stdout,
    size: u16,
}

/// Checks that a `size` x `size` board plus a status line fits a terminal of
/// `width` x `height`.
pub fn fits(size: usize, width: u16, height: u16) -> Result<()> {
    if size > width as usize || size + 1 > height as usize {
        return Err(Error::TerminalTooSmall { size, width, height });
    }
    Ok(())
}

/// Seeds a board by mouse, simulates it on screen and returns the final board,
/// or `None` when seeding was aborted.
pub fn run(config: &Config) -> Result<Option<Board>> {
    let size = config.grid.board_size();
    let (width, height) = terminal::size()?;
    fits(size, width, height)?;

    let s = guarded(runup, || session(config, size), shutdown);
    // only now is stderr back on the normal screen
    if let Ok(None) = s {
        warn!("seeding aborted");
    }
    s
}

/// Runs `body` between `setup` and `teardown`. `teardown` runs even when
/// `setup` fails part way, and the first error is the one returned.
fn guarded<T>(
    setup: impl FnOnce() -> Result<()>,
    body: impl FnOnce() -> Result<T>,
    teardown: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let r = setup().and_then(|()| body());
    let t = teardown();
    let v = r?;
    t?;
    Ok(v)
}

fn session(config: &Config, size: usize) -> Result<Option<Board>> {
    let mut term = Terminal::new(size);
    let mut board = Board::new(size);

    term.frame(&board, "click cells to toggle them, q or Enter to start, Ctrl-C to quit")?;
    if term.seed(&mut board)? == Seeding::Abort {
        return Ok(None);
    }

    let mut sim = Simulation::new(config, board)?;
    sim.run(&mut term)?;

    term.status(&format!(
        "generation {}/{}  population {}  (press any key)",
        sim.generation(),
        config.generations,
        sim.board().population()
    ))?;
    wait_key()?;
    Ok(Some(sim.into_board()))
}

fn runup() -> Result<()> {
    execute!(io::stdout(), EnterAlternateScreen, SetTitle("Life in tiles"), Hide, EnableMouseCapture)?;
    enable_raw_mode()?;
    Ok(())
}

fn shutdown() -> Result<()> {
    let screen = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
    let raw = disable_raw_mode();
    screen?;
    raw?;
    Ok(())
}

/// Waits for a fresh key press. Keys typed during the run are dropped first.
fn wait_key() -> Result<()> {
    let stale = drain(
        || Ok(event::poll(Duration::ZERO)?),
        || Ok(event::read().map(drop)?),
    )?;
    debug!(stale, "dropped queued events");
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

/// Discards events while `pending` says there are some; returns how many.
fn drain(
    mut pending: impl FnMut() -> Result<bool>,
    mut discard: impl FnMut() -> Result<()>,
) -> Result<usize> {
    let mut n = 0;
    while pending()? {
        discard()?;
        n += 1;
    }
    Ok(n)
}

impl Terminal {
    #[inline]
    fn new(size: usize) -> Self {
        Terminal {
            out: io::stdout(),
            // fits() has bounded it by the terminal width
            size: size as u16,
        }
    }

    /// Lets the user toggle cells with the left mouse button until `q` or
    /// Enter (start) or Ctrl-C (abort).
    pub fn seed(&mut self, board: &mut Board) -> Result<Seeding> {
        loop {
            match event::read()? {
                Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                    if m.row < self.size && m.column < self.size {
                        let (i, j) = (m.row as usize, m.column as usize);
                        let cell = board.toggle(i, j);
                        debug!(row = i, col = j, ?cell, "toggled");
                        queue!(self.out, MoveTo(m.column, m.row), Print(glyph(cell)))?;
                        self.out.flush()?;
                    }
                },
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) {
                        if key.code == KeyCode::Char('c') {
                            return Ok(Seeding::Abort);
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Enter => return Ok(Seeding::Start),
                            _ => {},
                        }
                    }
                },
                _ => {},
            }
        }
    }

    fn frame(&mut self, board: &Board, status: &str) -> Result<()> {
        for (i, row) in board.rows().enumerate() {
            let line: String = row.iter().map(|c| glyph(*c)).collect();
            queue!(self.out, MoveTo(0, i as u16), Print(line))?;
        }
        self.status(status)
    }

    fn status(&mut self, text: &str) -> Result<()> {
        use terminal::{ Clear, ClearType };

        queue!(self.out, MoveTo(0, self.size), Clear(ClearType::CurrentLine), Print(text))?;
        self.out.flush()?;
        Ok(())
    }
}

impl Surface for Terminal {
    fn render(&mut self, board: &Board, generation: u64, max: u64) -> Result<()> {
        debug!(generation, population = board.population(), "drawing");
        self.frame(board, &format!("generation {generation}/{max}  population {}", board.population()))
    }
}

#[inline]
fn glyph(c: Cell) -> char {
    if c.is_alive() {
        '#'
    } else {
        ' '
    }
}

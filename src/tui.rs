//! Terminal setup, teardown and event polling.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::debug;

/// Frames per second while idle; also the rate at which responses are drained.
const FRAMERATE: f64 = 30.0;

#[derive(Debug, Clone)]
pub enum Event {
    Input(event::Event),
    Tick,
}

pub type Frame<'a> = ratatui::Frame<'a>;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }

    pub fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        let (width, height) = terminal::size()?;
        debug!(width, height, "terminal initialised");
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.terminal.show_cursor()?;
        terminal::disable_raw_mode()?;
        crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        Ok(())
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Waits one frame for input, otherwise yields a tick.
    pub fn next_event(&self) -> Result<Event> {
        let timeout = Duration::from_secs_f64(1.0 / FRAMERATE);

        if event::poll(timeout)? {
            return Ok(Event::Input(event::read()?));
        }

        Ok(Event::Tick)
    }
}

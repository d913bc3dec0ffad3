//! Terminal surface (impure shell).
//!
//! The bar draws on the controlling terminal rather than standard output,
//! which stays free for `print` and `menuprint` steps.

pub mod events;
pub mod render;

pub use events::{keysym_name, translate, EventPump};
pub use render::render_scene;

use crate::model::DisplayError;
use crate::state::Scene;
use crate::view_state::Area;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    ExecutableCommand,
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::fs::{File, OpenOptions};
use tracing::{debug, warn};

/// Path of the controlling terminal.
pub const TTY_PATH: &str = "/dev/tty";

/// A terminal the bar draws on.
///
/// Generic over backend so tests can draw into a `TestBackend`.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    /// Handle used to restore terminal modes on drop; `None` for test backends.
    restore: Option<File>,
}

impl TerminalSurface<CrosstermBackend<File>> {
    /// Open the controlling terminal in raw mode on the alternate screen with
    /// mouse reporting enabled.
    ///
    /// # Errors
    ///
    /// [`DisplayError::Unavailable`] when there is no controlling terminal;
    /// [`DisplayError::Io`] when switching modes fails.
    pub fn open() -> Result<Self, DisplayError> {
        let tty = OpenOptions::new()
            .read(true)
            .write(true)
            .open(TTY_PATH)
            .map_err(|source| DisplayError::Unavailable { source })?;
        let mut restore = tty.try_clone()?;

        enable_raw_mode()?;
        restore.execute(EnterAlternateScreen)?;
        restore.execute(EnableMouseCapture)?;
        restore.execute(Hide)?;
        debug!("terminal surface opened");

        let terminal = Terminal::new(CrosstermBackend::new(tty))?;
        Ok(Self {
            terminal,
            restore: Some(restore),
        })
    }
}

impl<B: Backend> TerminalSurface<B> {
    /// Wrap an already prepared backend; terminal modes are left alone.
    pub fn with_backend(backend: B) -> Result<Self, DisplayError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            restore: None,
        })
    }

    /// Current screen as an area at the origin.
    pub fn screen(&self) -> Result<Area, DisplayError> {
        let size = self.terminal.size()?;
        Ok(Area::new(0, 0, i32::from(size.width), i32::from(size.height)))
    }

    /// Draw a scene.
    pub fn draw(&mut self, scene: &Scene<'_>) -> Result<(), DisplayError> {
        self.terminal.draw(|frame| render_scene(frame, scene))?;
        Ok(())
    }

    /// Forget what is on screen so the next draw repaints every cell.
    pub fn invalidate(&mut self) -> Result<(), DisplayError> {
        self.terminal.clear()?;
        Ok(())
    }

    /// Set the terminal window title. A no-op without a controlling terminal.
    pub fn set_title(&mut self, title: &str) -> Result<(), DisplayError> {
        if let Some(tty) = self.restore.as_mut() {
            tty.execute(SetTitle(title))?;
        }
        Ok(())
    }

    /// Terminal backend.
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Drop for TerminalSurface<B> {
    fn drop(&mut self) {
        let Some(tty) = self.restore.as_mut() else {
            return;
        };
        let result = disable_raw_mode()
            .and_then(|()| tty.execute(DisableMouseCapture).map(drop))
            .and_then(|()| tty.execute(LeaveAlternateScreen).map(drop))
            .and_then(|()| tty.execute(Show).map(drop));
        if let Err(e) = result {
            warn!("failed to restore terminal: {e}");
        }
    }
}

//! dzbar: a status bar and menu for the terminal.
//!
//! Lines read from standard input are shown in a one-line header and an
//! optional body that scrolls or acts as a menu. Pointer, key and signal
//! events run configurable action sequences.
//!
//! Pure parts (line reassembly, routing, the body store, action tables,
//! geometry, markup) are separate from the impure shell (stdin pump,
//! terminal surface, signal watcher, command runner) and the event loop that
//! joins them.

pub mod config;
pub mod event_loop;
pub mod logging;
pub mod model;
pub mod parser;
pub mod runner;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;

#[cfg(test)]
mod test_harness;

use config::Options;
use event_loop::Channels;
use model::{AppError, DisplayError, InputError};
use runner::ShellRunner;
use source::StdinSource;
use state::{AppState, Notification, Notifications, SignalWatcher};
use tracing::{debug, info, warn};
use view::{EventPump, TerminalSurface};

/// Run the bar on the controlling terminal until it stops.
///
/// Returns the exit code recorded by the last `exit` step (0 by default).
/// The terminal is restored before this returns.
///
/// # Errors
///
/// Fails when the terminal cannot be opened, a pump thread cannot start,
/// reading stdin fails, or drawing fails.
pub fn run(options: &Options) -> Result<i32, AppError> {
    let mut surface = TerminalSurface::open()?;
    surface.set_title(&options.title_name)?;
    let screen = surface.screen()?;
    debug!(font = %options.font, ?screen, "surface ready");
    for (option, value) in options.without_effect() {
        info!(option, %value, "option has no effect on a terminal");
    }

    let mut state = AppState::new(options, screen, ShellRunner::new());

    let notifications = Notifications::new();
    let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
    let wanted = Notification::wanted(state.actions());
    let _watcher = match SignalWatcher::spawn(&wanted, notifications.clone(), wake_tx) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("signal handling unavailable: {e}");
            None
        }
    };

    let (input_tx, input_rx) = crossbeam_channel::unbounded();
    StdinSource::new()
        .spawn(input_tx)
        .map_err(InputError::Io)?;

    let (display_tx, display_rx) = crossbeam_channel::unbounded();
    let _pump = EventPump::spawn(display_tx).map_err(DisplayError::Io)?;

    let channels = Channels {
        input: input_rx,
        display: display_rx,
        wake: wake_rx,
    };
    info!(
        lines = options.max_lines,
        menu = ?options.menu,
        persistent = options.persistent,
        "bar started"
    );
    event_loop::run(&mut state, &mut surface, &channels, &notifications)
}

//! The event loop.
//!
//! One thread owns the [`AppState`] and the surface. Each iteration:
//!
//! 1. handles pending notifications (signals),
//! 2. drains display events that are already queued,
//! 3. blocks until input, a display event, a wake-up or the idle deadline
//!    arrives, and handles it,
//! 4. redraws if anything visible changed.
//!
//! Input is dropped from the wait set once it has ended. With a persistent
//! timeout the idle deadline is armed at that moment and re-armed after every
//! display event or wake-up, so the bar stays up while it is being used.
//! When the loop stops, `onexit` runs and the exit code is returned.

use crate::model::{AppError, DisplayError, DisplayEvent};
use crate::runner::CommandRunner;
use crate::source::InputMessage;
use crate::state::{AppState, EofOutcome, Notifications};
use crate::view::TerminalSurface;
use crossbeam_channel::{after, never, select, Receiver};
use ratatui::backend::Backend;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Receiving ends the loop waits on.
pub struct Channels {
    /// Chunks from the input pump.
    pub input: Receiver<InputMessage>,
    /// Translated terminal events.
    pub display: Receiver<DisplayEvent>,
    /// Wake-ups from the signal watcher.
    pub wake: Receiver<()>,
}

/// Run until the state stops, then run `onexit` and return the exit code.
///
/// # Errors
///
/// Input read failures and display failures are fatal. `onexit` still runs
/// before the error is returned.
pub fn run<B, R>(
    state: &mut AppState<R>,
    surface: &mut TerminalSurface<B>,
    channels: &Channels,
    notifications: &Notifications,
) -> Result<i32, AppError>
where
    B: Backend,
    R: CommandRunner,
{
    state.start();
    let result = drive(state, surface, channels, notifications);
    let code = state.shutdown();
    info!(code, "stopped");
    result.map(|()| code)
}

fn drive<B, R>(
    state: &mut AppState<R>,
    surface: &mut TerminalSurface<B>,
    channels: &Channels,
    notifications: &Notifications,
) -> Result<(), AppError>
where
    B: Backend,
    R: CommandRunner,
{
    let closed_input = never::<InputMessage>();
    let closed_wake = never::<()>();
    let mut input_open = true;
    let mut wake_open = true;
    let mut idle = IdleTimer::default();

    redraw(state, surface)?;

    while state.is_running() {
        for notification in notifications.take() {
            debug!(?notification, "notification");
            state.handle_notification(notification);
        }
        while let Ok(event) = channels.display.try_recv() {
            handle_display(state, surface, event)?;
            idle.rearm();
        }
        redraw(state, surface)?;
        if !state.is_running() {
            break;
        }

        let input = if input_open { &channels.input } else { &closed_input };
        let wake = if wake_open { &channels.wake } else { &closed_wake };
        let deadline = idle.deadline();

        select! {
            recv(input) -> message => match message {
                Ok(InputMessage::Chunk(bytes)) => state.handle_chunk(&bytes),
                Ok(InputMessage::Failed(e)) => return Err(e.into()),
                Ok(InputMessage::Eof) | Err(_) => {
                    input_open = false;
                    if let EofOutcome::Idle(Some(timeout)) = state.handle_eof() {
                        idle.arm(timeout);
                    }
                }
            },
            recv(channels.display) -> event => match event {
                Ok(event) => {
                    handle_display(state, surface, event)?;
                    idle.rearm();
                }
                Err(_) => return Err(display_closed().into()),
            },
            recv(wake) -> signal => {
                if signal.is_err() {
                    wake_open = false;
                } else {
                    idle.rearm();
                }
            },
            recv(deadline) -> _ => {
                info!("idle timeout reached");
                state.stop();
            },
        }

        redraw(state, surface)?;
    }
    Ok(())
}

/// Countdown that stops a persistent bar once input has ended and nothing
/// has happened for `timeout`.
#[derive(Default)]
struct IdleTimer {
    timeout: Option<Duration>,
    deadline: Option<Receiver<Instant>>,
}

impl IdleTimer {
    fn arm(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
        self.deadline = Some(after(timeout));
    }

    /// Restart the countdown; a no-op until armed.
    fn rearm(&mut self) {
        if let Some(timeout) = self.timeout {
            self.deadline = Some(after(timeout));
        }
    }

    fn deadline(&self) -> Receiver<Instant> {
        self.deadline.clone().unwrap_or_else(never)
    }
}

fn handle_display<B, R>(
    state: &mut AppState<R>,
    surface: &mut TerminalSurface<B>,
    event: DisplayEvent,
) -> Result<(), DisplayError>
where
    B: Backend,
    R: CommandRunner,
{
    if matches!(event, DisplayEvent::Expose | DisplayEvent::Resize { .. }) {
        surface.invalidate()?;
    }
    state.handle_display(event);
    Ok(())
}

fn redraw<B, R>(state: &mut AppState<R>, surface: &mut TerminalSurface<B>) -> Result<(), DisplayError>
where
    B: Backend,
    R: CommandRunner,
{
    if state.take_redraw() {
        surface.draw(&state.scene())?;
    }
    Ok(())
}

fn display_closed() -> DisplayError {
    DisplayError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "terminal event source closed",
    ))
}

#[cfg(test)]
#[path = "event_loop_tests.rs"]
mod tests;

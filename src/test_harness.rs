//! Shared helpers for unit tests.
//!
//! Provides a command runner that records instead of spawning, plus
//! constructors for an [`AppState`] on a fixed-size screen.

use crate::config::Options;
use crate::runner::CommandRunner;
use crate::state::AppState;
use crate::view_state::Area;

/// Screen used by state tests: a standard 80x24 terminal.
pub const SCREEN: Area = Area::new(0, 0, 80, 24);

/// Runner that records what it was asked to do.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingRunner {
    /// Commands passed to `spawn`, in order.
    pub spawned: Vec<String>,
    /// Lines passed to `print`, in order.
    pub printed: Vec<String>,
}

impl CommandRunner for RecordingRunner {
    fn spawn(&mut self, command: &str) {
        self.spawned.push(command.to_string());
    }

    fn print(&mut self, text: &str) {
        self.printed.push(text.to_string());
    }
}

/// App state for `opts` on [`SCREEN`].
pub fn app(opts: &Options) -> AppState<RecordingRunner> {
    AppState::new(opts, SCREEN, RecordingRunner::default())
}

/// App state with a body of `max_lines` and the given action string.
pub fn app_with_actions(max_lines: usize, actions: &str) -> AppState<RecordingRunner> {
    app(&Options {
        max_lines,
        actions: Some(actions.to_string()),
        ..Options::default()
    })
}

/// Convert a ratatui buffer to text, one row per line, trailing blanks trimmed.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

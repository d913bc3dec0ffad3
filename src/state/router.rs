//! Header/body routing of incoming lines.
//!
//! Decides, per line, whether it replaces the header text or is appended to
//! the body. Lines bound for the body may instead carry one of two
//! non-drawing commands at their start:
//! - `^tw()` writes the rest of the line to the header
//! - `^cs()` clears the body

/// Prefix redirecting a body line to the header.
pub const TITLE_WRITE: &str = "^tw()";
/// Prefix clearing the body.
pub const CLEAR_SLAVE: &str = "^cs()";

/// Where a line goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Replace the header text.
    Header(String),
    /// Append to the body store.
    Body(String),
    /// Clear the body store.
    ClearBody,
}

/// Routing state: how many lines have been seen and the layout facts the
/// rule depends on.
#[derive(Debug, Clone)]
pub struct LineRouter {
    lines_seen: usize,
    max_lines: usize,
    update_mode: bool,
    horizontal_menu: bool,
}

impl LineRouter {
    /// Create a router.
    ///
    /// `update_mode` (simultaneous header+body updates) is forced off when
    /// there is no body (`max_lines == 0`).
    pub fn new(max_lines: usize, update_mode: bool, horizontal_menu: bool) -> Self {
        Self {
            lines_seen: 0,
            max_lines,
            update_mode: update_mode && max_lines > 0,
            horizontal_menu,
        }
    }

    /// Whether update mode is in effect after normalisation.
    pub fn update_mode(&self) -> bool {
        self.update_mode
    }

    /// Number of lines routed so far.
    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    /// Route one line and advance the line counter.
    pub fn route(&mut self, line: String) -> Route {
        let index = self.lines_seen;
        self.lines_seen += 1;

        if self.goes_to_header(index) {
            return Route::Header(line);
        }
        if let Some(rest) = line.strip_prefix(TITLE_WRITE) {
            return Route::Header(rest.to_string());
        }
        if line.starts_with(CLEAR_SLAVE) {
            return Route::ClearBody;
        }
        Route::Body(line)
    }

    fn goes_to_header(&self, index: usize) -> bool {
        if self.horizontal_menu {
            return false;
        }
        if self.update_mode {
            index == 0 || index % (self.max_lines + 1) == 0
        } else {
            index == 0 || self.max_lines == 0
        }
    }
}

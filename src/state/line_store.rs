//! Bounded line store backing the body region, plus its visible window.
//!
//! The window is either in **Tail** mode (always showing the newest
//! `max_lines` entries) or **Frozen** at an explicit first line after the
//! user scrolled away from the tail. Scrolling back to the tail, or an
//! explicit `scrollhome`, returns to Tail mode.

use std::ops::Range;

#[cfg(test)]
#[path = "line_store_tests.rs"]
mod tests;

/// Minimum number of lines the store holds before it is cleared.
pub const MIN_BUF_SIZE: usize = 1024;

/// Which lines of the store are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Window tracks the most recently appended lines.
    #[default]
    Tail,
    /// Window pinned by scrolling; `first` is the index of the top line.
    Frozen {
        /// Index of the first visible line.
        first: usize,
    },
}

/// What an append did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendOutcome {
    /// The visible window changed or the new line landed inside it.
    pub redraw: bool,
    /// The store was full and has been cleared before appending.
    pub cleared: bool,
}

/// Append-oriented store of body lines.
#[derive(Debug, Clone)]
pub struct LineStore {
    lines: Vec<String>,
    capacity: usize,
    max_lines: usize,
    view: ViewMode,
}

impl LineStore {
    /// Create a store showing `max_lines` lines at a time.
    pub fn new(max_lines: usize) -> Self {
        let capacity = Self::capacity_for(max_lines);
        Self {
            lines: Vec::with_capacity(capacity.min(MIN_BUF_SIZE)),
            capacity,
            max_lines,
            view: ViewMode::Tail,
        }
    }

    /// Capacity for a given window height: [`MIN_BUF_SIZE`] rounded up to a
    /// multiple of `max_lines`.
    pub fn capacity_for(max_lines: usize) -> usize {
        if max_lines == 0 {
            return MIN_BUF_SIZE;
        }
        match MIN_BUF_SIZE % max_lines {
            0 => MIN_BUF_SIZE,
            rem => MIN_BUF_SIZE + (max_lines - rem),
        }
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the store holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of lines held before clearing.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Height of the visible window.
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Line at absolute index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Current window mode.
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Whether the window is tracking the tail.
    pub fn is_tail(&self) -> bool {
        self.view == ViewMode::Tail
    }

    fn tail_first(&self) -> usize {
        self.lines.len().saturating_sub(self.max_lines)
    }

    /// Index of the first visible line.
    pub fn first_visible(&self) -> usize {
        match self.view {
            ViewMode::Tail => self.tail_first(),
            ViewMode::Frozen { first } => first.min(self.tail_first()),
        }
    }

    /// One past the index of the last visible line.
    pub fn last_visible(&self) -> usize {
        (self.first_visible() + self.max_lines).min(self.lines.len())
    }

    /// Visible index range.
    pub fn visible_range(&self) -> Range<usize> {
        self.first_visible()..self.last_visible()
    }

    /// Visible lines, top to bottom.
    pub fn visible_lines(&self) -> &[String] {
        &self.lines[self.visible_range()]
    }

    /// Append a line.
    ///
    /// A full store is cleared first. When `mapped` is false (the body is
    /// hidden) the window is reset to the tail so a stale frozen window is
    /// never shown on re-display.
    pub fn append(&mut self, line: String, mapped: bool) -> AppendOutcome {
        let mut outcome = AppendOutcome::default();
        if self.lines.len() >= self.capacity {
            self.reset();
            outcome.cleared = true;
        }

        let before = self.visible_range();
        let index = self.lines.len();
        self.lines.push(line);

        if !mapped {
            self.view = ViewMode::Tail;
        }

        let after = self.visible_range();
        outcome.redraw = outcome.cleared || before != after || after.contains(&index);
        outcome
    }

    /// Move the window up by `n` lines. Returns whether it moved.
    pub fn scroll_up(&mut self, n: usize) -> bool {
        let current = self.first_visible();
        let target = current.saturating_sub(n);
        self.move_to(current, target)
    }

    /// Move the window down by `n` lines. Returns whether it moved.
    pub fn scroll_down(&mut self, n: usize) -> bool {
        let current = self.first_visible();
        let target = current.saturating_add(n).min(self.tail_first());
        self.move_to(current, target)
    }

    /// Jump to the tail window. Returns whether the visible window changed.
    pub fn scroll_home(&mut self) -> bool {
        let before = self.visible_range();
        self.view = ViewMode::Tail;
        before != self.visible_range()
    }

    /// Drop every line and return to the tail.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.view = ViewMode::Tail;
    }

    fn move_to(&mut self, current: usize, target: usize) -> bool {
        if target == current {
            return false;
        }
        self.view = if target == self.tail_first() {
            ViewMode::Tail
        } else {
            ViewMode::Frozen { first: target }
        };
        true
    }
}

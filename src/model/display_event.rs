//! Events from the display surface, already translated out of the terminal
//! backend's vocabulary.

/// One display event.
///
/// Coordinates are absolute screen cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Contents were lost; redraw everything.
    Expose,
    /// Screen size changed.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// Pointer moved.
    Motion {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// Pointer button released (wheel steps arrive as buttons 4 to 7).
    ButtonRelease {
        /// Button number.
        button: u8,
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// Key pressed, named by its X keysym (`Escape`, `Up`, `a`).
    Key(String),
    /// Interrupt key (Ctrl+C); the terminal is raw so no signal is raised.
    Interrupt,
}

//! Error types for dzbar.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions up to [`AppError`], which `main` reports on stderr before exiting
//! with a failure status.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error wrapping every fatal failure
//!   - [`FlagError`] - Malformed command line (missing argument, bad integer, bad colour)
//!   - [`ConfigError`] - Resource file present but unreadable or invalid
//!   - [`InputError`] - Stdin read failures other than a clean end of stream
//!   - [`DisplayError`] - Terminal surface could not be opened, drawn or restored
//!   - [`LoggingError`] - Log file could not be set up
//!
//! # Recovery Strategy
//!
//! Fatal startup errors and stream I/O errors terminate the process immediately. Unknown
//! action-table tokens and out-of-range geometry are *not* errors: they are normalised to a
//! safe default and reported through `tracing` only. Signal hookup failures are logged as
//! warnings and leave the corresponding trigger inert.

use crate::config::flags::FlagError;
use crate::config::loader::ConfigError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// Every variant is fatal: `main` prints it prefixed with `dzbar:` and exits with status 1.
#[derive(Debug, Error)]
pub enum AppError {
    /// The command line could not be interpreted.
    #[error("{0}")]
    Flags(#[from] FlagError),

    /// The resource file exists but cannot be used.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Reading the input stream failed.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The display surface failed.
    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    /// Logging could not be initialised.
    #[error("{0}")]
    Logging(#[from] LoggingError),
}

/// Errors encountered when reading the input stream.
///
/// A clean end of stream is not an error; it is reported as
/// [`InputMessage::Eof`](crate::source::InputMessage::Eof).
#[derive(Debug, Error)]
pub enum InputError {
    /// The underlying `read` call failed.
    ///
    /// **Recovery**: none. The loop stops and the process exits with a failure status.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the display surface (terminal).
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The controlling terminal could not be opened.
    ///
    /// This is the terminal equivalent of "cannot open display": without it there is
    /// nowhere to draw and no pointer/keyboard events to react to.
    #[error("cannot open display: {source}")]
    Unavailable {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Drawing or terminal mode switching failed.
    #[error("Terminal IO error: {0}")]
    Io(#[from] std::io::Error),
}

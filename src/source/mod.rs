//! Input sources.
//!
//! This module provides the input side of the event loop:
//! - Chunked reading of stdin on a pump thread
//! - Reassembly of complete lines from those chunks

pub mod chomp;
pub mod stdin;

pub use chomp::{chomp, LineChomper, RawLine, MAX_LINE_LEN};
pub use stdin::{InputMessage, StdinSource};

//! Incremental line reassembly from arbitrarily chunked reads.
//!
//! Input arrives in chunks whose boundaries have nothing to do with line
//! boundaries. The chomper scans each chunk for `\n`, carrying any trailing
//! unterminated fragment forward to the next call. Lines that grow beyond
//! [`MAX_LINE_LEN`] bytes are cut off and emitted early so a producer that
//! never writes a newline cannot grow memory without bound.

/// Longest line, in bytes, before it is forcibly terminated.
pub const MAX_LINE_LEN: usize = 8192;

const TERMINATOR: u8 = b'\n';

/// A complete line produced by the chomper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Line bytes with the terminator stripped.
    pub bytes: Vec<u8>,
    /// `true` if the line ended at a `\n`, `false` if it was cut at [`MAX_LINE_LEN`].
    pub terminated: bool,
}

impl RawLine {
    /// Line contents as text: lossy UTF-8 with NUL bytes removed.
    pub fn to_text(&self) -> String {
        let text = String::from_utf8_lossy(&self.bytes);
        if text.contains('\0') {
            text.replace('\0', "")
        } else {
            text.into_owned()
        }
    }
}

/// Scan `chunk` with `remainder` logically prepended.
///
/// Returns the complete lines in order and the new unterminated remainder
/// (empty when the chunk ended exactly on a terminator). This is a pure
/// function of its inputs; [`LineChomper`] threads the remainder between calls.
pub fn chomp(chunk: &[u8], remainder: Vec<u8>) -> (Vec<RawLine>, Vec<u8>) {
    chomp_with_limit(chunk, remainder, MAX_LINE_LEN)
}

pub(crate) fn chomp_with_limit(
    chunk: &[u8],
    remainder: Vec<u8>,
    limit: usize,
) -> (Vec<RawLine>, Vec<u8>) {
    let mut lines = Vec::new();
    let mut current = remainder;

    for &byte in chunk {
        if byte == TERMINATOR {
            lines.push(RawLine {
                bytes: std::mem::take(&mut current),
                terminated: true,
            });
            continue;
        }
        if current.len() >= limit {
            lines.push(RawLine {
                bytes: std::mem::take(&mut current),
                terminated: false,
            });
        }
        current.push(byte);
    }

    (lines, current)
}

/// Stateful wrapper around [`chomp`] holding the pending remainder.
#[derive(Debug, Default)]
pub struct LineChomper {
    remainder: Vec<u8>,
    limit: Option<usize>,
}

impl LineChomper {
    /// Chomper with the standard [`MAX_LINE_LEN`] limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chomper with a custom line length limit (must be non-zero).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            remainder: Vec::new(),
            limit: Some(limit.max(1)),
        }
    }

    /// Feed one chunk; returns every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RawLine> {
        let limit = self.limit.unwrap_or(MAX_LINE_LEN);
        let remainder = std::mem::take(&mut self.remainder);
        let (lines, rest) = chomp_with_limit(chunk, remainder, limit);
        self.remainder = rest;
        lines
    }

    /// Bytes of the unterminated line carried to the next call.
    pub fn remainder(&self) -> &[u8] {
        &self.remainder
    }

    /// Drop the pending fragment.
    pub fn clear(&mut self) {
        self.remainder.clear();
    }

    /// Emit the pending fragment as a final unterminated line, at end of stream.
    pub fn finish(&mut self) -> Option<RawLine> {
        if self.remainder.is_empty() {
            return None;
        }
        Some(RawLine {
            bytes: std::mem::take(&mut self.remainder),
            terminated: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[RawLine]) -> Vec<String> {
        lines.iter().map(RawLine::to_text).collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let (lines, rest) = chomp(b"", Vec::new());
        assert!(lines.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn splits_on_newlines_and_keeps_remainder() {
        let (lines, rest) = chomp(b"line1\nline2\nline3", Vec::new());
        assert_eq!(texts(&lines), vec!["line1", "line2"]);
        assert!(lines.iter().all(|l| l.terminated));
        assert_eq!(rest, b"line3");
    }

    #[test]
    fn remainder_is_prepended() {
        let (lines, rest) = chomp(b"lo\nwor", b"hel".to_vec());
        assert_eq!(texts(&lines), vec!["hello"]);
        assert_eq!(rest, b"wor");
    }

    #[test]
    fn empty_lines_are_preserved() {
        let (lines, rest) = chomp(b"\n\na\n", Vec::new());
        assert_eq!(texts(&lines), vec!["", "", "a"]);
        assert!(rest.is_empty());
    }

    #[test]
    fn long_line_is_forcibly_terminated_and_scanning_continues() {
        let (lines, rest) = chomp_with_limit(b"abcdefg\nxy", Vec::new(), 3);
        assert_eq!(texts(&lines), vec!["abc", "def", "g"]);
        assert_eq!(
            lines.iter().map(|l| l.terminated).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert_eq!(rest, b"xy");
    }

    #[test]
    fn line_of_exactly_limit_length_is_one_line() {
        let (lines, rest) = chomp_with_limit(b"abc\n", Vec::new(), 3);
        assert_eq!(texts(&lines), vec!["abc"]);
        assert!(lines[0].terminated);
        assert!(rest.is_empty());
    }

    #[test]
    fn remainder_never_exceeds_limit() {
        let mut chomper = LineChomper::with_limit(4);
        for _ in 0..10 {
            chomper.feed(b"xyz");
            assert!(chomper.remainder().len() <= 4);
        }
    }

    #[test]
    fn chomper_carries_state_between_feeds() {
        let mut chomper = LineChomper::new();
        assert!(chomper.feed(b"par").is_empty());
        assert!(chomper.feed(b"tial").is_empty());
        let lines = chomper.feed(b" line\nnext");
        assert_eq!(texts(&lines), vec!["partial line"]);
        assert_eq!(chomper.remainder(), b"next");
        chomper.clear();
        assert!(chomper.remainder().is_empty());
    }

    #[test]
    fn finish_flushes_pending_fragment_once() {
        let mut chomper = LineChomper::new();
        chomper.feed(b"a\ntail");
        let last = chomper.finish().expect("fragment pending");
        assert_eq!(last.to_text(), "tail");
        assert!(!last.terminated);
        assert_eq!(chomper.finish(), None);
    }

    #[test]
    fn to_text_strips_nul_and_replaces_invalid_utf8() {
        let line = RawLine {
            bytes: vec![b'a', 0, b'b', 0xff],
            terminated: true,
        };
        assert_eq!(line.to_text(), "ab\u{fffd}");
    }
}

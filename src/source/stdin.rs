//! Stdin pump for the event loop.
//!
//! Provides StdinSource, which performs the blocking `read` calls on a
//! dedicated thread and forwards every chunk, in order, over a channel. The
//! pump never interprets the bytes; line reassembly happens on the loop
//! thread in [`LineChomper`](super::LineChomper).

use super::chomp::MAX_LINE_LEN;
use crate::model::error::InputError;
use crossbeam_channel::Sender;
use std::io::{ErrorKind, Read};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// One result of reading the input stream.
#[derive(Debug)]
pub enum InputMessage {
    /// Bytes returned by a single `read`.
    Chunk(Vec<u8>),
    /// The stream was closed (zero-length read).
    Eof,
    /// The read failed; no further messages follow.
    Failed(InputError),
}

/// Chunked reader over stdin (or any `Read` for testing).
pub struct StdinSource<R: Read> {
    reader: R,
    buf: Box<[u8]>,
    complete: bool,
}

impl StdinSource<std::io::Stdin> {
    /// Create a source reading the process's standard input.
    pub fn new() -> Self {
        Self::from_reader(std::io::stdin())
    }
}

impl Default for StdinSource<std::io::Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> StdinSource<R> {
    /// Create StdinSource from any reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; MAX_LINE_LEN].into_boxed_slice(),
            complete: false,
        }
    }

    /// Perform one blocking read.
    ///
    /// Interrupted reads are retried. After `Eof` or `Failed` the source is
    /// complete and keeps returning `Eof`.
    pub fn read_chunk(&mut self) -> InputMessage {
        if self.complete {
            return InputMessage::Eof;
        }
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.complete = true;
                    return InputMessage::Eof;
                }
                Ok(n) => return InputMessage::Chunk(self.buf[..n].to_vec()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.complete = true;
                    return InputMessage::Failed(InputError::Io(e));
                }
            }
        }
    }

    /// Check if EOF (or a read failure) has been reached.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl<R: Read + Send + 'static> StdinSource<R> {
    /// Move the source onto a pump thread that forwards chunks to `tx`.
    ///
    /// The thread exits after forwarding `Eof`/`Failed`, or as soon as the
    /// receiving side has been dropped.
    pub fn spawn(mut self, tx: Sender<InputMessage>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("dzbar-stdin".to_string())
            .spawn(move || loop {
                let message = self.read_chunk();
                let last = !matches!(message, InputMessage::Chunk(_));
                if tx.send(message).is_err() {
                    debug!("input receiver dropped, stopping stdin pump");
                    break;
                }
                if last {
                    break;
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out data in fixed pieces, like a pipe would.
    struct Pieces(Vec<Vec<u8>>);

    impl Read for Pieces {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let piece = self.0.remove(0);
            buf[..piece.len()].copy_from_slice(&piece);
            Ok(piece.len())
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn read_chunk_returns_pieces_in_order() {
        let mut source =
            StdinSource::from_reader(Pieces(vec![b"ab".to_vec(), b"c\n".to_vec()]));
        assert!(matches!(source.read_chunk(), InputMessage::Chunk(c) if c == b"ab"));
        assert!(matches!(source.read_chunk(), InputMessage::Chunk(c) if c == b"c\n"));
        assert!(matches!(source.read_chunk(), InputMessage::Eof));
        assert!(source.is_complete());
    }

    #[test]
    fn empty_input_is_immediately_complete() {
        let mut source = StdinSource::from_reader(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(source.read_chunk(), InputMessage::Eof));
        assert!(matches!(source.read_chunk(), InputMessage::Eof));
    }

    #[test]
    fn read_error_is_reported_once_then_eof() {
        let mut source = StdinSource::from_reader(Failing);
        assert!(matches!(source.read_chunk(), InputMessage::Failed(_)));
        assert!(source.is_complete());
        assert!(matches!(source.read_chunk(), InputMessage::Eof));
    }

    #[test]
    fn spawned_pump_forwards_everything_then_eof() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let source = StdinSource::from_reader(Cursor::new(b"one\ntwo\n".to_vec()));
        let handle = source.spawn(tx).unwrap();
        handle.join().unwrap();

        let mut bytes = Vec::new();
        let mut saw_eof = false;
        for message in rx.try_iter() {
            match message {
                InputMessage::Chunk(c) => bytes.extend(c),
                InputMessage::Eof => saw_eof = true,
                InputMessage::Failed(e) => panic!("unexpected failure: {e}"),
            }
        }
        assert_eq!(bytes, b"one\ntwo\n");
        assert!(saw_eof);
    }
}

//! Byte-at-a-time delimiter detection.
//!
//! Some transports can only hand out one byte at a time and have no "read until delimiter"
//! primitive. [`DelimiterScanner`] fills that gap: every byte read from the stream is kept,
//! and a match counter tracks how much of the delimiter has been seen so far.
//!
//! The matcher is naive: on a mismatch the counter drops back to zero without re-examining
//! the current byte, so a delimiter that starts inside a partial match (e.g. `\r\r\n\r\n`)
//! is missed.

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::protocol::ParseError;

/// Tracks progress towards a fixed, non-empty delimiter.
#[derive(Debug, Clone)]
pub struct DelimiterScanner {
    delimiter: &'static [u8],
    matched: usize,
}

impl DelimiterScanner {
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    pub const fn new(delimiter: &'static [u8]) -> Self {
        assert!(!delimiter.is_empty(), "delimiter must not be empty");
        Self { delimiter, matched: 0 }
    }

    pub fn delimiter(&self) -> &'static [u8] {
        self.delimiter
    }

    /// Number of delimiter bytes matched so far.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn is_complete(&self) -> bool {
        self.matched == self.delimiter.len()
    }

    /// Feeds one byte, returns true once the whole delimiter has been seen.
    ///
    /// Feeding after a complete match starts a new match.
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.is_complete() {
            self.matched = 0;
        }
        if byte == self.delimiter[self.matched] {
            self.matched += 1;
        } else {
            self.matched = 0;
        }
        self.is_complete()
    }

    pub fn reset(&mut self) {
        self.matched = 0;
    }

    /// Reads from `reader` one byte at a time until the delimiter has been read.
    ///
    /// The returned bytes include the delimiter itself.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::IncompleteData`] if the stream ends before the delimiter is
    /// complete, or [`ParseError::Io`] on any other read failure.
    pub async fn scan<R>(&mut self, reader: &mut R) -> Result<BytesMut, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        self.reset();
        let mut block = BytesMut::new();

        loop {
            let byte = match reader.read_u8().await {
                Ok(byte) => byte,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    debug!(read = block.len(), "delimiter not found in request");
                    return Err(ParseError::incomplete_data(block.len()));
                }
                Err(e) => return Err(ParseError::io(e)),
            };

            block.put_u8(byte);
            if self.feed(byte) {
                trace!(read = block.len(), "delimiter matched");
                return Ok(block);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRLF_CRLF: &[u8] = b"\r\n\r\n";

    #[test]
    fn feed_counts_and_resets() {
        let mut scanner = DelimiterScanner::new(CRLF_CRLF);
        assert!(!scanner.feed(b'\r'));
        assert!(!scanner.feed(b'\n'));
        assert_eq!(scanner.matched(), 2);
        assert!(!scanner.feed(b'x'));
        assert_eq!(scanner.matched(), 0);
        for byte in CRLF_CRLF {
            scanner.feed(*byte);
        }
        assert!(scanner.is_complete());
    }

    #[test]
    fn feed_after_complete_starts_over() {
        let mut scanner = DelimiterScanner::new(b"\n");
        assert!(scanner.feed(b'\n'));

        assert!(!scanner.feed(b'x'));
        assert_eq!(scanner.matched(), 0);
        assert!(scanner.feed(b'\n'));
    }

    #[tokio::test]
    async fn scan_stops_after_delimiter() {
        let mut input: &[u8] = b"Host: h\r\nAccept: */*\r\n\r\nbody";
        let mut scanner = DelimiterScanner::new(CRLF_CRLF);

        let block = scanner.scan(&mut input).await.unwrap();

        assert_eq!(&block[..], b"Host: h\r\nAccept: */*\r\n\r\n");
        assert_eq!(input, b"body");
    }

    #[tokio::test]
    async fn scan_single_byte_delimiter() {
        let mut input: &[u8] = b"GET / HTTP/1.1\r\nHost: h";
        let mut scanner = DelimiterScanner::new(b"\n");

        let line = scanner.scan(&mut input).await.unwrap();

        assert_eq!(&line[..], b"GET / HTTP/1.1\r\n");
    }

    #[tokio::test]
    async fn scan_fails_when_stream_ends() {
        let mut input: &[u8] = b"Host: h\r\n";
        let mut scanner = DelimiterScanner::new(CRLF_CRLF);

        let result = scanner.scan(&mut input).await;

        assert!(matches!(result, Err(ParseError::IncompleteData { read: 9 })));
    }

    #[tokio::test]
    async fn scan_empty_stream() {
        let mut input: &[u8] = b"";
        let mut scanner = DelimiterScanner::new(CRLF_CRLF);

        let result = scanner.scan(&mut input).await;

        assert!(matches!(result, Err(ParseError::IncompleteData { read: 0 })));
    }

    #[tokio::test]
    async fn naive_matcher_misses_overlapping_start() {
        // the second '\r' breaks the partial match and is not re-examined
        let mut input: &[u8] = b"\r\r\n\r\n";
        let mut scanner = DelimiterScanner::new(CRLF_CRLF);

        let result = scanner.scan(&mut input).await;

        assert!(matches!(result, Err(ParseError::IncompleteData { read: 5 })));
    }
}

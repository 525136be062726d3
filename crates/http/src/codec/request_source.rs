//! Stream-reading capabilities consumed by the request parser.
//!
//! The parser only needs two operations from the transport: read one line, and read up to
//! (and including) a delimiter. [`RequestSource`] captures exactly that, with two
//! interchangeable implementations chosen once when a connection is set up:
//!
//! - [`BufferedSource`]: a buffered reader that searches for the delimiter natively,
//!   backed by [`FramedRead`] and [`DelimiterDecoder`]
//! - [`ByteSource`]: reads one byte at a time through the [`DelimiterScanner`], for
//!   transports that cannot buffer or peek

use std::future::Future;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, FramedRead};
use tracing::trace;

use crate::codec::DelimiterScanner;
use crate::protocol::ParseError;

/// Line terminator used by [`RequestSource::read_line`].
pub const LF: &[u8] = b"\n";

/// Marks the end of the header block.
pub const CRLF_CRLF: &[u8] = b"\r\n\r\n";

/// Default capacity of the [`BufferedSource`] read buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// A suspending byte source the request parser reads from.
pub trait RequestSource {
    /// Reads one line, terminator included.
    fn read_line(&mut self) -> impl Future<Output = Result<Bytes, ParseError>> + Send;

    /// Reads up to and including the first occurrence of `delimiter`.
    fn read_until(&mut self, delimiter: &'static [u8]) -> impl Future<Output = Result<Bytes, ParseError>> + Send;
}

/// How a connection reads request bytes from its transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Buffered reads with a native delimiter search.
    #[default]
    Buffered,
    /// One byte per read, delimiter detection by [`DelimiterScanner`].
    ByteByByte,
}

/// A [`Decoder`] that yields everything up to and including a delimiter.
///
/// The delimiter can be swapped between frames; bytes already buffered are kept.
#[derive(Debug, Clone)]
pub struct DelimiterDecoder {
    delimiter: &'static [u8],
    // buffer offset the next search may resume from
    next_index: usize,
}

impl DelimiterDecoder {
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    pub fn new(delimiter: &'static [u8]) -> Self {
        assert!(!delimiter.is_empty(), "delimiter must not be empty");
        Self { delimiter, next_index: 0 }
    }

    pub fn set_delimiter(&mut self, delimiter: &'static [u8]) {
        assert!(!delimiter.is_empty(), "delimiter must not be empty");
        if self.delimiter != delimiter {
            self.delimiter = delimiter;
            self.next_index = 0;
        }
    }
}

impl Decoder for DelimiterDecoder {
    type Item = BytesMut;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let delimiter = self.delimiter;
        if src.len() < delimiter.len() {
            return Ok(None);
        }

        // a match may straddle the previous search boundary
        let start = self.next_index.saturating_sub(delimiter.len() - 1);

        match src[start..].windows(delimiter.len()).position(|window| window == delimiter) {
            Some(position) => {
                let end = start + position + delimiter.len();
                self.next_index = 0;
                trace!(frame_size = end, "delimiter found in buffer");
                Ok(Some(src.split_to(end)))
            }
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }

        let read = buf.len();
        buf.clear();
        self.next_index = 0;
        if read == 0 { Ok(None) } else { Err(ParseError::incomplete_data(read)) }
    }
}

/// Buffered [`RequestSource`] over any [`AsyncRead`].
#[derive(Debug)]
pub struct BufferedSource<R> {
    framed_read: FramedRead<R, DelimiterDecoder>,
}

impl<R> BufferedSource<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self { framed_read: FramedRead::with_capacity(reader, DelimiterDecoder::new(LF), capacity) }
    }

    pub fn into_inner(self) -> R {
        self.framed_read.into_inner()
    }
}

impl<R> RequestSource for BufferedSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_line(&mut self) -> Result<Bytes, ParseError> {
        self.read_until(LF).await
    }

    async fn read_until(&mut self, delimiter: &'static [u8]) -> Result<Bytes, ParseError> {
        self.framed_read.decoder_mut().set_delimiter(delimiter);
        match self.framed_read.next().await {
            Some(Ok(frame)) => Ok(frame.freeze()),
            Some(Err(e)) => Err(e),
            None => Err(ParseError::incomplete_data(0)),
        }
    }
}

/// Unbuffered [`RequestSource`] that never reads past the delimiter.
#[derive(Debug)]
pub struct ByteSource<R> {
    reader: R,
}

impl<R> ByteSource<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> RequestSource for ByteSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_line(&mut self) -> Result<Bytes, ParseError> {
        self.read_until(LF).await
    }

    async fn read_until(&mut self, delimiter: &'static [u8]) -> Result<Bytes, ParseError> {
        let mut scanner = DelimiterScanner::new(delimiter);
        scanner.scan(&mut self.reader).await.map(BytesMut::freeze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    const REQUEST: &str = "GET /index.html HTTP/1.1\r\nHost: 127.0.0.1:8080\r\nAccept: */*\r\n\r\nrest";

    /// Hands out at most `chunk` bytes per read.
    struct ChunkedReader {
        data: Vec<u8>,
        position: usize,
        chunk: usize,
    }

    impl AsyncRead for ChunkedReader {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let end = (self.position + self.chunk).min(self.data.len());
            let amount = (end - self.position).min(buf.remaining());
            let start = self.position;
            buf.put_slice(&self.data[start..start + amount]);
            self.position += amount;
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn decoder_waits_for_full_delimiter() {
        let mut decoder = DelimiterDecoder::new(CRLF_CRLF);
        let mut buf = BytesMut::from("Host: h\r\n\r");

        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\nbody");
        let frame = decoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(&frame[..], b"Host: h\r\n\r\n");
        assert_eq!(&buf[..], b"body");
    }

    #[test]
    fn decoder_eof_with_leftover_is_incomplete() {
        let mut decoder = DelimiterDecoder::new(CRLF_CRLF);
        let mut buf = BytesMut::from("Host: h\r\n");

        let result = decoder.decode_eof(&mut buf);

        assert!(matches!(result, Err(ParseError::IncompleteData { read: 9 })));
    }

    #[tokio::test]
    async fn buffered_source_reads_line_then_block() {
        let mut source = BufferedSource::new(REQUEST.as_bytes());

        let line = source.read_line().await.unwrap();
        assert_eq!(&line[..], b"GET /index.html HTTP/1.1\r\n");

        let block = source.read_until(CRLF_CRLF).await.unwrap();
        assert_eq!(&block[..], b"Host: 127.0.0.1:8080\r\nAccept: */*\r\n\r\n");
    }

    #[tokio::test]
    async fn buffered_source_handles_split_reads() {
        let reader = ChunkedReader { data: REQUEST.as_bytes().to_vec(), position: 0, chunk: 3 };
        let mut source = BufferedSource::with_capacity(reader, 16);

        let line = source.read_line().await.unwrap();
        assert_eq!(&line[..], b"GET /index.html HTTP/1.1\r\n");

        let block = source.read_until(CRLF_CRLF).await.unwrap();
        assert_eq!(&block[..], b"Host: 127.0.0.1:8080\r\nAccept: */*\r\n\r\n");
    }

    #[tokio::test]
    async fn byte_source_reads_line_then_block() {
        let mut input = REQUEST.as_bytes();
        let mut source = ByteSource::new(&mut input);

        let line = source.read_line().await.unwrap();
        assert_eq!(&line[..], b"GET /index.html HTTP/1.1\r\n");

        let block = source.read_until(CRLF_CRLF).await.unwrap();
        assert_eq!(&block[..], b"Host: 127.0.0.1:8080\r\nAccept: */*\r\n\r\n");

        // nothing past the delimiter was consumed
        assert_eq!(input, b"rest");
    }

    #[tokio::test]
    async fn both_sources_fail_the_same_on_truncated_block() {
        let input = "GET / HTTP/1.1\r\nHost: h\r\n";

        let mut buffered = BufferedSource::new(input.as_bytes());
        buffered.read_line().await.unwrap();
        let buffered_result = buffered.read_until(CRLF_CRLF).await;

        let mut bytes = ByteSource::new(input.as_bytes());
        bytes.read_line().await.unwrap();
        let bytes_result = bytes.read_until(CRLF_CRLF).await;

        assert!(matches!(buffered_result, Err(ParseError::IncompleteData { read: 9 })));
        assert!(matches!(bytes_result, Err(ParseError::IncompleteData { read: 9 })));
    }

    #[tokio::test]
    async fn empty_stream_is_incomplete() {
        let mut source = BufferedSource::new(&b""[..]);
        assert!(matches!(source.read_line().await, Err(ParseError::IncompleteData { read: 0 })));

        let mut source = ByteSource::new(&b""[..]);
        assert!(matches!(source.read_line().await, Err(ParseError::IncompleteData { read: 0 })));
    }
}

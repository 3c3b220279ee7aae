//! Streaming relay of the origin response with capture for the cache

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

use super::line_reader::read_line;
use crate::error::{self, Result};

/// Bytes seen while relaying one response, and the copy kept for caching
#[derive(Debug)]
pub struct Capture {
    limit: usize,
    total: usize,
    buf: BytesMut,
    overflowed: bool,
}

impl Capture {
    /// Capture up to, but not including, `limit` bytes
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            total: 0,
            buf: BytesMut::new(),
            overflowed: false,
        }
    }

    /// Account for one relayed line, keeping it while the running total stays under the limit
    pub fn record(&mut self, line: &[u8]) {
        self.total += line.len();
        if self.overflowed {
            return;
        }

        if self.total < self.limit {
            self.buf.extend_from_slice(line);
        } else {
            self.overflowed = true;
            self.buf = BytesMut::new();
        }
    }

    /// Total bytes relayed
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// The full response if it stayed under the limit and was not empty
    #[must_use]
    pub fn into_cacheable(self) -> Option<Bytes> {
        (!self.overflowed && self.total > 0).then(|| self.buf.freeze())
    }
}

/// Relay the origin response line by line, writing each line to the client as
/// soon as it arrives.
///
/// Each upstream read is bounded by `idle` when set. Returns the capture once
/// the origin closes its side.
pub async fn relay_response<R, W>(
    upstream: &mut R,
    client: &mut W,
    max_line_len: usize,
    idle: Option<Duration>,
    limit: usize,
) -> Result<Capture>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut capture = Capture::new(limit);
    let mut line = Vec::with_capacity(max_line_len.min(8192));

    loop {
        let read = read_line(upstream, &mut line, max_line_len);
        let n = match idle {
            Some(idle) => tokio::time::timeout(idle, read)
                .await
                .map_err(error::timeout)?
                .map_err(error::upstream_io)?,
            None => read.await.map_err(error::upstream_io)?,
        };

        if n == 0 {
            break;
        }

        client.write_all(&line).await.map_err(error::client_io)?;
        capture.record(&line);
    }

    client.flush().await.map_err(error::client_io)?;
    Ok(capture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_capture_under_limit() {
        let mut capture = Capture::new(10);
        capture.record(b"abc\n");
        capture.record(b"def\n");
        assert_eq!(capture.total(), 8);
        assert_eq!(capture.into_cacheable().as_deref(), Some(&b"abc\ndef\n"[..]));
    }

    #[test]
    fn test_capture_reaching_limit_is_discarded() {
        let mut capture = Capture::new(8);
        capture.record(b"abc\n");
        capture.record(b"def\n");
        capture.record(b"g\n");
        assert_eq!(capture.total(), 10);
        assert!(capture.into_cacheable().is_none());
    }

    #[test]
    fn test_empty_capture_not_cacheable() {
        assert!(Capture::new(8).into_cacheable().is_none());
    }

    #[tokio::test]
    async fn test_relay_copies_everything() {
        let response = b"HTTP/1.0 200 OK\r\nContent-length: 5\r\n\r\nhello";
        let mut upstream = BufReader::new(&response[..]);
        let mut client = Vec::new();

        let capture = relay_response(&mut upstream, &mut client, 8192, None, 1024)
            .await
            .unwrap();

        assert_eq!(client, response);
        assert_eq!(capture.total(), response.len());
        assert_eq!(capture.into_cacheable().as_deref(), Some(&response[..]));
    }

    #[tokio::test]
    async fn test_relay_oversized_still_delivered() {
        let body = vec![b'z'; 300];
        let mut upstream = BufReader::new(&body[..]);
        let mut client = Vec::new();

        let capture = relay_response(&mut upstream, &mut client, 64, None, 100)
            .await
            .unwrap();

        assert_eq!(client, body);
        assert!(capture.into_cacheable().is_none());
    }
}

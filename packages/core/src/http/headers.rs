//! Upstream request construction
//!
//! The forwarded request is always `GET <path> HTTP/1.0` followed by the
//! client's header lines minus the ones the proxy owns, then the proxy's own
//! `Host`, `User-Agent`, `Connection` and `Proxy-Connection` lines.

use bytes::{BufMut, Bytes, BytesMut};
use http::HeaderName;
use http::header::{CONNECTION, HOST, USER_AGENT};

use super::uri::ResolvedUri;

static PROXY_CONNECTION: HeaderName = HeaderName::from_static("proxy-connection");

/// Whether `line` is the blank line that ends a header block
#[inline]
#[must_use]
pub fn is_end_of_headers(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

/// Whether `line` is a header the proxy replaces with its own value
#[must_use]
pub fn is_replaced_header(line: &[u8]) -> bool {
    let Some(colon) = line.iter().position(|&b| b == b':') else {
        return false;
    };

    match HeaderName::from_bytes(line[..colon].trim_ascii()) {
        Ok(name) => name == HOST || name == USER_AGENT || name == CONNECTION || name == PROXY_CONNECTION,
        Err(_) => false,
    }
}

/// Request sent to the origin server on a cache miss
#[derive(Debug)]
pub struct UpstreamRequest {
    buf: BytesMut,
    // Set while a header line arrived without its newline: whether it was kept
    partial: Option<bool>,
}

impl UpstreamRequest {
    /// Start a request for the resolved origin path
    #[must_use]
    pub fn new(uri: &ResolvedUri) -> Self {
        let mut buf = BytesMut::with_capacity(512);
        buf.put_slice(b"GET ");
        buf.put_slice(uri.request_path().as_bytes());
        buf.put_slice(b" HTTP/1.0\r\n");
        Self { buf, partial: None }
    }

    /// Copy one piece of a client header line unless the proxy replaces it.
    ///
    /// A line longer than the reader's limit arrives in several pieces. Only the
    /// first piece decides whether the line is kept; the rest follow it verbatim.
    /// Returns whether the piece was kept.
    pub fn forward_header(&mut self, piece: &[u8]) -> bool {
        let kept = match self.partial {
            Some(kept) => kept,
            None => !(is_replaced_header(piece) || is_end_of_headers(piece)),
        };

        if kept {
            self.buf.put_slice(piece);
        }
        self.partial = (!piece.ends_with(b"\n")).then_some(kept);
        kept
    }

    /// Whether `piece` is the blank line ending the client's header block,
    /// rather than the tail of a longer line
    #[must_use]
    pub fn ends_headers(&self, piece: &[u8]) -> bool {
        self.partial.is_none() && is_end_of_headers(piece)
    }

    /// Append the proxy-owned headers and the terminating blank line
    #[must_use]
    pub fn finish(mut self, uri: &ResolvedUri, user_agent: &str) -> Bytes {
        // Client closed mid-line
        if self.partial == Some(true) {
            self.buf.put_slice(b"\r\n");
        }
        self.header(HOST.as_str(), &format!("{}:{}", uri.hostname, uri.port));
        self.header(USER_AGENT.as_str(), user_agent);
        self.header(CONNECTION.as_str(), "close");
        self.header(PROXY_CONNECTION.as_str(), "close");
        self.buf.put_slice(b"\r\n");
        self.buf.freeze()
    }

    fn header(&mut self, name: &str, value: &str) {
        // Canonical capitalization: "proxy-connection" -> "Proxy-Connection"
        for (i, part) in name.split('-').enumerate() {
            if i > 0 {
                self.buf.put_u8(b'-');
            }
            let mut chars = part.bytes();
            if let Some(first) = chars.next() {
                self.buf.put_u8(first.to_ascii_uppercase());
                self.buf.extend(chars);
            }
        }
        self.buf.put_slice(b": ");
        self.buf.put_slice(value.as_bytes());
        self.buf.put_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::uri::resolve;

    #[test]
    fn test_replaced_headers_case_insensitive() {
        assert!(is_replaced_header(b"Host: example.test\r\n"));
        assert!(is_replaced_header(b"host:example.test\r\n"));
        assert!(is_replaced_header(b"USER-AGENT: curl\r\n"));
        assert!(is_replaced_header(b"Connection: keep-alive\r\n"));
        assert!(is_replaced_header(b"Proxy-Connection: keep-alive\r\n"));
        assert!(!is_replaced_header(b"Accept: */*\r\n"));
        assert!(!is_replaced_header(b"X-Host-Name: a\r\n"));
        assert!(!is_replaced_header(b"not a header\r\n"));
    }

    #[test]
    fn test_build_request() {
        let uri = resolve("http://example.test:8080/a.html");
        let mut request = UpstreamRequest::new(&uri);
        assert!(!request.forward_header(b"Host: elsewhere\r\n"));
        assert!(request.forward_header(b"Accept: text/html\r\n"));
        assert!(!request.forward_header(b"Connection: keep-alive\r\n"));
        assert!(request.forward_header(b"X-Trace: 1\r\n"));
        let bytes = request.finish(&uri, "TestAgent/1.0");

        assert_eq!(
            &bytes[..],
            &b"GET /a.html HTTP/1.0\r\n\
               Accept: text/html\r\n\
               X-Trace: 1\r\n\
               Host: example.test:8080\r\n\
               User-Agent: TestAgent/1.0\r\n\
               Connection: close\r\n\
               Proxy-Connection: close\r\n\
               \r\n"[..]
        );
    }

    #[test]
    fn test_empty_path_requests_root() {
        let uri = resolve("http://example.test");
        let bytes = UpstreamRequest::new(&uri).finish(&uri, "a");
        assert!(bytes.starts_with(b"GET / HTTP/1.0\r\nHost: example.test:80\r\n"));
    }

    #[test]
    fn test_long_header_pieces_rejoined() {
        let uri = resolve("http://example.test/");
        let value = "a".repeat(9000);
        let line = format!("X-Long: {value}\r\n");
        let (head, tail) = line.as_bytes().split_at(8192);

        let mut request = UpstreamRequest::new(&uri);
        assert!(request.forward_header(head));
        assert!(!request.ends_headers(tail));
        assert!(request.forward_header(tail));
        let bytes = request.finish(&uri, "a");

        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains(&line));
        assert_eq!(text.split("\r\n").filter(|l| !l.is_empty()).count(), 6);
    }

    #[test]
    fn test_replaced_header_dropped_with_all_pieces() {
        let uri = resolve("http://example.test/");
        let mut request = UpstreamRequest::new(&uri);
        assert!(!request.forward_header(b"Host: very-long"));
        // Tail of the dropped Host line, not a header of its own
        assert!(!request.forward_header(b"Connection: close\r\n"));
        assert!(request.ends_headers(b"\r\n"));

        let bytes = request.finish(&uri, "a");
        assert!(!bytes.windows(9).any(|w| w == b"very-long"));
        assert_eq!(bytes.windows(13).filter(|w| *w == b"\r\nConnection:").count(), 1);
    }

    #[test]
    fn test_blank_tail_of_long_line_is_not_end_of_headers() {
        let uri = resolve("http://example.test/");
        let mut request = UpstreamRequest::new(&uri);
        request.forward_header(b"X-Edge: abc");
        assert!(!request.ends_headers(b"\r\n"));
        request.forward_header(b"\r\n");
        assert!(request.ends_headers(b"\r\n"));

        let bytes = request.finish(&uri, "a");
        assert!(bytes.windows(13).any(|w| w == b"X-Edge: abc\r\n"));
    }
}

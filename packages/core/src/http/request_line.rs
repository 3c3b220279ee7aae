//! Client request line

/// Method, target and version of a client request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl RequestLine {
    /// Split a request line into its three whitespace-separated tokens.
    ///
    /// Returns `None` for lines with fewer than three tokens or that are not UTF-8.
    /// Tokens past the third are ignored.
    #[must_use]
    pub fn parse(line: &[u8]) -> Option<Self> {
        let line = std::str::from_utf8(line).ok()?;
        let mut tokens = line.split_ascii_whitespace();

        Some(Self {
            method: tokens.next()?.to_string(),
            target: tokens.next()?.to_string(),
            version: tokens.next()?.to_string(),
        })
    }

    /// `GET`, compared ASCII case-insensitively
    #[inline]
    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case(http::Method::GET.as_str())
    }
}

//! Request-target resolution
//!
//! Best-effort split of a proxy request target into origin host, port and path.
//! Nothing is validated: a bad target yields a bad hostname and the upstream
//! connect fails on its own.

use std::fmt;

/// Port used when the target does not name one
pub const DEFAULT_PORT: u16 = 80;

/// Origin address and path extracted from a request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUri {
    pub hostname: String,
    pub path: String,
    pub port: u16,
}

impl ResolvedUri {
    /// Path to put on the upstream request line; an empty path becomes `/`
    #[must_use]
    pub fn request_path(&self) -> &str {
        if self.path.is_empty() { "/" } else { &self.path }
    }
}

impl fmt::Display for ResolvedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.hostname, self.port, self.path)
    }
}

/// Resolve `target` into `(hostname, path, port)`.
///
/// - The host portion starts after the first `//`, or at the start of `target`.
/// - With a `:` in the host portion, the hostname ends there and the port digits
///   follow, then the path (possibly empty).
/// - Otherwise a `/` ends the hostname and starts the path, port 80.
/// - Otherwise the whole host portion is the hostname, empty path, port 80.
///
/// Port digits that are missing or do not fit a TCP port leave the port at 80;
/// the rest is then only kept as the path if it starts with `/`.
#[must_use]
pub fn resolve(target: &str) -> ResolvedUri {
    let host_part = match target.find("//") {
        Some(at) => &target[at + 2..],
        None => target,
    };

    if let Some(colon) = host_part.find(':') {
        let hostname = &host_part[..colon];
        let rest = &host_part[colon + 1..];
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let tail = first_token(&rest[digits..]);

        let (port, path) = match rest[..digits].parse::<u16>() {
            Ok(port) => (port, tail),
            Err(_) if tail.starts_with('/') => (DEFAULT_PORT, tail),
            Err(_) => (DEFAULT_PORT, ""),
        };

        return ResolvedUri {
            hostname: hostname.to_string(),
            path: path.to_string(),
            port,
        };
    }

    match host_part.find('/') {
        Some(slash) => ResolvedUri {
            hostname: host_part[..slash].to_string(),
            path: host_part[slash..].to_string(),
            port: DEFAULT_PORT,
        },
        None => ResolvedUri {
            hostname: host_part.to_string(),
            path: String::new(),
            port: DEFAULT_PORT,
        },
    }
}

fn first_token(s: &str) -> &str {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    &s[..end]
}

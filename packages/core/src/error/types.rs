use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `proxycache_core::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while serving one proxied connection.
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    /// Request target the failing connection was serving, when known
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Reading from or writing to the client stream failed
    ClientIo,
    /// The origin server could not be reached
    UpstreamConnect,
    /// Reading from or writing to the origin server failed
    UpstreamIo,
    /// Connect or idle timeout elapsed
    Timeout,
    /// Invalid configuration or listener setup
    Config,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                target: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.inner.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the request target associated with this error, if any
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.inner.target.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("proxycache::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref target) = self.inner.target {
            f.field("target", target);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::ClientIo => f.write_str("client connection error")?,
            Kind::UpstreamConnect => f.write_str("error connecting to origin server")?,
            Kind::UpstreamIo => f.write_str("origin server connection error")?,
            Kind::Timeout => f.write_str("origin server timed out")?,
            Kind::Config => f.write_str("invalid proxy configuration")?,
        }

        if let Some(ref target) = self.inner.target {
            write!(f, " for {target}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

use std::error::Error as StdError;
use std::io;

use super::types::{Error, Kind};

impl Error {
    /// Returns true if the error came from the client side of the connection.
    #[must_use]
    pub fn is_client(&self) -> bool {
        matches!(self.inner.kind, Kind::ClientIo)
    }

    /// Returns true if the origin server could not be reached.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self.inner.kind, Kind::UpstreamConnect)
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        if matches!(self.inner.kind, Kind::Timeout) {
            return true;
        }

        let mut source = self.source();
        while let Some(err) = source {
            if err.is::<tokio::time::error::Elapsed>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>()
                && io.kind() == io::ErrorKind::TimedOut
            {
                return true;
            }
            source = err.source();
        }

        false
    }

    /// Returns true if the peer simply went away (reset, broken pipe, early EOF).
    #[must_use]
    pub fn is_disconnect(&self) -> bool {
        let mut source = self.source();
        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<io::Error>() {
                return matches!(
                    io.kind(),
                    io::ErrorKind::BrokenPipe
                        | io::ErrorKind::ConnectionReset
                        | io::ErrorKind::ConnectionAborted
                        | io::ErrorKind::UnexpectedEof
                );
            }
            source = err.source();
        }
        false
    }
}

use super::BoxError;
use super::types::{Error, Kind};

/// Creates an `Error` for a failed read or write on the client stream.
pub fn client_io<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::ClientIo).with(e.into())
}

/// Creates an `Error` for an origin server that could not be reached.
pub fn upstream_connect<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::UpstreamConnect).with(e.into())
}

/// Creates an `Error` for a failed read or write on the origin connection.
pub fn upstream_io<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::UpstreamIo).with(e.into())
}

/// Creates an `Error` for an elapsed connect or idle timeout.
pub fn timeout<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Timeout).with(e.into())
}

/// Creates an `Error` for an invalid configuration or listener setup.
pub fn config<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Config).with(e.into())
}

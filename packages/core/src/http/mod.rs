//! HTTP/1.0 request and response pieces used by the forwarder
//!
//! Only what the proxy needs: splitting the request line, resolving the target
//! into an origin address, rewriting request headers and synthesizing error
//! responses. No general-purpose parsing.

pub mod headers;
pub mod request_line;
pub mod response;
pub mod uri;

pub use headers::UpstreamRequest;
pub use request_line::RequestLine;
pub use uri::{ResolvedUri, resolve};

//! Responses the proxy synthesizes itself

use bytes::Bytes;
use http::StatusCode;

/// Build a small HTML error response naming `cause`.
#[must_use]
pub fn error_response(status: StatusCode, cause: &str, long_msg: &str) -> Bytes {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let body = format!(
        "<html><title>Proxy Error</title><body bgcolor=ffffff>\r\n\
         {code}: {reason}\r\n\
         <p>{long_msg}: {cause}\r\n\
         <hr><em>proxycache</em>\r\n",
        code = status.as_u16(),
    );

    let response = format!(
        "HTTP/1.0 {code} {reason}\r\n\
         Content-type: text/html\r\n\
         Content-length: {len}\r\n\r\n\
         {body}",
        code = status.as_u16(),
        len = body.len(),
    );

    Bytes::from(response)
}

/// `501 Not Implemented` for any method other than GET
#[must_use]
pub fn not_implemented(method: &str) -> Bytes {
    error_response(
        StatusCode::NOT_IMPLEMENTED,
        method,
        "proxycache does not implement this method",
    )
}

/// `502 Bad Gateway` for an origin server that could not be reached
#[must_use]
pub fn bad_gateway(origin: &str) -> Bytes {
    error_response(StatusCode::BAD_GATEWAY, origin, "Could not connect to origin server")
}

//! Origin server connection establishment

use std::time::Duration;

use tokio::net::TcpStream;

use crate::error::{self, Result};
use crate::http::uri::ResolvedUri;

/// Open a TCP connection to the resolved origin, bounded by `timeout` if set.
pub async fn open_upstream(uri: &ResolvedUri, timeout: Option<Duration>) -> Result<TcpStream> {
    let connect = TcpStream::connect((uri.hostname.as_str(), uri.port));

    let stream = match timeout {
        Some(limit) => tokio::time::timeout(limit, connect)
            .await
            .map_err(error::timeout)?
            .map_err(error::upstream_connect)?,
        None => connect.await.map_err(error::upstream_connect)?,
    };

    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(target: "proxycache::connect", "Failed to set TCP_NODELAY: {}", e);
    }

    Ok(stream)
}

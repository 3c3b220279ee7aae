//! Connection handler
//!
//! Accepts client connections and runs the forwarder on each one in its own
//! detached task. Nothing joins the tasks; each owns its socket and drops it
//! when the request is done.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};

use crate::config::{ProxyConfig, Validator};
use crate::error::{self, Result};
use crate::forward::Forwarder;

/// Pause after a failed accept so a full file table does not spin the loop
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Listening proxy bound to a local address
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    forwarder: Arc<Forwarder>,
}

impl Server {
    /// Validate `config` and bind its listen address
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if validation fails or the address cannot be bound.
    pub async fn bind(config: &ProxyConfig, forwarder: Arc<Forwarder>) -> Result<Self> {
        config.validate().map_err(error::config)?;

        let listener = TcpListener::bind(config.listen_addr())
            .await
            .map_err(error::config)?;

        Ok(Self::from_listener(listener, forwarder))
    }

    /// Serve on an already bound listener
    pub fn from_listener(listener: TcpListener, forwarder: Arc<Forwarder>) -> Self {
        Self {
            listener,
            forwarder,
        }
    }

    /// Address the listener is bound to
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the socket address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(error::config)
    }

    pub fn forwarder(&self) -> &Arc<Forwarder> {
        &self.forwarder
    }

    /// Accept connections forever
    ///
    /// # Errors
    ///
    /// Never returns under normal operation; accept failures are logged and retried.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` completes. In-flight connections keep running.
    ///
    /// # Errors
    ///
    /// Accept failures are logged and retried, so this only returns `Ok`.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!(target: "proxycache::server", "Stopped accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::info!(
                            target: "proxycache::server",
                            host = %peer.ip(),
                            port = peer.port(),
                            "Accepted connection"
                        );
                        spawn_connection(Arc::clone(&self.forwarder), stream, peer);
                    }
                    Err(e) => {
                        tracing::warn!(target: "proxycache::server", "Accept failed: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }
    }
}

fn spawn_connection(forwarder: Arc<Forwarder>, stream: TcpStream, peer: SocketAddr) {
    tokio::spawn(async move {
        match forwarder.serve(stream).await {
            Ok(outcome) => {
                tracing::debug!(target: "proxycache::server", %peer, ?outcome, "Connection finished");
            }
            Err(e) if e.is_disconnect() => {
                tracing::debug!(target: "proxycache::server", %peer, "Client went away: {}", e);
            }
            Err(e) => {
                tracing::warn!(target: "proxycache::server", %peer, "Connection failed: {}", e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ObjectCache;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_bind_rejects_invalid_config() {
        let config = ProxyConfig::default().with_max_line_len(0);
        let forwarder = Arc::new(Forwarder::new(config.clone(), Arc::new(ObjectCache::default())));
        let err = Server::bind(&config, forwarder).await.unwrap_err();
        assert_eq!(err.kind(), &crate::error::Kind::Config);
    }

    #[tokio::test]
    async fn test_serves_501_over_tcp_and_stops() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let forwarder = Arc::new(Forwarder::new(
            ProxyConfig::default(),
            Arc::new(ObjectCache::default()),
        ));
        let server = Server::from_listener(listener, Arc::clone(&forwarder));
        let addr = server.local_addr().unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"DELETE /x HTTP/1.0\r\n\r\n").await.unwrap();
        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert!(reply.starts_with(b"HTTP/1.0 501 Not Implemented\r\n"));

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();

        // The connection task records its outcome just after closing the socket.
        for _ in 0..100 {
            if forwarder.stats().snapshot().not_implemented == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(forwarder.stats().snapshot().not_implemented, 1);
    }
}

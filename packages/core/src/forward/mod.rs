//! Per-connection request forwarding
//!
//! `Forwarder::serve` runs one client connection through a linear sequence of
//! steps: read the request line, answer from the cache if possible, otherwise
//! connect to the origin, send the rewritten request, stream the response back
//! while capturing it, and cache it if it stayed small enough. There is no
//! keep-alive; the connection is done after one request.

pub mod connect;
pub mod line_reader;
pub mod relay;

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::cache::{InsertOutcome, ObjectCache};
use crate::config::{ProxyConfig, UnreachablePolicy};
use crate::error::{self, Result};
use crate::http::headers::{UpstreamRequest, is_end_of_headers};
use crate::http::request_line::RequestLine;
use crate::http::{response, uri};
use crate::telemetry::ProxyStats;
use line_reader::read_line;

/// Terminal state of one served connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The client closed or failed before sending a request line
    ClientGone,
    /// The request line had fewer than three tokens
    MalformedRequest,
    /// A method other than GET was answered with 501
    NotImplemented { method: String },
    /// Served verbatim from the cache
    CacheHit { bytes: usize },
    /// The origin server could not be reached
    UpstreamUnreachable,
    /// Relayed from the origin; `cached` if the response was stored
    Relayed { bytes: usize, cached: bool },
}

impl Outcome {
    #[must_use]
    pub fn is_cache_hit(&self) -> bool {
        matches!(self, Outcome::CacheHit { .. })
    }
}

/// Request forwarder shared by every connection task
#[derive(Debug)]
pub struct Forwarder {
    config: ProxyConfig,
    cache: Arc<ObjectCache>,
    stats: ProxyStats,
}

impl Forwarder {
    pub fn new(config: ProxyConfig, cache: Arc<ObjectCache>) -> Self {
        Self {
            config,
            cache,
            stats: ProxyStats::default(),
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ObjectCache> {
        &self.cache
    }

    pub fn stats(&self) -> &ProxyStats {
        &self.stats
    }

    /// Serve exactly one request on `stream`, then shut down its write side.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures after the request was accepted:
    /// writing to the client, talking to the origin, or an elapsed idle timeout.
    /// Client disconnects, malformed requests and unreachable origins are
    /// reported as an [`Outcome`].
    pub async fn serve<S>(&self, stream: S) -> Result<Outcome>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        self.stats.record_connection();
        let result = self.run(stream).await;
        self.stats.record(&result);
        result
    }

    async fn run<S>(&self, stream: S) -> Result<Outcome>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let max_line_len = self.config.max_line_len;
        let (client_read, mut client) = tokio::io::split(stream);
        let mut client_in = BufReader::new(client_read);
        let mut line = Vec::with_capacity(256);

        // Request line
        match read_line(&mut client_in, &mut line, max_line_len).await {
            Ok(0) => return Ok(Outcome::ClientGone),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(target: "proxycache::forward", "Client read failed: {}", e);
                return Ok(Outcome::ClientGone);
            }
        }

        let Some(request) = RequestLine::parse(&line) else {
            tracing::debug!(
                target: "proxycache::forward",
                line = %String::from_utf8_lossy(&line).trim_end(),
                "Dropping malformed request line"
            );
            return Ok(Outcome::MalformedRequest);
        };

        if !request.is_get() {
            drain_headers(&mut client_in, &mut line, max_line_len).await;
            let reply = response::not_implemented(&request.method);
            client.write_all(&reply).await.map_err(error::client_io)?;
            finish(&mut client).await;
            return Ok(Outcome::NotImplemented {
                method: request.method,
            });
        }

        let target = request.target;

        // Cache check
        if let Some(content) = self.cache.lookup(&target) {
            tracing::info!(target: "proxycache::forward", url = %target, bytes = content.len(), "Served from cache");
            drain_headers(&mut client_in, &mut line, max_line_len).await;
            client
                .write_all(&content)
                .await
                .map_err(|e| error::client_io(e).with_target(target.as_str()))?;
            finish(&mut client).await;
            return Ok(Outcome::CacheHit {
                bytes: content.len(),
            });
        }

        // Resolve and connect
        let origin = uri::resolve(&target);
        let upstream = match connect::open_upstream(&origin, self.config.connect_timeout()).await {
            Ok(upstream) => upstream,
            Err(e) => {
                tracing::warn!(
                    target: "proxycache::forward",
                    host = %origin.hostname,
                    port = origin.port,
                    "Origin unreachable: {}",
                    e
                );
                if self.config.unreachable_policy == UnreachablePolicy::BadGateway {
                    drain_headers(&mut client_in, &mut line, max_line_len).await;
                    let authority = format!("{}:{}", origin.hostname, origin.port);
                    let reply = response::bad_gateway(&authority);
                    client.write_all(&reply).await.map_err(error::client_io)?;
                    finish(&mut client).await;
                }
                return Ok(Outcome::UpstreamUnreachable);
            }
        };

        // Upstream request: client headers up to the blank line, minus the proxy-owned ones
        let mut outgoing = UpstreamRequest::new(&origin);
        loop {
            let n = read_line(&mut client_in, &mut line, max_line_len)
                .await
                .map_err(|e| error::client_io(e).with_target(target.as_str()))?;
            if n == 0 || outgoing.ends_headers(&line) {
                break;
            }
            outgoing.forward_header(&line);
        }
        let outgoing = outgoing.finish(&origin, &self.config.user_agent);

        let (upstream_read, mut upstream_write) = upstream.into_split();
        upstream_write
            .write_all(&outgoing)
            .await
            .map_err(|e| error::upstream_io(e).with_target(target.as_str()))?;

        // Relay
        let mut upstream_in = BufReader::new(upstream_read);
        let capture = relay::relay_response(
            &mut upstream_in,
            &mut client,
            max_line_len,
            self.config.idle_timeout(),
            self.cache.config().max_object_size,
        )
        .await
        .map_err(|e| e.with_target(target.as_str()))?;

        let bytes = capture.total();

        // Maybe cache
        let cached = match capture.into_cacheable() {
            Some(content) => !matches!(self.cache.insert(&target, content), InsertOutcome::Rejected),
            None => {
                tracing::debug!(target: "proxycache::forward", url = %target, bytes, "Response not cached");
                false
            }
        };

        finish(&mut client).await;
        tracing::debug!(target: "proxycache::forward", url = %target, bytes, cached, "Relayed from origin");

        Ok(Outcome::Relayed { bytes, cached })
    }
}

/// Consume the rest of the client's header block so closing does not reset the
/// connection under an unread request.
async fn drain_headers<R>(client_in: &mut R, line: &mut Vec<u8>, max_line_len: usize)
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut mid_line = false;
    while let Ok(n) = read_line(client_in, line, max_line_len).await {
        if n == 0 || (!mid_line && is_end_of_headers(line)) {
            break;
        }
        mid_line = !line.ends_with(b"\n");
    }
}

/// Flush and close the client's write side; the peer may already be gone.
async fn finish<W: AsyncWrite + Unpin>(client: &mut W) {
    if let Err(e) = client.shutdown().await {
        tracing::debug!(target: "proxycache::forward", "Client shutdown failed: {}", e);
    }
}

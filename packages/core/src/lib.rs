//! # Proxycache Core
//!
//! Forwarding HTTP/1.0 proxy engine with a bounded, shared in-memory object cache.
//!
//! ## Features
//!
//! - **Fixed slot cache** with a first-reader/last-reader admission protocol
//! - **Usage-count eviction** over a small linear slot array
//! - **Streaming relay** of upstream responses, captured for caching while they flow
//! - **Header rewriting** for the forwarded `GET` request
//! - **Task per connection** accept loop with no keep-alive
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use proxycache_core::prelude::*;
//!
//! # async fn run() -> proxycache_core::Result<()> {
//! let config = ProxyConfig::default().with_port(15213);
//! let cache = Arc::new(ObjectCache::new(config.cache.clone()));
//! let forwarder = Arc::new(Forwarder::new(config.clone(), cache));
//! let server = Server::bind(&config, forwarder).await?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod server;
pub mod telemetry;

pub mod prelude;

pub use crate::error::{Error, Kind, Result};
pub use crate::prelude::*;

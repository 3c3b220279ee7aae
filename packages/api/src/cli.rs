//! Command-line arguments
//!
//! Settings come from an optional JSON file first; flags then override single
//! fields. A bare positional argument is the listen port.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use proxycache_core::UnreachablePolicy;
use proxycache_core::config::{ConfigResult, ProxyConfig};

#[derive(Parser, Debug)]
#[command(
    name = "proxycache",
    version,
    about = "Caching HTTP/1.0 forward proxy"
)]
pub struct Cli {
    /// Port to listen on
    pub port: Option<u16>,

    /// JSON configuration file
    #[arg(long, env = "PROXYCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Number of cache slots
    #[arg(long)]
    pub slots: Option<usize>,

    /// Responses this large or larger are relayed but not cached
    #[arg(long)]
    pub max_object_size: Option<usize>,

    /// Total bytes the cache may hold
    #[arg(long)]
    pub max_cache_size: Option<usize>,

    /// Upstream connect timeout in milliseconds, 0 to disable
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Upstream idle timeout in milliseconds, 0 to disable
    #[arg(long)]
    pub idle_timeout_ms: Option<u64>,

    /// Answer unreachable origins with 502 instead of closing the connection
    #[arg(long)]
    pub bad_gateway: bool,
}

impl Cli {
    /// Merge the configuration file and flag overrides
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Parse` if the configuration file cannot be loaded.
    pub fn into_config(self) -> ConfigResult<ProxyConfig> {
        let mut config = match &self.config {
            Some(path) => ProxyConfig::from_json_file(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        let mut cache = config.cache;
        if let Some(slots) = self.slots {
            cache = cache.with_slot_count(slots);
        }
        if let Some(bytes) = self.max_object_size {
            cache = cache.with_max_object_size(bytes);
        }
        config.cache = match self.max_cache_size {
            Some(bytes) => cache.with_max_cache_size(bytes),
            // Room for every slot at full size unless a budget was given
            None if self.slots.is_some() || self.max_object_size.is_some() => cache.grow_budget(),
            None => cache,
        };
        if let Some(ms) = self.connect_timeout_ms {
            config.connect_timeout_ms = ms;
        }
        if let Some(ms) = self.idle_timeout_ms {
            config.idle_timeout_ms = ms;
        }
        if self.bad_gateway {
            config.unreachable_policy = UnreachablePolicy::BadGateway;
        }

        Ok(config)
    }
}

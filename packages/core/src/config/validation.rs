//! Configuration validation and shared defaults

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid network address: {0}")]
    InvalidAddress(String),

    #[error("Invalid buffer size: {0}")]
    InvalidBufferSize(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant describing the first violated constraint.
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate an optional timeout; `None` means disabled.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if the timeout exceeds 1 hour.
    pub fn validate_timeout(timeout: Option<Duration>, name: &str) -> ConfigResult<()> {
        if let Some(timeout) = timeout
            && timeout.as_secs() > 3600
        {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot exceed 1 hour"
            )));
        }

        Ok(())
    }

    /// Validate buffer size
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidBufferSize` if the size is zero or above 1MB.
    pub fn validate_buffer_size(size: usize, name: &str) -> ConfigResult<()> {
        if size == 0 {
            return Err(ConfigurationError::InvalidBufferSize(format!(
                "{name} cannot be zero"
            )));
        }

        if size > 1024 * 1024 {
            return Err(ConfigurationError::InvalidBufferSize(format!(
                "{name} cannot exceed 1MB"
            )));
        }

        Ok(())
    }

    /// Validate listen address
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidAddress` if the address names a specific
    /// IP but port 0.
    pub fn validate_socket_addr(addr: SocketAddr, name: &str) -> ConfigResult<()> {
        if addr.port() == 0 && !addr.ip().is_unspecified() && !addr.ip().is_loopback() {
            return Err(ConfigurationError::InvalidAddress(format!(
                "{name} has specific IP but port 0"
            )));
        }

        Ok(())
    }
}

/// Common configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const DEFAULT_PORT: u16 = 15213;
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_LINE_LEN: usize = 8192;
    pub const DEFAULT_USER_AGENT: &'static str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_limits() {
        assert!(ConfigValidator::validate_timeout(None, "idle").is_ok());
        assert!(ConfigValidator::validate_timeout(Some(Duration::from_secs(30)), "idle").is_ok());
        assert!(matches!(
            ConfigValidator::validate_timeout(Some(Duration::from_secs(7200)), "idle"),
            Err(ConfigurationError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_buffer_size_limits() {
        assert!(ConfigValidator::validate_buffer_size(0, "line").is_err());
        assert!(ConfigValidator::validate_buffer_size(8192, "line").is_ok());
        assert!(ConfigValidator::validate_buffer_size(4 * 1024 * 1024, "line").is_err());
    }

    #[test]
    fn test_socket_addr_port_zero() {
        let any: SocketAddr = "0.0.0.0:0".parse().unwrap();
        let local: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let specific: SocketAddr = "10.1.2.3:0".parse().unwrap();
        assert!(ConfigValidator::validate_socket_addr(any, "listen").is_ok());
        assert!(ConfigValidator::validate_socket_addr(local, "listen").is_ok());
        assert!(ConfigValidator::validate_socket_addr(specific, "listen").is_err());
    }
}

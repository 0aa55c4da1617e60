//! Configuration management for the booking server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that are missing or fail to parse fall back to the default.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Metrics exporter configuration
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter directive (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether the Prometheus endpoint is served
    pub enabled: bool,
    /// Metrics server host (for Prometheus scraping)
    pub host: String,
    /// Metrics server port
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_level: "info".to_string(),
                shutdown_timeout: 30,
            },
            metrics: MetricsConfig {
                enabled: true,
                host: "0.0.0.0".to_string(),
                port: 9090,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.server.host),
                port: parsed(&lookup, "PORT").unwrap_or(defaults.server.port),
                log_level: lookup("RUST_LOG").unwrap_or(defaults.server.log_level),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT")
                    .unwrap_or(defaults.server.shutdown_timeout),
            },
            metrics: MetricsConfig {
                enabled: parsed(&lookup, "METRICS_ENABLED").unwrap_or(defaults.metrics.enabled),
                host: lookup("METRICS_HOST").unwrap_or(defaults.metrics.host),
                port: parsed(&lookup, "METRICS_PORT").unwrap_or(defaults.metrics.port),
            },
        }
    }

    /// Address the HTTP server binds to.
    #[must_use]
    pub fn server_addr(&self) -> SocketAddr {
        socket_addr(&self.server.host, self.server.port)
    }

    /// Address the metrics endpoint binds to.
    #[must_use]
    pub fn metrics_addr(&self) -> SocketAddr {
        socket_addr(&self.metrics.host, self.metrics.port)
    }

    /// Graceful shutdown timeout.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

/// Unparseable hosts bind to all interfaces.
fn socket_addr(host: &str, port: u16) -> SocketAddr {
    let ip = host
        .parse::<IpAddr>()
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    SocketAddr::new(ip, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.metrics.port, 9090);
        assert!(config.metrics.enabled);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.server_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_values_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("METRICS_ENABLED", "false"),
            ("METRICS_PORT", "9100"),
            ("SHUTDOWN_TIMEOUT", "5"),
        ]));
        assert_eq!(config.server_addr().to_string(), "127.0.0.1:3000");
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics_addr().port(), 9100);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "eighty"),
            ("METRICS_ENABLED", "maybe"),
            ("HOST", "not an ip"),
        ]));
        assert_eq!(config.server.port, 8080);
        assert!(config.metrics.enabled);
        assert_eq!(config.server_addr().ip(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}

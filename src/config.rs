//! Environment-driven server configuration
//!
//! `HOST` and `PORT` select the bind address; everything else about the
//! relay (history cap, typing timeout, defaults for join parameters) is
//! fixed protocol behavior, not configuration.

use std::env;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port
pub const DEFAULT_PORT: u16 = 8080;

/// Server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Read configuration from `HOST` / `PORT` environment variables
    ///
    /// Missing, empty, or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(env::var("HOST").ok(), env::var("PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Self {
        let host = host
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = port
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { host, port }
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(None, None);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_explicit_values() {
        let config =
            ServerConfig::from_vars(Some("0.0.0.0".to_string()), Some("9000".to_string()));
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = ServerConfig::from_vars(None, Some("not-a-port".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_empty_host_falls_back() {
        let config = ServerConfig::from_vars(Some(String::new()), None);
        assert_eq!(config.host, DEFAULT_HOST);
    }
}

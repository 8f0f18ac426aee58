//! Server configuration
//!
//! Plain struct with defaults matching the classic chat-server CLI
//! (port 1500). The delivery timeout bounds every send to a member's
//! outbound channel; a member that stays full past it is dropped the
//! same way as one whose connection already failed.

use std::time::Duration;

/// Default server port
pub const DEFAULT_PORT: u16 = 1500;

/// Runtime knobs for the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listener on
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
    /// Capacity of each member's outbound channel
    pub outbound_capacity: usize,
    /// Upper bound on a single delivery to a slow member
    pub delivery_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            outbound_capacity: 32,
            delivery_timeout: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    /// Config with a non-default port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// The `host:port` string the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 1500);
        assert_eq!(config.bind_addr(), "127.0.0.1:1500");
        assert!(config.outbound_capacity > 0);
    }

    #[test]
    fn test_with_port() {
        let config = ServerConfig::with_port(4242);
        assert_eq!(config.bind_addr(), "127.0.0.1:4242");
    }
}

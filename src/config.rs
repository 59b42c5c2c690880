//! Configuration for filewire
//!
//! Server and client settings with sensible defaults. Binaries translate
//! their command-line flags into these structs; the library never reads
//! process-wide flag state.

use std::path::PathBuf;

use crate::error::{FetchError, Result};
use crate::protocol::DEFAULT_MAX_REQUEST_SIZE;

/// Default address the server binds and the client dials
pub const DEFAULT_ADDR: &str = "127.0.0.1:8175";

/// Default logical host sent in requests
pub const DEFAULT_HOST: &str = "localhost";

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the acceptor and its request handlers
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP listen address (host:port)
    pub listen_addr: String,

    /// Upper bound on a request line, terminator included (bytes)
    pub max_request_size: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_ADDR.to_string(),
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Check the settings a listener cannot serve with
    pub fn validate(&self) -> Result<()> {
        if self.max_request_size == 0 {
            return Err(FetchError::Config(
                "max request size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum request size (in bytes)
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.config.max_request_size = size;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the connector and the batch driver
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address to dial (host:port)
    pub connect_addr: String,

    /// Logical host string placed in every request line
    pub host: String,

    /// Newline-delimited list of filenames to request
    pub filename_list: Option<PathBuf>,

    /// Number of passes over the filename list
    pub iterations: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_addr: DEFAULT_ADDR.to_string(),
            host: DEFAULT_HOST.to_string(),
            filename_list: None,
            iterations: 1,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Check the settings the batch driver cannot run without
    pub fn validate(&self) -> Result<()> {
        if self.filename_list.is_none() {
            return Err(FetchError::Config("--filename is required".to_string()));
        }
        if self.host.contains(' ') {
            return Err(FetchError::Config(format!(
                "host {:?} must not contain spaces",
                self.host
            )));
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server address to dial
    pub fn connect_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.connect_addr = addr.into();
        self
    }

    /// Set the logical host string
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the path of the filename list
    pub fn filename_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.filename_list = Some(path.into());
        self
    }

    /// Set the number of passes over the filename list
    pub fn iterations(mut self, count: usize) -> Self {
        self.config.iterations = count;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:8175");
        assert_eq!(config.max_request_size, 1024);
        assert_eq!(config.read_timeout_ms, 0);
    }

    #[test]
    fn test_server_rejects_zero_request_size() {
        let config = ServerConfig::builder().max_request_size(0).build();
        assert!(matches!(config.validate(), Err(FetchError::Config(_))));
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_client_requires_filename_list() {
        let config = ClientConfig::default();
        assert!(matches!(config.validate(), Err(FetchError::Config(_))));

        let config = ClientConfig::builder().filename_list("list.txt").build();
        assert!(config.validate().is_ok());
        assert_eq!(config.host, "localhost");
        assert_eq!(config.iterations, 1);
    }

    #[test]
    fn test_client_rejects_host_with_space() {
        let config = ClientConfig::builder()
            .filename_list("list.txt")
            .host("bad host")
            .build();
        assert!(config.validate().is_err());
    }
}

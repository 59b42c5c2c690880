//! Error types for filewire
//!
//! Provides a unified error type for client and server operations.

use thiserror::Error;

/// Result type alias using FetchError
pub type Result<T> = std::result::Result<T, FetchError>;

/// Unified error type for filewire operations
#[derive(Debug, Error)]
pub enum FetchError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Request exceeds {limit} bytes without a terminator")]
    RequestTooLarge { limit: usize },

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Could not read {path:?}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Connection Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Connection already carried a request")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// True for I/O failures that just mean the peer went away
    pub fn is_disconnect(&self) -> bool {
        match self {
            FetchError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }

    /// True for read/write timeouts (Unix reports WouldBlock, Windows TimedOut)
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

//! # filewire
//!
//! A minimal request/response file transfer protocol over TCP:
//! - One request line per connection: `<host> <filename> \r\n\r\n`
//! - The server answers with the file's raw bytes, then closes
//! - Thread-per-connection server with no shared mutable state
//! - Single-use client connections and a looping batch driver
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────┐          ┌─────────────────────────────┐
//! │    Connector     │  TCP     │     Acceptor (Server)       │
//! │ (one conn / req) ├─────────►│     accept loop             │
//! └────────▲─────────┘          └──────────────┬──────────────┘
//!          │                                   │ spawn
//!          │                    ┌──────────────▼──────────────┐
//!          │   raw bytes, close │   Request Handler           │
//!          └────────────────────┤ AwaitRequest→Serving→Closed │
//!                               └──────────────┬──────────────┘
//!                                              │
//!                               ┌──────────────▼──────────────┐
//!                               │        File Source          │
//!                               └─────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod fs;
pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FetchError, Result};
pub use config::{ClientConfig, ServerConfig};
pub use client::{ClientConnection, Connector};
pub use network::Server;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of filewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

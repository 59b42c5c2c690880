//! Network Module
//!
//! TCP server and per-connection handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One detached thread per connection
//! - No state shared between handlers beyond the read-only file source

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::{Connection, Disposition};

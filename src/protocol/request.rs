//! Request definitions
//!
//! Represents the single request line a client sends.

use std::path::PathBuf;

use super::codec::encode_request;

/// A parsed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Opaque client-supplied identifier
    pub host: String,

    /// Path of the file to send back, byte-for-byte as it arrived
    pub filename: PathBuf,
}

impl Request {
    pub fn new(host: impl Into<String>, filename: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            filename: filename.into(),
        }
    }

    /// Wire form of this request
    pub fn encode(&self) -> Vec<u8> {
        encode_request(&self.host, &self.filename)
    }
}

//! Connection Handler
//!
//! Serves exactly one request on an accepted connection.
//!
//! ## States
//! ```text
//! AwaitRequest ──► Serving ──► Closed
//!       │                        ▲
//!       └────────────────────────┘  (EOF, read error, malformed input)
//! ```

use std::net::{Shutdown, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::{FetchError, Result};
use crate::fs::FileSource;
use crate::protocol::{read_request, write_response, Request};

/// How a connection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The whole file was written
    Served { filename: PathBuf, bytes: usize },

    /// The transport stopped accepting bytes part way through
    ShortWrite {
        filename: PathBuf,
        written: usize,
        expected: usize,
    },

    /// The peer closed, reset or timed out before a request arrived
    Disconnected,

    /// The request line could not be parsed
    Malformed,

    /// The named file could not be loaded
    FileUnavailable { filename: PathBuf },

    /// Writing the response failed
    WriteFailed { filename: PathBuf },
}

enum State {
    AwaitRequest,
    Serving(Request),
    Closed(Disposition),
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream, owned exclusively by this handler
    stream: TcpStream,

    /// Where file content comes from
    files: Arc<dyn FileSource>,

    /// Cap on the request line
    max_request_size: usize,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, files: Arc<dyn FileSource>, config: &ServerConfig) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let mut connection = Self {
            stream,
            files,
            max_request_size: config.max_request_size,
            peer_addr,
        };
        connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;

        Ok(connection)
    }

    /// Configure connection timeouts (0 leaves the stream blocking forever)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.stream
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Every path out of `Serving` closes the connection, so the loop runs
    /// through one request at most.
    pub fn handle(mut self) -> Disposition {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let mut state = State::AwaitRequest;
        loop {
            state = match state {
                State::AwaitRequest => self.await_request(),
                State::Serving(request) => State::Closed(self.serve(request)),
                State::Closed(disposition) => {
                    self.close();
                    return disposition;
                }
            };
        }
    }

    fn await_request(&mut self) -> State {
        match read_request(&mut self.stream, self.max_request_size) {
            Ok(Some(request)) => {
                tracing::trace!("Received request from {}: {:?}", self.peer_addr, request);
                State::Serving(request)
            }
            Ok(None) => {
                tracing::debug!("Client {} disconnected", self.peer_addr);
                State::Closed(Disposition::Disconnected)
            }
            Err(e @ (FetchError::Protocol(_) | FetchError::RequestTooLarge { .. })) => {
                tracing::error!("Malformed request from {}: {}", self.peer_addr, e);
                State::Closed(Disposition::Malformed)
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!("Read timeout for client {}", self.peer_addr);
                State::Closed(Disposition::Disconnected)
            }
            Err(e) if e.is_disconnect() => {
                tracing::debug!("Client {} went away: {}", self.peer_addr, e);
                State::Closed(Disposition::Disconnected)
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                State::Closed(Disposition::Disconnected)
            }
        }
    }

    fn serve(&mut self, request: Request) -> Disposition {
        let filename = request.filename;

        let body = match self.files.load(&filename) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Request from {} failed: {}", self.peer_addr, e);
                return Disposition::FileUnavailable { filename };
            }
        };

        match write_response(&mut self.stream, &body) {
            Ok(report) if report.is_complete() => {
                tracing::info!(
                    "Wrote {} bytes of {} to {}",
                    report.written, filename.display(), self.peer_addr
                );
                Disposition::Served {
                    filename,
                    bytes: report.written,
                }
            }
            Ok(report) => {
                tracing::warn!(
                    "Did not write all bytes of {} to {}; wrote {} expected {}",
                    filename.display(), self.peer_addr, report.written, report.expected
                );
                Disposition::ShortWrite {
                    filename,
                    written: report.written,
                    expected: report.expected,
                }
            }
            Err(e) => {
                tracing::error!("Could not write {} to {}: {}", filename.display(), self.peer_addr, e);
                Disposition::WriteFailed { filename }
            }
        }
    }

    fn close(&mut self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            // NotConnected just means the peer beat us to it
            if e.kind() != std::io::ErrorKind::NotConnected {
                tracing::debug!("Error closing connection to {}: {}", self.peer_addr, e);
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

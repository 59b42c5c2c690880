//! Client
//!
//! Opens one connection per request, sends the request line and reads the
//! response until the server closes the stream.

use std::fs;
use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{FetchError, Result};
use crate::protocol::{read_response, Request};

/// Dials the server on behalf of one logical host
#[derive(Debug, Clone)]
pub struct Connector {
    addr: String,
    host: String,
}

impl Connector {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            addr: config.connect_addr.clone(),
            host: config.host.clone(),
        }
    }

    /// Open a fresh connection
    pub fn open(&self) -> Result<ClientConnection> {
        let stream = TcpStream::connect(&self.addr)?;
        tracing::trace!("Connected to {}", self.addr);

        Ok(ClientConnection {
            stream,
            host: self.host.clone(),
            spent: false,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

/// A single-use connection to the server
pub struct ClientConnection {
    stream: TcpStream,
    host: String,
    spent: bool,
}

impl ClientConnection {
    /// Request one file and collect the response
    ///
    /// A connection carries a single request; calling this again returns
    /// `FetchError::ConnectionClosed` without touching the socket.
    pub fn request_file(&mut self, filename: impl AsRef<Path>) -> Result<Vec<u8>> {
        if self.spent {
            return Err(FetchError::ConnectionClosed);
        }
        self.spent = true;

        let line = Request::new(self.host.as_str(), filename.as_ref()).encode();
        tracing::trace!("Sending {:?}", String::from_utf8_lossy(&line));
        self.stream.write_all(&line)?;

        read_response(&mut self.stream)
    }

    /// Close the connection
    pub fn close(self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Batch Driver
// =============================================================================

/// Totals for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Connections opened (one per request)
    pub requests: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_received: usize,
}

/// Read a newline-delimited filename list
///
/// Lines are trimmed; blank lines are skipped.
pub fn load_filename_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| FetchError::FileRead {
        path: path.display().to_string(),
        source,
    })?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Request every filename `config.iterations` times
///
/// Each request gets its own connection. Failing to connect ends the batch
/// with an error; a failed request is logged and the batch moves on.
/// `on_fetch` sees every result as `(iteration, filename, result)`.
pub fn run_batch<F>(config: &ClientConfig, filenames: &[String], mut on_fetch: F) -> Result<BatchSummary>
where
    F: FnMut(usize, &str, &Result<Vec<u8>>),
{
    let connector = Connector::new(config);
    let mut summary = BatchSummary::default();

    for iteration in 0..config.iterations {
        for filename in filenames {
            let mut connection = connector.open().map_err(|e| {
                tracing::error!("Failed to connect to {}: {}", connector.addr(), e);
                e
            })?;
            summary.requests += 1;

            let result = connection.request_file(filename);
            match &result {
                Ok(body) => {
                    tracing::info!("Got {} bytes for {}", body.len(), filename);
                    summary.succeeded += 1;
                    summary.bytes_received += body.len();
                }
                Err(e) => {
                    tracing::error!("Requesting {} (iteration={}): {}", filename, iteration, e);
                    summary.failed += 1;
                }
            }
            on_fetch(iteration, filename, &result);

            if let Err(e) = connection.close() {
                tracing::debug!("Error closing connection for {}: {}", filename, e);
            }
        }
    }

    Ok(summary)
}

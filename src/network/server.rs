//! TCP Server
//!
//! Accepts connections and hands each one to its own handler thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::ServerConfig;
use crate::error::{FetchError, Result};
use crate::fs::FileSource;
use super::Connection;

/// TCP server for filewire
pub struct Server {
    config: ServerConfig,
    files: Arc<dyn FileSource>,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the configured listen address
    ///
    /// Invalid settings or failing to bind are returned to the caller;
    /// nothing is retried.
    pub fn bind(config: ServerConfig, files: Arc<dyn FileSource>) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            FetchError::Config(format!("failed to listen on {}: {}", config.listen_addr, e))
        })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            config,
            files,
            listener,
            local_addr,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops the accept loop from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr,
        }
    }

    /// Start the accept loop (blocking)
    ///
    /// Runs until a `ShutdownHandle` fires. Handler threads are detached and
    /// are not waited for.
    pub fn run(self) -> Result<()> {
        tracing::info!("Waiting for connections at {}", self.local_addr);

        let mut next_id: u64 = 0;
        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            match stream {
                Ok(stream) => {
                    next_id += 1;
                    self.dispatch(stream, next_id);
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }

        tracing::info!("Listener at {} stopped", self.local_addr);
        Ok(())
    }

    fn dispatch(&self, stream: TcpStream, id: u64) {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        tracing::debug!("New connection #{} from {}", id, peer);

        let connection = match Connection::new(stream, Arc::clone(&self.files), &self.config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Failed to set up connection from {}: {}", peer, e);
                return;
            }
        };

        let spawned = thread::Builder::new()
            .name(format!("filewire-conn-{}", id))
            .spawn(move || {
                let disposition = connection.handle();
                tracing::trace!("Connection #{} finished: {:?}", id, disposition);
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn handler for {}: {}", peer, e);
        }
    }
}

/// Stops a running `Server`
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to stop accepting
    ///
    /// Connects to the listener once so a blocked `accept` wakes up and
    /// sees the flag.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
        if let Err(e) = TcpStream::connect(self.addr) {
            tracing::debug!("Wake-up connect to {} failed: {}", self.addr, e);
        }
    }
}

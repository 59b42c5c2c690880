//! Shared helpers for the network-facing tests

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use filewire::fs::DiskSource;
use filewire::network::{Server, ShutdownHandle};
use filewire::{Result, ServerConfig};

/// A server running on its own thread, bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<Result<()>>>,
}

impl TestServer {
    pub fn start() -> Self {
        Self::start_with(ServerConfig::builder())
    }

    pub fn start_with(builder: filewire::config::ServerConfigBuilder) -> Self {
        let config = builder.listen_addr("127.0.0.1:0").build();
        let server = Server::bind(config, Arc::new(DiskSource)).unwrap();
        let addr = server.local_addr();
        let shutdown = server.shutdown_handle();
        let thread = thread::spawn(move || server.run());

        Self {
            addr,
            shutdown,
            thread: Some(thread),
        }
    }

    /// Stop the accept loop and return what `run` returned
    pub fn stop(mut self) -> Result<()> {
        self.shutdown.shutdown();
        match self.thread.take() {
            Some(thread) => thread.join().unwrap(),
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.shutdown.shutdown();
            let _ = thread.join();
        }
    }
}

/// Write a file under `dir` and return its path as a string
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> String {
    let path: PathBuf = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

//! Tests for the per-connection request handler
//!
//! These tests verify:
//! - Each disposition a connection can end in
//! - Nothing is sent on failure paths
//! - File content comes only from the configured source

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filewire::fs::{DiskSource, FileSource};
use filewire::network::{Connection, Disposition};
use filewire::{FetchError, Result, ServerConfig};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Serves content from a fixed in-memory table
struct MemorySource(HashMap<PathBuf, Vec<u8>>);

impl FileSource for MemorySource {
    fn load(&self, filename: &Path) -> Result<Vec<u8>> {
        self.0.get(filename).cloned().ok_or_else(|| FetchError::FileRead {
            path: filename.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

fn memory_source() -> Arc<dyn FileSource> {
    let mut files = HashMap::new();
    files.insert(PathBuf::from("greeting"), b"hello".to_vec());
    files.insert(PathBuf::from("empty"), Vec::new());
    Arc::new(MemorySource(files))
}

/// Send `request` from a fresh client, run the handler on the server side,
/// and return the disposition with whatever the client received.
fn exchange(files: Arc<dyn FileSource>, request: &[u8]) -> (Disposition, Vec<u8>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let mut client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    client.write_all(request).unwrap();

    let (stream, _) = listener.accept().unwrap();
    let connection = Connection::new(stream, files, &ServerConfig::default()).unwrap();
    let disposition = connection.handle();

    let mut body = Vec::new();
    client.read_to_end(&mut body).unwrap();
    (disposition, body)
}

// =============================================================================
// Disposition Tests
// =============================================================================

#[test]
fn test_served_from_memory() {
    let (disposition, body) = exchange(memory_source(), b"localhost greeting \r\n\r\n");

    assert_eq!(
        disposition,
        Disposition::Served {
            filename: PathBuf::from("greeting"),
            bytes: 5
        }
    );
    assert_eq!(body, b"hello");
}

#[test]
fn test_served_empty_file() {
    let (disposition, body) = exchange(memory_source(), b"localhost empty \r\n\r\n");

    assert!(matches!(disposition, Disposition::Served { bytes: 0, .. }));
    assert!(body.is_empty());
}

#[test]
fn test_served_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("disk.txt");
    std::fs::write(&path, b"on disk").unwrap();
    let request = format!("localhost {} \r\n\r\n", path.display());

    let (disposition, body) = exchange(Arc::new(DiskSource), request.as_bytes());

    assert!(matches!(disposition, Disposition::Served { bytes: 7, .. }));
    assert_eq!(body, b"on disk");
}

#[cfg(unix)]
#[test]
fn test_served_from_disk_with_non_utf8_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
    std::fs::write(&path, b"hello").unwrap();

    let mut request = b"localhost ".to_vec();
    request.extend_from_slice(path.as_os_str().as_bytes());
    request.extend_from_slice(b" \r\n\r\n");

    let (disposition, body) = exchange(Arc::new(DiskSource), &request);

    assert_eq!(disposition, Disposition::Served { filename: path, bytes: 5 });
    assert_eq!(body, b"hello");
}

#[test]
fn test_host_field_is_not_interpreted() {
    let (disposition, body) = exchange(memory_source(), b"some.other.host greeting \r\n\r\n");

    assert!(matches!(disposition, Disposition::Served { .. }));
    assert_eq!(body, b"hello");
}

#[test]
fn test_unknown_file() {
    let (disposition, body) = exchange(memory_source(), b"localhost nothing-here \r\n\r\n");

    assert_eq!(
        disposition,
        Disposition::FileUnavailable {
            filename: PathBuf::from("nothing-here")
        }
    );
    assert!(body.is_empty());
}

#[test]
fn test_malformed_single_field() {
    let (disposition, body) = exchange(memory_source(), b"localhost\r\n\r\n");

    assert_eq!(disposition, Disposition::Malformed);
    assert!(body.is_empty());
}

#[test]
fn test_client_gone_before_response_written() {
    // Large enough that the write outlives the socket buffers
    let mut files = HashMap::new();
    files.insert(PathBuf::from("big"), vec![7u8; 32 * 1024 * 1024]);
    let files: Arc<dyn FileSource> = Arc::new(MemorySource(files));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let mut client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    client.write_all(b"localhost big \r\n\r\n").unwrap();
    drop(client);

    let (stream, _) = listener.accept().unwrap();
    let connection = Connection::new(stream, files, &ServerConfig::default()).unwrap();

    assert_eq!(
        connection.handle(),
        Disposition::WriteFailed {
            filename: PathBuf::from("big")
        }
    );
}

#[test]
fn test_client_closes_without_sending() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    drop(client);

    let (stream, _) = listener.accept().unwrap();
    let connection = Connection::new(stream, memory_source(), &ServerConfig::default()).unwrap();

    assert_eq!(connection.handle(), Disposition::Disconnected);
}

#[test]
fn test_read_timeout_ends_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let _client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();

    let (stream, _) = listener.accept().unwrap();
    let config = ServerConfig::builder().read_timeout_ms(50).build();
    let connection = Connection::new(stream, memory_source(), &config).unwrap();

    assert_eq!(connection.handle(), Disposition::Disconnected);
}

#[test]
fn test_peer_addr_recorded() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();

    let (stream, _) = listener.accept().unwrap();
    let connection = Connection::new(stream, memory_source(), &ServerConfig::default()).unwrap();

    assert_eq!(connection.peer_addr(), client.local_addr().unwrap().to_string());
}

//! Protocol codec
//!
//! Encoding, framing and parsing of the request line.
//!
//! ## Framing
//! The server reads into a growable buffer capped at `max_request_size`
//! and stops at the first `\r\n\r\n`, at end-of-stream, or at the cap.
//! Only bytes actually received are parsed, so a request split across
//! several transport reads is reassembled and nothing stale leaks in.

use std::borrow::Cow;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};

use crate::error::{FetchError, Result};
use super::Request;

/// Sequence that ends a request line
pub const TERMINATOR: &[u8] = b"\r\n\r\n";

/// Byte separating request fields
pub const FIELD_SEPARATOR: u8 = b' ';

/// Default cap on a request line (bytes, terminator included)
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024;

/// Size of a single transport read
const READ_CHUNK_SIZE: usize = 512;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a request line
///
/// Format: `<host> <filename> \r\n\r\n`
pub fn encode_request(host: &str, filename: &Path) -> Vec<u8> {
    let filename = path_to_bytes(filename);
    let mut line = Vec::with_capacity(host.len() + filename.len() + 2 + TERMINATOR.len());
    line.extend_from_slice(host.as_bytes());
    line.push(FIELD_SEPARATOR);
    line.extend_from_slice(&filename);
    line.push(FIELD_SEPARATOR);
    line.extend_from_slice(TERMINATOR);
    line
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a request line (terminator already stripped)
///
/// Splits on the space character and takes the first two fields. Anything
/// after the filename is ignored. The filename keeps its raw bytes, so
/// names that are not UTF-8 still reach the file system intact.
pub fn parse_request(line: &[u8]) -> Result<Request> {
    let mut fields = line.split(|b| *b == FIELD_SEPARATOR);

    match (fields.next(), fields.next()) {
        (Some(host), Some(filename)) => Ok(Request::new(
            String::from_utf8_lossy(host),
            path_from_bytes(filename),
        )),
        _ => Err(FetchError::Protocol(format!(
            "Invalid input {:?}: expected host and filename",
            String::from_utf8_lossy(line)
        ))),
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(unix)]
fn path_to_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_to_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one request line from a stream
///
/// Returns the bytes before the terminator, or everything received if the
/// peer closed the stream first. `None` means the peer closed without
/// sending anything.
pub fn read_request_line<R: Read>(reader: &mut R, max_size: usize) -> Result<Option<Bytes>> {
    let mut buf = BytesMut::with_capacity(max_size.min(READ_CHUNK_SIZE));
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let room = max_size - buf.len();
        if room == 0 {
            return Err(FetchError::RequestTooLarge { limit: max_size });
        }

        let n = match reader.read(&mut chunk[..room.min(READ_CHUNK_SIZE)]) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Ok(Some(buf.freeze()));
        }

        // The terminator may straddle the previous read
        let scan_from = buf.len().saturating_sub(TERMINATOR.len() - 1);
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = find_terminator(&buf[scan_from..]) {
            buf.truncate(scan_from + pos);
            return Ok(Some(buf.freeze()));
        }
    }
}

/// Read and parse one request from a stream
pub fn read_request<R: Read>(reader: &mut R, max_size: usize) -> Result<Option<Request>> {
    match read_request_line(reader, max_size)? {
        Some(line) => parse_request(&line).map(Some),
        None => Ok(None),
    }
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR)
}

//! Response helpers
//!
//! The response is unframed: the body is written as-is and the reader
//! collects everything up to end-of-stream.

use std::io::{ErrorKind, Read, Write};

use crate::error::Result;

/// Outcome of writing a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    /// Bytes the transport accepted
    pub written: usize,

    /// Bytes in the body
    pub expected: usize,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.written == self.expected
    }
}

/// Write a response body to a stream
///
/// Stops early, without error, if the transport accepts zero bytes; the
/// report then carries the short count. No write is retried after that.
pub fn write_response<W: Write>(writer: &mut W, body: &[u8]) -> Result<WriteReport> {
    let mut written = 0;

    while written < body.len() {
        match writer.write(&body[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    writer.flush()?;

    Ok(WriteReport {
        written,
        expected: body.len(),
    })
}

/// Read a complete response from a stream (until the peer closes it)
pub fn read_response<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    Ok(body)
}

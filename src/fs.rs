//! File source
//!
//! The only thing the server asks of the file system: the full content of
//! a file, given its path.

use std::path::Path;

use crate::error::{FetchError, Result};

/// Returns the full byte content of a named file
pub trait FileSource: Send + Sync {
    fn load(&self, filename: &Path) -> Result<Vec<u8>>;
}

/// Reads files straight from the local file system
///
/// Paths are used exactly as the client sent them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSource;

impl FileSource for DiskSource {
    fn load(&self, filename: &Path) -> Result<Vec<u8>> {
        std::fs::read(filename).map_err(|source| FetchError::FileRead {
            path: filename.display().to_string(),
            source,
        })
    }
}

//! File provider trait and the error taxonomy for reads.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug)]
pub enum FileError {
    PermissionDenied(PathBuf),
    /// Not valid UTF-8 text.
    Decode(PathBuf),
    /// Vanished between listing and open.
    NotFound(PathBuf),
    Io { path: PathBuf, source: io::Error },
}

impl FileError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied(path),
            io::ErrorKind::NotFound => FileError::NotFound(path),
            io::ErrorKind::InvalidData => FileError::Decode(path),
            _ => FileError::Io { path, source: err },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileError::PermissionDenied(p) | FileError::Decode(p) | FileError::NotFound(p) => p,
            FileError::Io { path, .. } => path,
        }
    }
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::PermissionDenied(p) => write!(f, "Permission denied: {}", p.display()),
            FileError::Decode(p) => write!(f, "Not a UTF-8 text file: {}", p.display()),
            FileError::NotFound(p) => write!(f, "Not found: {}", p.display()),
            FileError::Io { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Decodes raw file bytes as UTF-8 text.
pub fn decode_text(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| FileError::Decode(path.to_path_buf()))
}

pub trait FileProvider: Send + Sync {
    fn read_file_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = self.read_file_bytes(path)?;
        decode_text(path, bytes)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/file.rs"]
mod tests;

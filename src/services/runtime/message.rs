//! Messages sent back to the UI thread by background tasks.

use crate::services::file::FileError;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppMessage {
    FileLoaded { path: PathBuf, bytes: Vec<u8> },
    FileError { path: PathBuf, error: FileError },
}

impl AppMessage {
    pub fn path(&self) -> &PathBuf {
        match self {
            AppMessage::FileLoaded { path, .. } | AppMessage::FileError { path, .. } => path,
        }
    }
}

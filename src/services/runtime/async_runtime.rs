use super::message::AppMessage;
use crate::services::file::FileError;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Runs file reads off the UI thread. Results come back as [`AppMessage`]s
/// over a std channel that the event loop drains between frames.
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self { runtime, tx })
    }

    pub fn load_file(&self, path: PathBuf) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let message = match tokio::fs::read(&path).await {
                Ok(bytes) => AppMessage::FileLoaded { path, bytes },
                Err(e) => {
                    let error = FileError::from_io(&path, e);
                    AppMessage::FileError { path, error }
                }
            };
            let _ = tx.send(message);
        });
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/runtime.rs"]
mod tests;

//! Status readout: active file name, cursor position and file type.
//!
//! The cursor inside the editing surface is not observable as an event, so the
//! publisher polls the store on a fixed period and pushes a snapshot through a
//! `watch` channel. Receivers only read.

use super::document_store::{ActiveDocument, DocumentStore, WELCOME_TITLE};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::watch;

pub const PLAIN_TEXT: &str = "Plain Text";
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(100);
const MIN_INTERVAL: Duration = Duration::from_millis(10);
const MAX_INTERVAL: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub file_name: String,
    /// 1-based.
    pub line: usize,
    /// 1-based.
    pub column: usize,
    pub file_type: String,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            file_name: WELCOME_TITLE.to_string(),
            line: 1,
            column: 1,
            file_type: PLAIN_TEXT.to_string(),
        }
    }
}

impl StatusSnapshot {
    pub fn capture(store: &DocumentStore) -> Self {
        let (row, col) = store.surface().cursor();
        let (file_name, file_type) = match store.active() {
            ActiveDocument::Welcome => (WELCOME_TITLE.to_string(), PLAIN_TEXT.to_string()),
            ActiveDocument::Document(_) => match store.active_document() {
                Some(doc) => (
                    doc.display_name().to_string(),
                    doc.source_path()
                        .map(file_type_label)
                        .unwrap_or_else(|| PLAIN_TEXT.to_string()),
                ),
                None => (WELCOME_TITLE.to_string(), PLAIN_TEXT.to_string()),
            },
        };

        Self {
            file_name,
            line: row + 1,
            column: col + 1,
            file_type,
        }
    }

    pub fn position_label(&self) -> String {
        format!("Ln {}, Col {}", self.line, self.column)
    }
}

/// `.ext` for paths with an extension, `Plain Text` otherwise.
pub fn file_type_label(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => PLAIN_TEXT.to_string(),
    }
}

pub struct StatusPublisher {
    interval: Duration,
    last_tick: Option<Instant>,
    tx: watch::Sender<StatusSnapshot>,
}

impl StatusPublisher {
    pub fn new(interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot::default());
        Self {
            interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
            last_tick: None,
            tx,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> StatusSnapshot {
        self.tx.borrow().clone()
    }

    /// Time left until the next tick is due, for sizing the event-loop wait.
    pub fn until_next(&self, now: Instant) -> Duration {
        match self.last_tick {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Publishes when the period has elapsed (or on first call). Returns
    /// whether the published value changed.
    pub fn poll(&mut self, now: Instant, store: &DocumentStore) -> bool {
        if let Some(last) = self.last_tick {
            if now.duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_tick = Some(now);
        self.publish(StatusSnapshot::capture(store))
    }

    /// Publishes immediately, outside the regular period.
    pub fn refresh(&mut self, store: &DocumentStore) -> bool {
        self.publish(StatusSnapshot::capture(store))
    }

    fn publish(&self, snapshot: StatusSnapshot) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        })
    }
}

impl Default for StatusPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_INTERVAL)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/status.rs"]
mod tests;

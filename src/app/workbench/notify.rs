//! Toast notifications shown above the status bar.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub expires: Instant,
}

pub struct Notifications {
    queue: VecDeque<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::with_capacity(MAX_VISIBLE),
            ttl,
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        if self.queue.len() == MAX_VISIBLE {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            message: message.into(),
            severity,
            expires: now + self.ttl,
        });
    }

    /// Drops expired entries; returns whether anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.expires > now);
        self.queue.len() != before
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.queue.iter().map(|n| n.expires).min()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench/notify.rs"]
mod tests;

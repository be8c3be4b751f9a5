use super::Workbench;
use crate::services::AppMessage;
use crate::tui::FocusArea;
use std::time::Instant;

impl Workbench {
    /// Periodic work between input events: completed reads, the status
    /// snapshot and toast expiry. Returns whether a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Ok(message) = self.runtime_rx.try_recv() {
            self.handle_message(message);
            changed = true;
        }
        self.sync_status();

        changed |= self.status.poll(now, &self.store);
        changed |= self.notifications.expire(now);
        changed
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::FileLoaded { path, bytes } => {
                self.pending_opens.remove(&path);
                match self.store.finish_open(&path, bytes) {
                    Ok(_) => self.focus = FocusArea::Editor,
                    Err(err) => self.report_error(&err),
                }
            }
            AppMessage::FileError { path, error } => {
                self.pending_opens.remove(&path);
                tracing::debug!(path = %path.display(), "read failed");
                self.report_error(&error);
            }
        }
    }
}

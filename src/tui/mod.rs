//! Terminal integration (crossterm + ratatui).
//!
//! Kept apart from `kernel`/`models` so the core state carries no terminal
//! dependency.

pub mod clipboard;
pub mod crossterm;
pub mod terminal_guard;
pub mod view;

pub use clipboard::{Clipboard, Osc52Error};
pub use terminal_guard::{ShutdownFlag, TerminalGuard, TerminalRestorer};
pub use view::{EventResult, FocusArea, View};

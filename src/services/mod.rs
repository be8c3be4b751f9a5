//! Services around the core state: file access, settings, key bindings and
//! the background runtime.

pub mod config;
pub mod file;
pub mod keybinding;
pub mod runtime;

pub use config::{EditorConfig, KeybindingRule, Settings};
pub use file::{FileError, FileProvider, LocalFileProvider};
pub use keybinding::KeybindingService;
pub use runtime::{AppMessage, AsyncRuntime};

//! tabedit - terminal multi-document text editor
//!
//! Module layout:
//! - core: input events and commands
//! - models: documents, the shared text surface, the lazy file tree
//! - kernel: document store and status publisher
//! - services: settings, file access, keybindings, background reads
//! - tui / app: terminal plumbing and the workbench shell (feature `tui`)

#[cfg(feature = "tui")]
pub mod app;
pub mod core;
pub mod kernel;
pub mod models;
pub mod services;
#[cfg(feature = "tui")]
pub mod tui;

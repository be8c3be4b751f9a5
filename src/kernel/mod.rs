//! Core editor state: the document store and the status publisher.
//!
//! Nothing in here depends on terminal crates; the TUI drives it from `app`.

pub mod document_store;
pub mod status;

pub use document_store::{
    ActiveDocument, CloseOutcome, DocumentStore, TabDirection, TabInfo, WELCOME_TEXT,
    WELCOME_TITLE,
};
pub use status::{
    file_type_label, StatusPublisher, StatusSnapshot, DEFAULT_STATUS_INTERVAL, PLAIN_TEXT,
};

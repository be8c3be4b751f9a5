//! Filesystem access behind a provider trait.

pub mod local;
pub mod provider;

pub use local::LocalFileProvider;
pub use provider::{decode_text, FileError, FileProvider};

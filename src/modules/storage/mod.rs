//! Storage module for file management
//!
//! Provides the local-disk blob store that holds uploaded bytes under a
//! per-user directory.

mod local_storage;

pub use local_storage::{LocalStorage, RemoveOutcome};

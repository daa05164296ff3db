//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for local disk storage and the preview job queue.

pub mod preview;
pub mod storage;

//! Preview job queue
//!
//! Uploads hand their content type to a [`PreviewQueue`], which records the
//! downstream jobs (thumbnails, text extraction) an external worker picks up.

mod queue;

pub use queue::{jobs_for_content_type, PgPreviewQueue, PreviewJobKind, PreviewQueue};

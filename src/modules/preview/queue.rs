use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Type};

use crate::core::error::Result;
use crate::features::files::content_type::{is_image, is_pdf, is_text, is_video};

/// Kind of derived artifact a preview job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "preview_job_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PreviewJobKind {
    Thumbnail,
    TextExtraction,
}

/// Jobs worth running for a given content type; empty when nothing applies
pub fn jobs_for_content_type(content_type: &str) -> Vec<PreviewJobKind> {
    if is_pdf(content_type) {
        vec![PreviewJobKind::Thumbnail, PreviewJobKind::TextExtraction]
    } else if is_image(content_type) || is_video(content_type) {
        vec![PreviewJobKind::Thumbnail]
    } else if is_text(content_type) {
        vec![PreviewJobKind::TextExtraction]
    } else {
        Vec::new()
    }
}

#[async_trait]
pub trait PreviewQueue: Send + Sync {
    /// Enqueue the jobs applicable to `content_type`, returning their ids
    async fn enqueue_by_content_type(&self, file_id: i64, content_type: &str) -> Result<Vec<i64>>;
}

/// Queue backed by the `preview_jobs` table
pub struct PgPreviewQueue {
    pool: PgPool,
}

impl PgPreviewQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreviewQueue for PgPreviewQueue {
    async fn enqueue_by_content_type(&self, file_id: i64, content_type: &str) -> Result<Vec<i64>> {
        let kinds = jobs_for_content_type(content_type);
        if kinds.is_empty() {
            tracing::debug!(
                "No preview jobs apply to content type {} (file {})",
                content_type,
                file_id
            );
            return Ok(Vec::new());
        }

        let mut job_ids = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO preview_jobs (file_id, kind, status)
                VALUES ($1, $2, 'pending')
                RETURNING id
                "#,
            )
            .bind(file_id)
            .bind(kind)
            .fetch_one(&self.pool)
            .await?;

            job_ids.push(id);
        }

        Ok(job_ids)
    }
}

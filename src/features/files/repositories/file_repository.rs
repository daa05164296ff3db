use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::database::escape_like;
use crate::core::error::Result;
use crate::features::files::models::{File, FileStatus, NewFile};

/// Persistence boundary for file metadata.
///
/// Lookups by id do not filter by owner or status; authorization is the
/// caller's job.
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<File>>;

    /// All active files of a user, unordered
    async fn find_active_by_user_id(&self, user_id: i64) -> Result<Vec<File>>;

    /// Active files of a user, newest first, optionally narrowed by a
    /// case-insensitive substring of the original filename
    async fn find_active_by_user_id_paginated(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<Vec<File>>;

    /// Counts exactly the rows `find_active_by_user_id_paginated` pages over
    async fn count_active_by_user_id(&self, user_id: i64, search: Option<&str>) -> Result<i64>;

    async fn save(&self, file: NewFile) -> Result<File>;

    /// Marks the row `DELETED`; the row itself is never removed.
    /// Returns false when no row has that id.
    async fn soft_delete(&self, id: i64) -> Result<bool>;
}

const FILE_COLUMNS: &str = "id, name, original_name, content_type, size, storage_path, \
                            thumbnail_url, preview_url, text_content, has_text_content, \
                            status, user_id, created_at, updated_at";

/// Appends the active-file filter shared by listing and counting
fn push_active_filter(qb: &mut QueryBuilder<'_, Postgres>, user_id: i64, search: Option<&str>) {
    qb.push(" WHERE user_id = ")
        .push_bind(user_id)
        .push(" AND status = ")
        .push_bind(FileStatus::Active);

    if let Some(search) = search {
        qb.push(" AND original_name ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)));
    }
}

pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<File>> {
        let file = sqlx::query_as::<_, File>(&format!(
            "SELECT {} FROM files WHERE id = $1",
            FILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    async fn find_active_by_user_id(&self, user_id: i64) -> Result<Vec<File>> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM files", FILE_COLUMNS));
        push_active_filter(&mut qb, user_id, None);

        let files = qb.build_query_as::<File>().fetch_all(&self.pool).await?;
        Ok(files)
    }

    async fn find_active_by_user_id_paginated(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<Vec<File>> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM files", FILE_COLUMNS));
        push_active_filter(&mut qb, user_id, search);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let files = qb.build_query_as::<File>().fetch_all(&self.pool).await?;
        Ok(files)
    }

    async fn count_active_by_user_id(&self, user_id: i64, search: Option<&str>) -> Result<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM files");
        push_active_filter(&mut qb, user_id, search);

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn save(&self, file: NewFile) -> Result<File> {
        let saved = sqlx::query_as::<_, File>(&format!(
            r#"
            INSERT INTO files (name, original_name, content_type, size, storage_path, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(&file.name)
        .bind(&file.original_name)
        .bind(&file.content_type)
        .bind(file.size)
        .bind(&file.storage_path)
        .bind(FileStatus::Active)
        .bind(file.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE files SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(FileStatus::Deleted)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

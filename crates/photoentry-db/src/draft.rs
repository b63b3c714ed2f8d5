use chrono::{DateTime, Utc};
use photoentry_core::models::{DraftPhoto, NewDraftPhoto};
use photoentry_core::AppError;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Repository for draft photo registration
#[derive(Clone)]
pub struct DraftRepository {
    pool: PgPool,
}

impl DraftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a draft for (session, slot), overwriting any previous draft in
    /// that slot. The surviving row keeps its original id; key, filename,
    /// content type, size, and rotation all take the latest call's values.
    /// Returns the id of the surviving row.
    pub async fn upsert(
        &self,
        draft: &NewDraftPhoto,
        now: DateTime<Utc>,
    ) -> Result<Uuid, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO draft_photos (
                id, session_id, storage_key, original_filename,
                content_type, size_bytes, slot, rotation, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft', $9, $9)
            ON CONFLICT (session_id, slot)
            DO UPDATE SET
                storage_key = excluded.storage_key,
                original_filename = excluded.original_filename,
                content_type = excluded.content_type,
                size_bytes = excluded.size_bytes,
                rotation = excluded.rotation,
                status = 'draft',
                updated_at = excluded.updated_at
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.session_id)
        .bind(&draft.storage_key)
        .bind(&draft.original_filename)
        .bind(&draft.content_type)
        .bind(draft.size_bytes)
        .bind(draft.slot)
        .bind(draft.rotation)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// All drafts for a session, in slot order
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<DraftPhoto>, AppError> {
        let drafts = sqlx::query_as::<_, DraftPhoto>(
            r#"
            SELECT id, session_id, storage_key, original_filename,
                   content_type, size_bytes, slot, rotation, status,
                   created_at, updated_at
            FROM draft_photos
            WHERE session_id = $1
            ORDER BY slot ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(drafts)
    }
}

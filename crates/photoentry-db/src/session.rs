use chrono::{DateTime, Utc};
use photoentry_core::models::UploadSession;
use photoentry_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for upload session lifecycle
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new open session expiring at `expires_at`
    pub async fn create(
        &self,
        session_id: Uuid,
        email: Option<String>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        // Dynamic SQLx queries to avoid requiring DATABASE_URL/sqlx prepare
        sqlx::query(
            r#"
            INSERT INTO upload_sessions (id, email, state, expires_at, created_at, updated_at)
            VALUES ($1, $2, 'open', $3, $4, $4)
            "#,
        )
        .bind(session_id)
        .bind(email)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a session by ID
    pub async fn get(&self, session_id: Uuid) -> Result<Option<UploadSession>, AppError> {
        let row = sqlx::query_as::<_, UploadSession>(
            r#"
            SELECT id, email, state, expires_at, created_at, updated_at
            FROM upload_sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Persist the open -> expired transition. Guarded by `state = 'open'` so
    /// a concurrent commit that already won keeps its `committed` state.
    /// Returns the number of rows affected (0 when the guard did not match).
    pub async fn mark_expired_if_open(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE upload_sessions
            SET state = 'expired', updated_at = $2
            WHERE id = $1 AND state = 'open'
            "#,
        )
        .bind(session_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

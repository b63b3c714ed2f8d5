use chrono::{DateTime, Utc};
use photoentry_core::models::{
    CommittedPhoto, DraftPhoto, Photo, PhotoMetaInput, Submission,
};
use photoentry_core::AppError;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Validated applicant and work fields for one commit.
#[derive(Debug, Clone)]
pub struct CommitFields {
    pub work_title: String,
    pub episode: String,
    pub name_kanji: String,
    pub name_kana: String,
    pub pen_name: Option<String>,
    pub email: String,
    pub phone: String,
}

/// Admin listing parameters (1-based page)
#[derive(Debug, Clone)]
pub struct AdminListQuery {
    pub page: i64,
    pub limit: i64,
    pub status: Option<String>,
}

/// Repository for committed submissions: the atomic session commit and the
/// admin read surface.
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Promote all drafts of a session into a submission, in one transaction.
    ///
    /// Statement order is fixed for referential correctness: submission first,
    /// then per draft (in slot order) its photo and original variant, then the
    /// draft -> final updates, and last the guarded session transition. If the
    /// guard matches zero rows another commit won the race; the transaction is
    /// rolled back and the caller sees Conflict, never a silent success.
    pub async fn commit_session(
        &self,
        session_id: Uuid,
        fields: &CommitFields,
        drafts: &[DraftPhoto],
        overrides: &BTreeMap<i32, PhotoMetaInput>,
        now: DateTime<Utc>,
    ) -> Result<(Uuid, Vec<CommittedPhoto>), AppError> {
        let submission_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, session_id, work_title, episode,
                name_kanji, name_kana, pen_name, email, phone,
                agreed_terms, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 1, 'submitted', $10, $10)
            "#,
        )
        .bind(submission_id)
        .bind(session_id)
        .bind(&fields.work_title)
        .bind(&fields.episode)
        .bind(&fields.name_kanji)
        .bind(&fields.name_kana)
        .bind(&fields.pen_name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut committed = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let photo_id = Uuid::new_v4();
            let meta = overrides.get(&draft.slot);

            sqlx::query(
                r#"
                INSERT INTO photos (
                    id, submission_id, draft_photo_id, original_filename,
                    shoot_date, shoot_location, caption,
                    sort_order, status, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'active', $9)
                "#,
            )
            .bind(photo_id)
            .bind(submission_id)
            .bind(draft.id)
            .bind(&draft.original_filename)
            .bind(meta.and_then(|m| m.shoot_date.as_deref()))
            .bind(meta.and_then(|m| m.shoot_location.as_deref()))
            .bind(meta.and_then(|m| m.caption.as_deref()))
            .bind(draft.slot)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            // The original variant copies the draft's object reference
            // verbatim; no re-encoding or dimension probing happens here.
            sqlx::query(
                r#"
                INSERT INTO photo_variants (
                    id, photo_id, kind, storage_key, content_type, size_bytes,
                    is_ready, created_at
                )
                VALUES ($1, $2, 'original', $3, $4, $5, TRUE, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(photo_id)
            .bind(&draft.storage_key)
            .bind(&draft.content_type)
            .bind(draft.size_bytes)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE draft_photos
                SET status = 'final', updated_at = $2
                WHERE id = $1
                "#,
            )
            .bind(draft.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            committed.push(CommittedPhoto {
                photo_id,
                slot: draft.slot,
            });
        }

        let result = sqlx::query(
            r#"
            UPDATE upload_sessions
            SET state = 'committed', updated_at = $2
            WHERE id = $1 AND state = 'open'
            "#,
        )
        .bind(session_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Lost the race on the final optimistic check. Dropping the
            // transaction rolls everything back.
            tx.rollback().await.ok();
            tracing::warn!(
                session_id = %session_id,
                "Commit lost the open -> committed race, rolling back"
            );
            return Err(AppError::Conflict(
                "Session is not open (already committed)".to_string(),
            ));
        }

        tx.commit().await?;

        Ok((submission_id, committed))
    }

    /// Paginated admin listing, newest first, with active photos aggregated
    /// per submission in sort order.
    pub async fn list_for_admin(
        &self,
        query: &AdminListQuery,
    ) -> Result<(Vec<(Submission, Vec<Photo>)>, i64), AppError> {
        let offset = (query.page - 1) * query.limit;

        let total: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM submissions
            WHERE ($1::text IS NULL OR status = $1)
            "#,
        )
        .bind(&query.status)
        .fetch_one(&self.pool)
        .await?
        .get("total");

        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, session_id, work_title, episode,
                   name_kanji, name_kana, pen_name, email, phone,
                   agreed_terms, status, created_at, updated_at
            FROM submissions
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&query.status)
        .bind(query.limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        if submissions.is_empty() {
            return Ok((Vec::new(), total));
        }

        let submission_ids: Vec<Uuid> = submissions.iter().map(|s| s.id).collect();
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, submission_id, draft_photo_id, original_filename,
                   shoot_date, shoot_location, caption,
                   sort_order, status, created_at
            FROM photos
            WHERE submission_id = ANY($1) AND status = 'active'
            ORDER BY sort_order ASC
            "#,
        )
        .bind(&submission_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: BTreeMap<Uuid, Vec<Photo>> = BTreeMap::new();
        for photo in photos {
            grouped.entry(photo.submission_id).or_default().push(photo);
        }

        let rows = submissions
            .into_iter()
            .map(|submission| {
                let photos = grouped.remove(&submission.id).unwrap_or_default();
                (submission, photos)
            })
            .collect();

        Ok((rows, total))
    }
}

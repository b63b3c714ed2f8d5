use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of an upload session.
///
/// Transitions only move forward: `open -> committed` (by the submission
/// committer) or `open -> expired` (lazily, by any reader observing
/// `now > expires_at`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Open,
    Committed,
    Expired,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SessionState::Open => write!(f, "open"),
            SessionState::Committed => write!(f, "committed"),
            SessionState::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for SessionState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(SessionState::Open),
            "committed" => Ok(SessionState::Committed),
            "expired" => Ok(SessionState::Expired),
            _ => Err(anyhow::anyhow!("Invalid session state: {}", s)),
        }
    }
}

/// Upload session record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UploadSession {
    pub id: Uuid,
    pub email: Option<String>,
    pub state: SessionState,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UploadSession {
    /// Whether the session is open but past its deadline at `now`.
    /// The stored state column may still read `open`; callers are expected to
    /// report `expired` and best-effort persist the transition.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.state == SessionState::Open && now > self.expires_at
    }

    /// The state as visible to callers at `now` (read-time correction).
    pub fn effective_state(&self, now: DateTime<Utc>) -> SessionState {
        if self.is_stale(now) {
            SessionState::Expired
        } else {
            self.state
        }
    }
}

/// Request to create an upload session
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    /// Contact email for the pending submission
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: Option<String>,
    /// Session time-to-live in milliseconds (5 minutes .. 7 days)
    pub ttl_ms: Option<i64>,
}

/// Response after creating an upload session
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub expires_at_ms: i64,
    pub created_at_ms: i64,
}

/// Session view returned by GET, with read-time expiry correction applied
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub state: SessionState,
    pub expires_at_ms: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl SessionView {
    pub fn from_record(session: &UploadSession, now: DateTime<Utc>) -> Self {
        SessionView {
            id: session.id,
            email: session.email.clone(),
            state: session.effective_state(now),
            expires_at_ms: session.expires_at.timestamp_millis(),
            created_at_ms: session.created_at.timestamp_millis(),
            updated_at_ms: session.updated_at.timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session_at(state: SessionState, expires_at: DateTime<Utc>) -> UploadSession {
        let created = expires_at - Duration::hours(24);
        UploadSession {
            id: Uuid::new_v4(),
            email: None,
            state,
            expires_at,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn open_session_within_deadline_stays_open() {
        let expires = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let session = session_at(SessionState::Open, expires);
        assert_eq!(session.effective_state(expires), SessionState::Open);
        assert!(!session.is_stale(expires));
    }

    #[test]
    fn open_session_past_deadline_reads_expired() {
        let expires = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let session = session_at(SessionState::Open, expires);
        let later = expires + Duration::milliseconds(1);
        assert!(session.is_stale(later));
        assert_eq!(session.effective_state(later), SessionState::Expired);
    }

    #[test]
    fn committed_session_never_reads_expired() {
        let expires = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let session = session_at(SessionState::Committed, expires);
        let later = expires + Duration::days(30);
        assert!(!session.is_stale(later));
        assert_eq!(session.effective_state(later), SessionState::Committed);
    }

    #[test]
    fn session_state_round_trips_through_str() {
        for state in [
            SessionState::Open,
            SessionState::Committed,
            SessionState::Expired,
        ] {
            assert_eq!(state.to_string().parse::<SessionState>().unwrap(), state);
        }
        assert!("closed".parse::<SessionState>().is_err());
    }
}

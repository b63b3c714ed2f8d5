//! Application-wide constants.

/// Maximum number of photos (slots) per upload session and submission.
pub const MAX_PHOTOS: usize = 5;

/// Highest valid slot index (slots are 0-based).
pub const MAX_SLOT: i32 = 4;

/// Default session time-to-live: 24 hours, in milliseconds.
pub const DEFAULT_SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Minimum accepted session TTL: 5 minutes, in milliseconds.
pub const MIN_SESSION_TTL_MS: i64 = 5 * 60 * 1000;

/// Maximum accepted session TTL: 7 days, in milliseconds.
pub const MAX_SESSION_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Validity window of a presigned PUT credential, in seconds.
pub const UPLOAD_GRANT_EXPIRES_IN_SECS: u64 = 600;

/// Rotation hints a draft may carry, in degrees clockwise.
pub const ALLOWED_ROTATIONS: &[i32] = &[0, 90, 180, 270];

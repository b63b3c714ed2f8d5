//! Shared key generation for draft uploads.
//!
//! Key format: `draft_photos/{session_id}/{uuid}_{filename}`. The random
//! component makes a re-pick of the same slot land on a fresh key, so the
//! previously referenced object simply becomes unreferenced.

use photoentry_core::validation::sanitize_filename;
use uuid::Uuid;

/// Generate a collision-resistant object key for one draft upload, scoped
/// under its session.
pub fn draft_photo_key(session_id: Uuid, filename: &str) -> String {
    format!(
        "draft_photos/{}/{}_{}",
        session_id,
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_session_scoped_and_sanitized() {
        let session_id = Uuid::new_v4();
        let key = draft_photo_key(session_id, "my photo (1).jpg");
        let prefix = format!("draft_photos/{}/", session_id);
        assert!(key.starts_with(&prefix));
        assert!(key.ends_with("_my_photo__1_.jpg"));
        assert!(!key.contains(' '));
    }

    #[test]
    fn repeated_keys_for_same_filename_differ() {
        let session_id = Uuid::new_v4();
        let a = draft_photo_key(session_id, "a.jpg");
        let b = draft_photo_key(session_id, "a.jpg");
        assert_ne!(a, b);
    }
}

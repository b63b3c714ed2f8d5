//! Input validation helpers
//!
//! Small pure checks shared by the session, upload-grant, and submission
//! endpoints: email and date shapes, slot and rotation ranges, TTL bounds,
//! and the object-key filename sanitizer. All failures name the offending
//! field so callers can fix input and resubmit.

use crate::constants::{
    ALLOWED_ROTATIONS, MAX_SESSION_TTL_MS, MAX_SLOT, MIN_SESSION_TTL_MS,
};
use crate::error::AppError;
use regex::Regex;

/// Lightweight `local@domain.tld` shape check (not full RFC 5322).
pub fn is_valid_email(email: &str) -> bool {
    let pattern = match Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
        Ok(p) => p,
        Err(_) => return false,
    };
    pattern.is_match(email)
}

pub fn validate_email(field: &str, email: &str) -> Result<(), AppError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid {}", field)))
    }
}

/// `YYYY-MM-DD`, as agreed with the form frontend. The calendar validity of
/// the date is checked via chrono, not just the digit layout.
pub fn validate_shoot_date(field: &str, value: &str) -> Result<(), AppError> {
    if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid {} (must be YYYY-MM-DD)",
            field
        )))
    }
}

pub fn validate_slot(slot: i32) -> Result<(), AppError> {
    if (0..=MAX_SLOT).contains(&slot) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid slot (must be integer 0..{})",
            MAX_SLOT
        )))
    }
}

pub fn validate_rotation(rotation: i32) -> Result<(), AppError> {
    if ALLOWED_ROTATIONS.contains(&rotation) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Invalid rotation (must be one of 0, 90, 180, 270)".to_string(),
        ))
    }
}

pub fn validate_size_bytes(size_bytes: i64) -> Result<(), AppError> {
    if size_bytes >= 0 {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Invalid size_bytes (must be integer >= 0)".to_string(),
        ))
    }
}

pub fn validate_ttl_ms(ttl_ms: i64) -> Result<(), AppError> {
    if (MIN_SESSION_TTL_MS..=MAX_SESSION_TTL_MS).contains(&ttl_ms) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid ttl_ms (must be integer {}..{})",
            MIN_SESSION_TTL_MS, MAX_SESSION_TTL_MS
        )))
    }
}

/// Require a non-empty value after trimming; returns the trimmed value.
pub fn required_trimmed<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::Validation(format!("Missing required field: {}", field)))
    } else {
        Ok(trimmed)
    }
}

/// Keep only `[A-Za-z0-9.-]` in a filename destined for an object key;
/// everything else becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.co.jp"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("no at sign"));
        assert!(!is_valid_email("spaced user@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_shoot_date_shape() {
        assert!(validate_shoot_date("shoot_date", "2026-03-07").is_ok());
        assert!(validate_shoot_date("shoot_date", "2026-3-7").is_err());
        assert!(validate_shoot_date("shoot_date", "2026-13-01").is_err());
        assert!(validate_shoot_date("shoot_date", "07-03-2026").is_err());
        assert!(validate_shoot_date("shoot_date", "yesterday").is_err());
    }

    #[test]
    fn test_slot_bounds() {
        for slot in 0..=4 {
            assert!(validate_slot(slot).is_ok());
        }
        assert!(validate_slot(-1).is_err());
        assert!(validate_slot(5).is_err());
    }

    #[test]
    fn test_rotation_set() {
        for rot in [0, 90, 180, 270] {
            assert!(validate_rotation(rot).is_ok());
        }
        assert!(validate_rotation(45).is_err());
        assert!(validate_rotation(-90).is_err());
        assert!(validate_rotation(360).is_err());
    }

    #[test]
    fn test_ttl_bounds() {
        assert!(validate_ttl_ms(5 * 60 * 1000).is_ok());
        assert!(validate_ttl_ms(24 * 60 * 60 * 1000).is_ok());
        assert!(validate_ttl_ms(7 * 24 * 60 * 60 * 1000).is_ok());
        assert!(validate_ttl_ms(5 * 60 * 1000 - 1).is_err());
        assert!(validate_ttl_ms(7 * 24 * 60 * 60 * 1000 + 1).is_err());
        assert!(validate_ttl_ms(0).is_err());
        assert!(validate_ttl_ms(-1).is_err());
    }

    #[test]
    fn test_required_trimmed() {
        assert_eq!(required_trimmed("work_title", "  Pandas  ").unwrap(), "Pandas");
        let err = required_trimmed("work_title", "   ").unwrap_err();
        assert!(err.to_string().contains("work_title"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("写真.png"), "__.png");
        assert_eq!(sanitize_filename("a-b_c.webp"), "a-b_c.webp");
    }
}

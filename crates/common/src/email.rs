// Email canonicalization for directory lookups and invitation matching.

use thiserror::Error;

/// Maximum allowed address length (RFC 5321 path limit).
const MAX_EMAIL_CHARS: usize = 254;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is empty")]
    Empty,

    #[error("email exceeds maximum length of {MAX_EMAIL_CHARS} characters")]
    TooLong,

    #[error("email must contain exactly one '@' with a non-empty local part and domain")]
    Malformed,

    #[error("email contains whitespace or control characters")]
    InvalidCharacter,
}

/// Normalize an email address so that lookups are case-insensitive.
///
/// Rules:
/// - Trim surrounding whitespace
/// - Lowercase the whole address
/// - Reject inner whitespace and control characters
/// - Require exactly one `@` with both sides non-empty
/// - Enforce the 254 character limit
pub fn normalize_email(input: &str) -> Result<String, EmailError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EmailError::Empty);
    }

    if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(EmailError::InvalidCharacter);
    }

    if trimmed.chars().count() > MAX_EMAIL_CHARS {
        return Err(EmailError::TooLong);
    }

    let mut parts = trimmed.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(EmailError::Malformed);
    };
    if local.is_empty() || domain.is_empty() {
        return Err(EmailError::Malformed);
    }

    Ok(trimmed.to_lowercase())
}

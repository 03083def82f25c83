//! Input validation helpers for account fields.
//!
//! Handlers validate request payloads with these before touching the
//! database; everything else (tour and review constraints) is enforced by
//! schema CHECK constraints and surfaced through error classification.

use crate::error::CoreError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum accepted display-name length.
pub const MAX_NAME_LEN: usize = 100;

/// Validate a user display name.
///
/// - Must not be empty or whitespace-only.
/// - Must not exceed [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Please tell us your name".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an email address shape.
///
/// Deliberately loose: one `@`, a non-empty local part, and a dotted domain.
/// Deliverability is proven by the reset-email flow, not by parsing.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if well_formed {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Please provide a valid email address".to_string(),
        ))
    }
}

/// Validate password strength.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that a password and its confirmation agree.
pub fn validate_password_pair(password: &str, confirm: &str) -> Result<(), CoreError> {
    if password != confirm {
        return Err(CoreError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

//! Input rules for signup and password reset. Each check returns the first
//! failing rule as a `DomainError::Validation` with a user-facing message.

use crate::domain::error::DomainError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SIGNUP_PASSWORD_MIN_LEN: usize = 6;
pub const RESET_PASSWORD_MIN_LEN: usize = 8;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid name regex"));

// Only one mail provider is accepted.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]{2,}@gmail\.com$").expect("valid email regex"));

const DIGIT_RUNS: &[&str] = &[
    "012345", "123456", "234567", "345678", "456789", "567890", "654321", "543210", "432109",
    "321098", "210987", "109876", "098765",
];

const WEAK_PASSWORDS: &[&str] = &[
    "password",
    "pass123",
    "qwerty",
    "abc123",
    "123abc",
    "password123",
];

fn invalid(message: &str) -> DomainError {
    DomainError::Validation(message.to_string())
}

/// Returns the trimmed name.
pub fn validate_name(name: &str) -> Result<String, DomainError> {
    if name.is_empty() {
        return Err(invalid("Name is required"));
    }

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(invalid("Name cannot be empty"));
    }

    if !NAME_RE.is_match(trimmed) {
        return Err(invalid("Name must contain only alphabets and spaces"));
    }

    Ok(trimmed.to_string())
}

/// Returns the trimmed, lowercased address.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }

    let normalized = normalize_email(email);
    if normalized.is_empty() {
        return Err(invalid("Email cannot be empty"));
    }

    if normalized.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("Email cannot start with a number"));
    }

    if !EMAIL_RE.is_match(&normalized) {
        return Err(invalid("Enter valid email"));
    }

    Ok(normalized)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_repeated_digit(password: &str) -> bool {
    let mut chars = password.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => {
            password.len() > 1 && chars.all(|c| c == first)
        }
        _ => false,
    }
}

/// Checks password strength. `name` is the account holder's name; its first
/// token must not appear in the password.
pub fn validate_password(password: &str, name: &str, min_len: usize) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(invalid("Password is required"));
    }

    if password.chars().count() < min_len {
        return Err(DomainError::Validation(format!(
            "Password must be at least {min_len} characters long"
        )));
    }

    if is_repeated_digit(password) || DIGIT_RUNS.iter().any(|run| password.contains(run)) {
        return Err(invalid(
            "Choose a different strong password (avoid consecutive or repeated numbers)",
        ));
    }

    let lowered = password.to_lowercase();
    let first_name = name.to_lowercase();
    let first_name = first_name.split(' ').next().unwrap_or_default();
    if !first_name.is_empty() && lowered.contains(first_name) {
        return Err(invalid(
            "Choose a different strong password (password should not contain your name)",
        ));
    }

    if WEAK_PASSWORDS.contains(&lowered.as_str()) {
        return Err(invalid(
            "Choose a different strong password (this password is too common)",
        ));
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(invalid(
            "Choose a different strong password (include both letters and numbers)",
        ));
    }

    Ok(())
}

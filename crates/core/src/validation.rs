//! Pure input validation rules shared by request DTOs.
//!
//! These are written as `validator` custom functions so DTOs in the API crate
//! can reference them from `#[validate(custom(...))]` attributes.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Special characters accepted in passwords.
const PASSWORD_SPECIALS: &str = "@$!%*#?&";

/// Mobile phone format: `01X` prefix (X in 0,1,6,7,8,9) followed by 7-8 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[016789]\d{7,8}$").expect("phone regex must compile"));

/// Validate password strength.
///
/// A password must be 8-20 characters and contain at least one letter, one
/// digit, and one special character from [`PASSWORD_SPECIALS`]. Characters
/// outside that set are rejected.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(8..=20).contains(&len) {
        return Err(password_error(
            "Password must be 8-20 characters long",
        ));
    }

    let mut has_letter = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_alphabetic() {
            has_letter = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if PASSWORD_SPECIALS.contains(c) {
            has_special = true;
        } else {
            return Err(password_error(
                "Password contains a disallowed character",
            ));
        }
    }

    if !(has_letter && has_digit && has_special) {
        return Err(password_error(
            "Password must contain a letter, a digit, and a special character",
        ));
    }

    Ok(())
}

/// Validate a mobile phone number against [`PHONE_RE`].
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Invalid mobile phone number format".into());
        Err(err)
    }
}

fn password_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("password");
    err.message = Some(message.into());
    err
}

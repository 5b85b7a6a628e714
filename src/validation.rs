//! Input validation for usernames, roles and form fields.
//!
//! Everything a user types crosses one of these checks before it reaches the
//! storage layer. Validation failures are normal, recoverable errors surfaced
//! as status banners; they never abort a session.

use crate::bbs::roles::Role;

/// Username validation errors with helpful messages.
#[derive(Debug, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Username is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Username contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("Username is a reserved system name")]
    Reserved,
}

/// Errors for fields submitted through forms or the admin tool.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("{name} cannot be empty")]
    Required { name: &'static str },

    #[error("Password too short (minimum {min} characters)")]
    PasswordTooShort { min: usize },

    #[error("Password too long (maximum {max} characters)")]
    PasswordTooLong { max: usize },

    #[error("Invalid role '{value}'. Use 'user', 'moderator' or 'admin'")]
    InvalidRole { value: String },
}

const USERNAME_MIN: usize = 2;
const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;

/// Names that would collide with filesystem or protocol conventions.
const RESERVED_NAMES: &[&str] = &[
    "root", "system", "operator", "guest", "anonymous", "con", "prn", "aux", "nul",
];

/// Validate a username: 2..=30 characters, ASCII alphanumerics plus `_ - .`,
/// no reserved names. Returns the trimmed username on success.
pub fn validate_username(username: &str) -> Result<String, UsernameError> {
    let name = username.trim();
    if name.chars().count() < USERNAME_MIN {
        return Err(UsernameError::TooShort { min: USERNAME_MIN });
    }
    if name.chars().count() > USERNAME_MAX {
        return Err(UsernameError::TooLong { max: USERNAME_MAX });
    }
    let bad: String = name
        .chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        .collect();
    if !bad.is_empty() {
        return Err(UsernameError::InvalidCharacters { chars: bad });
    }
    if RESERVED_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(UsernameError::Reserved);
    }
    Ok(name.to_string())
}

/// Validate a password for account creation or change.
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.len() < PASSWORD_MIN {
        return Err(FieldError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if password.len() > PASSWORD_MAX {
        return Err(FieldError::PasswordTooLong { max: PASSWORD_MAX });
    }
    Ok(())
}

/// Parse and validate a role string.
pub fn validate_role(value: &str) -> Result<Role, FieldError> {
    Role::parse(value.trim()).ok_or_else(|| FieldError::InvalidRole {
        value: value.trim().to_string(),
    })
}

/// Require a non-empty (after trimming) form field.
pub fn require_field(name: &'static str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required { name });
    }
    Ok(trimmed.to_string())
}

/// Generate a safe filename from a username using percent encoding. The
/// encoding is total, so distinct usernames never collide on disk.
pub fn safe_filename(username: &str) -> String {
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
    utf8_percent_encode(username, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("alice").unwrap(), "alice");
        assert_eq!(validate_username("  bob.2 ").unwrap(), "bob.2");
        assert!(matches!(
            validate_username("a"),
            Err(UsernameError::TooShort { .. })
        ));
        assert!(matches!(
            validate_username("has space"),
            Err(UsernameError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_username("../etc"),
            Err(UsernameError::InvalidCharacters { .. })
        ));
        assert!(matches!(validate_username("root"), Err(UsernameError::Reserved)));
    }

    #[test]
    fn password_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password(&"x".repeat(200)).is_err());
    }

    #[test]
    fn role_parsing() {
        assert!(matches!(validate_role("moderator"), Ok(Role::Moderator)));
        assert!(validate_role("wizard").is_err());
    }

    #[test]
    fn safe_filenames_have_no_separators() {
        let name = safe_filename("we/ird\\user");
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
    }

    #[test]
    fn required_fields_trim() {
        assert_eq!(require_field("Title", " hi ").unwrap(), "hi");
        assert!(require_field("Title", "   ").is_err());
    }
}

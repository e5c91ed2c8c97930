//! Client-side form validation.
//!
//! Errors carry the same field names the backend uses in 422 responses so
//! both kinds render next to the same input.

use std::collections::BTreeMap;

use newsdesk_api::ApiError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validation error for an auth form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty.
    EmptyName,
    /// Email address is empty.
    EmptyEmail,
    /// Email address format is invalid.
    InvalidEmail,
    /// Password is empty.
    EmptyPassword,
    /// Password is shorter than [`MIN_PASSWORD_LEN`].
    PasswordTooShort,
    /// Confirmation does not match the password.
    PasswordMismatch,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Name is required",
            Self::EmptyEmail => "Email address is required",
            Self::InvalidEmail => "Invalid email address format",
            Self::EmptyPassword => "Password is required",
            Self::PasswordTooShort => "Password must be at least 8 characters",
            Self::PasswordMismatch => "Passwords do not match",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort => "password",
            Self::PasswordMismatch => "password_confirmation",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a form.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// First message per field, from either local validation or a 422 response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Returns true if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Message for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl From<&[ValidationError]> for FieldErrors {
    fn from(errors: &[ValidationError]) -> Self {
        let mut fields = BTreeMap::new();
        for error in errors {
            fields
                .entry(error.field().to_string())
                .or_insert_with(|| error.message().to_string());
        }
        Self { fields }
    }
}

impl From<&ApiError> for FieldErrors {
    fn from(error: &ApiError) -> Self {
        let fields = error
            .errors
            .iter()
            .filter_map(|(field, messages)| Some((field.clone(), messages.first()?.clone())))
            .collect();
        Self { fields }
    }
}

/// Validate the login form.
///
/// # Errors
///
/// Returns every problem found.
pub fn validate_login(email: &str, password: &str) -> ValidationResult {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    if password.is_empty() {
        errors.push(ValidationError::EmptyPassword);
    }
    finish(errors)
}

/// Validate the registration form.
///
/// # Errors
///
/// Returns every problem found.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    password_confirmation: &str,
) -> ValidationResult {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    check_email(email, &mut errors);
    if password.is_empty() {
        errors.push(ValidationError::EmptyPassword);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::PasswordTooShort);
    }
    if password != password_confirmation {
        errors.push(ValidationError::PasswordMismatch);
    }
    finish(errors)
}

/// Validate the forgot-password form.
///
/// # Errors
///
/// Returns every problem found.
pub fn validate_forgot_password(email: &str) -> ValidationResult {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    finish(errors)
}

fn check_email(email: &str, errors: &mut Vec<ValidationError>) {
    if email.trim().is_empty() {
        errors.push(ValidationError::EmptyEmail);
    } else if !is_valid_email(email) {
        errors.push(ValidationError::InvalidEmail);
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Basic email validation: one `@`, non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email(" user@sub.example.com "));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example..com"));
    }

    #[test]
    fn test_login() {
        assert!(validate_login("a@b.com", "secret1").is_ok());
        let errors = validate_login("", "").unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmptyEmail, ValidationError::EmptyPassword]
        );
    }

    #[test]
    fn test_registration() {
        assert!(validate_registration("Ada", "a@b.com", "longenough", "longenough").is_ok());
        let errors = validate_registration(" ", "bad", "short", "other").unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyName));
        assert!(errors.contains(&ValidationError::InvalidEmail));
        assert!(errors.contains(&ValidationError::PasswordTooShort));
        assert!(errors.contains(&ValidationError::PasswordMismatch));
    }

    #[test]
    fn test_field_errors_from_both_sources() {
        let local = FieldErrors::from(validate_forgot_password("nope").unwrap_err().as_slice());
        assert_eq!(local.get("email"), Some("Invalid email address format"));

        let body = serde_json::from_str(
            r#"{"message":"Invalid","errors":{"email":["The email has already been taken."]}}"#,
        )
        .unwrap();
        let remote = FieldErrors::from(&ApiError::from_status(422, Some(body)));
        assert_eq!(remote.get("email"), Some("The email has already been taken."));
        assert!(remote.get("name").is_none());
        assert!(FieldErrors::default().is_empty());
    }
}

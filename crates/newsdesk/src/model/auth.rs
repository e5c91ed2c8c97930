//! Sign-in, registration and password reset forms.

use newsdesk_core::{
    FieldErrors, Registration, validate_forgot_password, validate_login, validate_registration,
};

use super::Failure;

/// Sign-in form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub errors: FieldErrors,
    /// Error not tied to a field, e.g. bad credentials.
    pub error: Option<String>,
    pub is_submitting: bool,
}

impl LoginForm {
    /// Validates locally and marks the form busy.
    ///
    /// Returns false and records errors if the form is invalid.
    pub fn begin_submit(&mut self) -> bool {
        self.error = None;
        match validate_login(&self.email, &self.password) {
            Ok(()) => {
                self.errors = FieldErrors::default();
                self.is_submitting = true;
                true
            }
            Err(errors) => {
                self.errors = FieldErrors::from(errors.as_slice());
                false
            }
        }
    }

    /// Records a rejected attempt. The password is cleared.
    pub fn fail(&mut self, failure: Failure) {
        self.is_submitting = false;
        self.password.clear();
        self.errors = failure.fields;
        self.error = Some(failure.message);
    }
}

/// Account creation form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub errors: FieldErrors,
    pub error: Option<String>,
    pub is_submitting: bool,
}

impl RegisterForm {
    /// Validates locally and, if valid, returns the registration to send.
    pub fn begin_submit(&mut self) -> Option<Registration> {
        self.error = None;
        if let Err(errors) = validate_registration(
            &self.name,
            &self.email,
            &self.password,
            &self.password_confirmation,
        ) {
            self.errors = FieldErrors::from(errors.as_slice());
            return None;
        }
        self.errors = FieldErrors::default();
        self.is_submitting = true;
        Some(Registration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        })
    }

    /// Records a rejected registration, keeping what was typed.
    pub fn fail(&mut self, failure: Failure) {
        self.is_submitting = false;
        self.errors = failure.fields;
        self.error = Some(failure.message);
    }
}

/// Password reset request form.
#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub errors: FieldErrors,
    pub error: Option<String>,
    /// Confirmation from the backend once the email went out.
    pub sent: Option<String>,
    pub is_submitting: bool,
}

impl ForgotPasswordForm {
    /// Fallback confirmation when the backend sends no message.
    pub const SENT: &'static str = "If that address has an account, a reset link is on its way.";

    /// Validates locally and marks the form busy.
    pub fn begin_submit(&mut self) -> bool {
        self.error = None;
        self.sent = None;
        match validate_forgot_password(&self.email) {
            Ok(()) => {
                self.errors = FieldErrors::default();
                self.is_submitting = true;
                true
            }
            Err(errors) => {
                self.errors = FieldErrors::from(errors.as_slice());
                false
            }
        }
    }

    /// Records the outcome of the request.
    pub fn finish(&mut self, result: Result<Option<String>, Failure>) {
        self.is_submitting = false;
        match result {
            Ok(message) => {
                self.sent = Some(message.unwrap_or_else(|| Self::SENT.to_string()));
            }
            Err(failure) => {
                self.errors = failure.fields;
                self.error = Some(failure.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_fields() {
        let mut form = LoginForm::default();
        assert!(!form.begin_submit());
        assert!(form.errors.get("email").is_some());
        assert!(!form.is_submitting);

        form.email = "ada@example.com".to_string();
        form.password = "correct horse".to_string();
        assert!(form.begin_submit());
        assert!(form.errors.is_empty());
        assert!(form.is_submitting);
    }

    #[test]
    fn test_login_failure_clears_password() {
        let mut form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "wrong".to_string(),
            is_submitting: true,
            ..LoginForm::default()
        };
        form.fail(Failure {
            message: "Invalid credentials".to_string(),
            ..Failure::default()
        });
        assert!(form.password.is_empty());
        assert_eq!(form.email, "ada@example.com");
        assert_eq!(form.error.as_deref(), Some("Invalid credentials"));
        assert!(!form.is_submitting);
    }

    #[test]
    fn test_register_mismatch() {
        let mut form = RegisterForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "password1".to_string(),
            password_confirmation: "password2".to_string(),
            ..RegisterForm::default()
        };
        assert!(form.begin_submit().is_none());
        assert!(!form.errors.is_empty());

        form.password_confirmation = "password1".to_string();
        let registration = form.begin_submit();
        assert_eq!(registration.map(|r| r.name), Some("Ada".to_string()));
    }

    #[test]
    fn test_forgot_password_default_confirmation() {
        let mut form = ForgotPasswordForm {
            email: "ada@example.com".to_string(),
            ..ForgotPasswordForm::default()
        };
        assert!(form.begin_submit());
        form.finish(Ok(None));
        assert_eq!(form.sent.as_deref(), Some(ForgotPasswordForm::SENT));
    }
}

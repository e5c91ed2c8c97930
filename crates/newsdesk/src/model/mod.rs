//! Screen state for the news reader.

mod article;
mod auth;
mod feed;
mod jobs;
mod profile;

pub use article::{ArticleState, byline};
pub use auth::{ForgotPasswordForm, LoginForm, RegisterForm};
pub use feed::{Catalog, FeedState, SearchState};
pub use jobs::JobsState;
pub use profile::ProfileState;

use newsdesk_core::{Error, FieldErrors};

/// A failed background task, flattened so it can travel in a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failure {
    /// Text to show the user.
    pub message: String,
    /// Per-field messages from a 422 response.
    pub fields: FieldErrors,
    /// The backend rejected the session.
    pub unauthorized: bool,
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        let fields = error.api().map(FieldErrors::from).unwrap_or_default();
        Self {
            message: error.to_string(),
            fields,
            unauthorized: error.is_unauthorized(),
        }
    }
}

/// Result type carried by task messages.
pub type Outcome<T> = Result<T, Failure>;

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_api::ApiError;

    #[test]
    fn test_failure_from_unauthorized() {
        let failure = Failure::from(Error::Api(ApiError::from_status(401, None)));
        assert!(failure.unauthorized);
        assert!(!failure.message.is_empty());
    }

    #[test]
    fn test_failure_keeps_credit_message() {
        let failure = Failure::from(Error::InsufficientCredits {
            requested: 1,
            remaining: 0,
        });
        assert!(!failure.unauthorized);
        assert!(failure.fields.is_empty());
        assert!(failure.message.contains('0'));
    }
}

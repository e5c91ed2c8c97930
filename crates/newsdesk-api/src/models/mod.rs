//! Wire models mirrored from the backend.

mod article;
mod auth;
mod job;
mod preferences;

pub use article::{Article, ArticleId, ArticleQuery, Category, Source};
pub use auth::{AuthPayload, ForgotPasswordRequest, LoginRequest, RegisterRequest, User, UserId};
pub use job::{Job, JobFilters, JobId, JobStatus, NewJobRequest};
pub use preferences::{PreferencesUpdate, UserPreferences};

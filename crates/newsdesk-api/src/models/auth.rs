//! Authentication payloads.

use serde::{Deserialize, Serialize};

/// Backend user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// `data` of a successful login or registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthPayload {
    /// Bearer token (JWT).
    #[serde(alias = "access_token")]
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Must equal `password`.
    pub password_confirmation: String,
}

/// Body of `POST /forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    /// Email address of the account.
    pub email: String,
}

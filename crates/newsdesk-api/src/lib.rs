//! # newsdesk-api
//!
//! HTTP client and wire models for the newsdesk news-aggregation backend.
//!
//! ## Features
//!
//! - **Client wrapper**: bearer-token injection, 401 session clearing
//! - **Normalized errors**: one [`ApiError`] shape with user-facing messages
//! - **Typed endpoints**: auth, articles, taxonomy, preferences, job queue
//! - **Token inspection**: JWT `exp` checks without signature verification
//!
//! ## Quick Start
//!
//! ```ignore
//! use newsdesk_api::{ApiClient, ArticleQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8000/api")?;
//!     let page = client.articles(&ArticleQuery::page(1)).await?;
//!     for article in page.data {
//!         println!("{}", article.title);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod endpoints;
pub mod envelope;
mod error;
pub mod models;
pub mod token;

pub use client::{ApiClient, DEFAULT_BASE_URL, SessionStore};
pub use envelope::{Acknowledgement, ApiResponse, PageLinks, Paginated};
pub use error::{
    ApiError, ErrorBody, ErrorKind, NETWORK_MESSAGE, NOT_FOUND_MESSAGE, Result, SERVER_MESSAGE,
    UNAUTHORIZED_MESSAGE, VALIDATION_MESSAGE,
};
pub use models::*;
pub use token::{is_token_expired, is_token_expired_at};

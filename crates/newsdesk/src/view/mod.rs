//! View components for the application.

mod articles;
mod auth;
mod common;
mod header;
mod jobs;
mod profile;
mod search;
mod toasts;

pub use articles::{view_article, view_home};
pub use auth::{view_forgot_password, view_login, view_register};
pub use header::{HeaderContext, view_header};
pub use jobs::{view_jobs_drawer, view_jobs_page};
pub use profile::{ProfileContext, view_profile};
pub use search::view_search;
pub use toasts::view_toasts;

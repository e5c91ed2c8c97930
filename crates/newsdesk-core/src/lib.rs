//! # newsdesk-core
//!
//! Client-side logic for the newsdesk news reader, independent of any UI.
//!
//! This crate provides:
//! - Typed local storage for session and UI state
//! - Session management (login, registration, restore, expiry)
//! - A query cache with tag-based invalidation and the news service on top
//! - Job monitoring: bucketing, row actions, refresh scheduling
//! - Search filter composition and feed selection
//! - Advisory scraping credits
//! - Preference drafts, routing guards and form validation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod credits;
mod error;
pub mod jobs;
pub mod preferences;
pub mod routes;
pub mod search;
pub mod service;
pub mod session;
pub mod storage;
pub mod ui;
pub mod validation;

pub use cache::{FetchPolicy, QueryCache, QueryKey, Tag};
pub use config::{ApiConfig, DRAWER_INTERVAL, PAGE_INTERVAL};
pub use credits::{CreditLedger, CreditRecord, DEFAULT_MAX_CREDITS};
pub use error::{Error, Result};
pub use jobs::{
    JobActions, JobBuckets, JobMonitor, JobTransition, RefreshSchedule,
    detect_transitions, view_target,
};
pub use preferences::PreferencesDraft;
pub use routes::{Route, resolve};
pub use search::{FeedMode, FilterChange, SearchFilters, SearchForm, SearchFormError};
pub use service::{JOB_COST, NewsService, SubmittedJob};
pub use session::{Registration, SessionManager, SessionPolicy, SessionState};
pub use storage::{FileStorage, KeyringStorage, LocalStore, MemoryStorage, Storage};
pub use ui::{Notification, Notifications, Severity, ThemeMode, UiStore};
pub use validation::{
    FieldErrors, ValidationError, ValidationResult, validate_forgot_password, validate_login,
    validate_registration,
};

//! Message types for application events.
//!
//! In the Elm architecture, Messages are events that trigger state changes.

use std::time::Instant;

use iced::widget::markdown;
use newsdesk_api::{
    Article, ArticleId, Category, Job, JobFilters, JobId, Paginated, Source, User,
    UserPreferences,
};
use newsdesk_core::{FeedMode, Route, SearchFilters, SessionState, SubmittedJob};

use crate::model::Outcome;

/// Application messages (events).
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    /// Go to a screen, subject to the access rules.
    Navigate(Route),

    // Session
    /// Stored session checked at startup.
    SessionRestored(SessionState),
    /// Sign-in, registration and reset forms.
    Auth(AuthMessage),
    /// Login or registration finished.
    SignedIn(Outcome<User>),
    /// Password reset request finished.
    ResetRequested(Outcome<Option<String>>),
    /// Sign out.
    Logout,
    /// Sign-out finished.
    LoggedOut(SessionState),

    // Articles
    /// A feed or search page arrived.
    FeedLoaded(FeedTarget, FeedMode, SearchFilters, Outcome<Paginated<Article>>),
    /// Categories and sources arrived.
    CatalogLoaded(Outcome<(Vec<Category>, Vec<Source>)>),
    /// Article detail arrived.
    ArticleLoaded(ArticleId, Outcome<Article>),
    /// Open a URL in the system browser.
    OpenUrl(String),
    /// Link clicked inside an article body.
    LinkClicked(markdown::Uri),
    /// Move the home feed to another page.
    FeedPage(u32),
    /// Search screen.
    Search(SearchMessage),

    // Profile
    /// Profile screen.
    Profile(ProfileMessage),
    /// Preferences arrived.
    PreferencesLoaded(Outcome<UserPreferences>),
    /// Preferences save finished.
    PreferencesSaved(Outcome<UserPreferences>),

    // Jobs
    /// Jobs page and drawer.
    Jobs(JobsMessage),
    /// Job list arrived.
    JobsLoaded(Outcome<Vec<Job>>),
    /// Cancel or retry finished.
    JobActionFinished(JobId, Outcome<Option<String>>),
    /// New scrape job accepted (or refused).
    JobSubmitted(Outcome<SubmittedJob>),
    /// A desktop notification was shown or failed.
    Notified(Result<(), String>),

    // UI
    /// Flip between light and dark.
    ToggleTheme,
    /// Close a toast.
    DismissToast(u64),
    /// Periodic housekeeping (toast expiry, token expiry).
    Tick(Instant),
    /// Keyboard shortcut pressed.
    KeyPressed(KeyboardAction),
    /// Event with nothing to do.
    Ignored,
}

/// Which article list a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTarget {
    Home,
    Search,
}

/// Sign-in, registration and reset form events.
#[derive(Debug, Clone)]
pub enum AuthMessage {
    LoginEmailChanged(String),
    LoginPasswordChanged(String),
    SubmitLogin,
    RegisterNameChanged(String),
    RegisterEmailChanged(String),
    RegisterPasswordChanged(String),
    RegisterConfirmationChanged(String),
    SubmitRegister,
    ForgotEmailChanged(String),
    SubmitForgot,
}

/// Search screen events.
#[derive(Debug, Clone)]
pub enum SearchMessage {
    KeywordChanged(String),
    DateFromChanged(String),
    DateToChanged(String),
    /// Apply the text inputs.
    Submit,
    CategorySelected(Option<String>),
    SourceSelected(Option<String>),
    Page(u32),
    /// Drop every filter.
    Clear,
    /// Hide the hint banner for good.
    DismissAlert,
}

/// Profile screen events.
#[derive(Debug, Clone)]
pub enum ProfileMessage {
    ToggleCategory(String),
    ToggleSource(String),
    AuthorInputChanged(String),
    AddAuthor,
    RemoveAuthor(String),
    LanguageChanged(String),
    TimezoneChanged(String),
    EmailNotificationsToggled(bool),
    Save,
    /// Discard unsaved edits.
    Reset,
}

/// Job panel events.
#[derive(Debug, Clone)]
pub enum JobsMessage {
    /// Fetch the job list now.
    Refresh,
    /// Scheduled refresh.
    Poll,
    ToggleDrawer,
    DrawerAutoRefresh(bool),
    PageAutoRefresh(bool),
    Cancel(JobId),
    Retry(JobId),
    /// Show the articles a job scraped for.
    View(JobFilters),
    /// Queue a scrape for the current search filters.
    SubmitScrape,
}

/// Keyboard actions that can be triggered by shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardAction {
    /// Reload the current screen (F5 or Ctrl+R).
    Refresh,
    /// Go home (Ctrl+H).
    Home,
    /// Open search (Ctrl+F).
    Search,
    /// Open the jobs page (Ctrl+J).
    Jobs,
    /// Toggle the jobs drawer (Ctrl+Shift+J).
    ToggleDrawer,
    /// Toggle the theme (Ctrl+Shift+L).
    ToggleTheme,
    /// Back to the list from an article (Escape).
    Back,
}

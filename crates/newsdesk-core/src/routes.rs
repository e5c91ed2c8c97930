//! Screens and access rules.

use newsdesk_api::ArticleId;

use crate::search::SearchFilters;

/// A navigable screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Entry point; resolves to Home or Login.
    Root,
    /// Sign in.
    Login,
    /// Create an account.
    Register,
    /// Request a password reset email.
    ForgotPassword,
    /// Article feed.
    Home,
    /// Filtered article list.
    Search(SearchFilters),
    /// Single article.
    Article(ArticleId),
    /// Preferences and account.
    Profile,
    /// Background job monitor.
    Jobs,
}

impl Route {
    /// Only meaningful for signed-out visitors.
    #[must_use]
    pub const fn is_guest_only(&self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::ForgotPassword)
    }

    /// Requires a signed-in user.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(self, Self::Profile | Self::Jobs)
    }

    /// URL-style path, e.g. `/search?keyword=rust`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::Home => "/home".to_string(),
            Self::Search(filters) => {
                let query = filters.to_query_string();
                if query.is_empty() {
                    "/search".to_string()
                } else {
                    format!("/search?{query}")
                }
            }
            Self::Article(id) => format!("/articles/{id}"),
            Self::Profile => "/profile".to_string(),
            Self::Jobs => "/jobs".to_string(),
        }
    }

    /// Parses a path produced by [`Route::path`].
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let route = match path.trim_end_matches('/') {
            "" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/home" => Self::Home,
            "/search" => Self::Search(SearchFilters::from_query_string(query)),
            "/profile" => Self::Profile,
            "/jobs" => Self::Jobs,
            other => {
                let id = other.strip_prefix("/articles/")?.parse().ok()?;
                Self::Article(ArticleId(id))
            }
        };
        Some(route)
    }

    /// Window/header title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Root | Self::Home => "Home",
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::ForgotPassword => "Reset password",
            Self::Search(_) => "Search",
            Self::Article(_) => "Article",
            Self::Profile => "Profile",
            Self::Jobs => "Jobs",
        }
    }
}

/// Where a navigation to `route` actually lands.
///
/// Root goes to Home or Login; signed-in users skip the guest screens;
/// guests hitting a protected screen land on Login.
#[must_use]
pub fn resolve(route: Route, authenticated: bool) -> Route {
    match route {
        Route::Root if authenticated => Route::Home,
        Route::Root => Route::Login,
        r if r.is_guest_only() && authenticated => Route::Home,
        r if r.is_protected() && !authenticated => Route::Login,
        r => r,
    }
}

//! User preference records.

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "en".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Stored preferences that drive the personalized feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Selected category slugs.
    #[serde(default)]
    pub preferred_categories: Vec<String>,
    /// Selected source slugs.
    #[serde(default)]
    pub preferred_sources: Vec<String>,
    /// Followed authors.
    #[serde(default)]
    pub preferred_authors: Vec<String>,
    /// Interface language.
    #[serde(default = "default_language")]
    pub language: String,
    /// IANA timezone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Whether digest emails are wanted.
    #[serde(default)]
    pub email_notifications: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            preferred_categories: Vec::new(),
            preferred_sources: Vec::new(),
            preferred_authors: Vec::new(),
            language: default_language(),
            timezone: default_timezone(),
            email_notifications: false,
        }
    }
}

/// Body of `PUT /user/preferences`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferencesUpdate {
    /// Replacement category list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_categories: Option<Vec<String>>,
    /// Replacement source list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_sources: Option<Vec<String>>,
    /// Replacement author list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_authors: Option<Vec<String>>,
    /// New language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// New timezone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// New notification flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
}

impl PreferencesUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.preferred_categories.is_none()
            && self.preferred_sources.is_none()
            && self.preferred_authors.is_none()
            && self.language.is_none()
            && self.timezone.is_none()
            && self.email_notifications.is_none()
    }
}

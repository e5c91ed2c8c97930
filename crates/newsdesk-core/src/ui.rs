//! Local UI state: theme mode and transient notifications.

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::LocalStore;

/// How long a notification stays visible by default.
pub const AUTO_HIDE_AFTER: Duration = Duration::from_secs(5);

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light appearance.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

impl ThemeMode {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Returns true for dark mode.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Unknown theme mode: {other}")),
        }
    }
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// An action succeeded.
    Success,
    /// Something needs attention.
    Warning,
    /// An action failed.
    Error,
}

/// A toast shown on top of the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier used for dismissal.
    pub id: u64,
    /// Severity.
    pub severity: Severity,
    /// Text.
    pub message: String,
    /// When it disappears on its own.
    pub expires_at: Instant,
}

/// Ordered list of visible notifications.
#[derive(Debug, Clone)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
    auto_hide: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(AUTO_HIDE_AFTER)
    }
}

impl Notifications {
    /// Empty list with the given auto-hide delay.
    #[must_use]
    pub const fn new(auto_hide: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            auto_hide,
        }
    }

    /// Adds an auto-hiding notification and returns its id.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) -> u64 {
        let expires_at = now + self.auto_hide;
        self.insert(severity, message.into(), expires_at)
    }

    fn insert(&mut self, severity: Severity, message: String, expires_at: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            severity,
            message,
            expires_at,
        });
        id
    }

    /// Removes a notification by id.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    /// Drops expired notifications. Returns true if any were removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at > now);
        self.items.len() != before
    }

    /// Visible notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// Returns true if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Theme plus notifications, with the theme persisted.
#[derive(Debug, Clone)]
pub struct UiStore {
    store: LocalStore,
    theme: ThemeMode,
    /// Visible notifications.
    pub notifications: Notifications,
}

impl UiStore {
    /// Loads the persisted theme (light if unset).
    #[must_use]
    pub fn load(store: LocalStore) -> Self {
        let theme = store.theme().unwrap_or_default();
        Self {
            store,
            theme,
            notifications: Notifications::default(),
        }
    }

    /// Current theme.
    #[must_use]
    pub const fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// Sets and persists the theme. A failed write keeps the in-memory value.
    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
        if let Err(e) = self.store.set_theme(theme) {
            warn!("Failed to persist theme: {e}");
        }
    }

    /// Flips between light and dark, returning the new mode.
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.set_theme(self.theme.toggled());
        self.theme
    }
}

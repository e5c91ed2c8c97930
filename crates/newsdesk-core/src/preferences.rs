//! Local editing copy of user preferences.

use newsdesk_api::{PreferencesUpdate, UserPreferences};

fn same_set(a: &[String], b: &[String]) -> bool {
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

fn toggle(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
    } else {
        list.push(value.to_string());
    }
}

/// Preferences being edited, compared against the last saved copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesDraft {
    saved: UserPreferences,
    draft: UserPreferences,
}

impl PreferencesDraft {
    /// Starts editing `saved`.
    #[must_use]
    pub fn new(saved: UserPreferences) -> Self {
        Self {
            draft: saved.clone(),
            saved,
        }
    }

    /// Values as edited.
    #[must_use]
    pub const fn current(&self) -> &UserPreferences {
        &self.draft
    }

    /// Values as last saved.
    #[must_use]
    pub const fn saved(&self) -> &UserPreferences {
        &self.saved
    }

    /// Adds or removes a category slug.
    pub fn toggle_category(&mut self, slug: &str) {
        toggle(&mut self.draft.preferred_categories, slug);
    }

    /// Adds or removes a source slug.
    pub fn toggle_source(&mut self, slug: &str) {
        toggle(&mut self.draft.preferred_sources, slug);
    }

    /// Follows an author. Blank names and duplicates are ignored.
    ///
    /// Returns true if the author was added.
    pub fn add_author(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty()
            || self
                .draft
                .preferred_authors
                .iter()
                .any(|a| a.eq_ignore_ascii_case(name))
        {
            return false;
        }
        self.draft.preferred_authors.push(name.to_string());
        true
    }

    /// Unfollows an author.
    pub fn remove_author(&mut self, name: &str) {
        self.draft.preferred_authors.retain(|a| a != name);
    }

    /// Sets the language.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.draft.language = language.into();
    }

    /// Sets the timezone.
    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        self.draft.timezone = timezone.into();
    }

    /// Sets the digest email flag.
    pub const fn set_email_notifications(&mut self, enabled: bool) {
        self.draft.email_notifications = enabled;
    }

    /// Returns true if the draft differs from the saved copy.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.to_update().is_empty()
    }

    /// Discards edits.
    pub fn reset(&mut self) {
        self.draft = self.saved.clone();
    }

    /// Update containing only the changed fields.
    #[must_use]
    pub fn to_update(&self) -> PreferencesUpdate {
        let (saved, draft) = (&self.saved, &self.draft);
        PreferencesUpdate {
            preferred_categories: (!same_set(
                &saved.preferred_categories,
                &draft.preferred_categories,
            ))
            .then(|| draft.preferred_categories.clone()),
            preferred_sources: (!same_set(&saved.preferred_sources, &draft.preferred_sources))
                .then(|| draft.preferred_sources.clone()),
            preferred_authors: (!same_set(&saved.preferred_authors, &draft.preferred_authors))
                .then(|| draft.preferred_authors.clone()),
            language: (saved.language != draft.language).then(|| draft.language.clone()),
            timezone: (saved.timezone != draft.timezone).then(|| draft.timezone.clone()),
            email_notifications: (saved.email_notifications != draft.email_notifications)
                .then_some(draft.email_notifications),
        }
    }

    /// Adopts the backend's copy after a successful save.
    pub fn mark_saved(&mut self, saved: UserPreferences) {
        self.draft = saved.clone();
        self.saved = saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved() -> UserPreferences {
        UserPreferences {
            preferred_categories: vec!["technology".to_string(), "science".to_string()],
            ..UserPreferences::default()
        }
    }

    #[test]
    fn test_fresh_draft_is_clean() {
        let draft = PreferencesDraft::new(saved());
        assert!(!draft.is_dirty());
        assert_eq!(draft.to_update(), PreferencesUpdate::default());
    }

    #[test]
    fn test_toggle_back_is_clean() {
        let mut draft = PreferencesDraft::new(saved());
        draft.toggle_category("technology");
        assert!(draft.is_dirty());
        draft.toggle_category("technology");
        // Order changed, membership did not.
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_update_carries_only_changes() {
        let mut draft = PreferencesDraft::new(saved());
        draft.toggle_source("bbc-news");
        draft.set_email_notifications(true);
        let update = draft.to_update();
        assert_eq!(update.preferred_sources, Some(vec!["bbc-news".to_string()]));
        assert_eq!(update.email_notifications, Some(true));
        assert!(update.preferred_categories.is_none());
        assert!(update.language.is_none());
    }

    #[test]
    fn test_authors() {
        let mut draft = PreferencesDraft::new(UserPreferences::default());
        assert!(draft.add_author(" Jane Doe "));
        assert!(!draft.add_author("jane doe"));
        assert!(!draft.add_author("  "));
        assert_eq!(draft.current().preferred_authors, vec!["Jane Doe"]);
        draft.remove_author("Jane Doe");
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_reset_and_mark_saved() {
        let mut draft = PreferencesDraft::new(saved());
        draft.set_language("fr");
        draft.reset();
        assert_eq!(draft.current().language, "en");

        draft.set_timezone("Europe/Paris");
        let stored = draft.current().clone();
        draft.mark_saved(stored);
        assert!(!draft.is_dirty());
        assert_eq!(draft.saved().timezone, "Europe/Paris");
    }
}

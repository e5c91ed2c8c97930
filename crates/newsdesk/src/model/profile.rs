//! Profile screen: preference editing.

use newsdesk_api::UserPreferences;
use newsdesk_core::PreferencesDraft;

use super::Failure;

/// Preferences as loaded, plus the editor around them.
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    /// `None` until the first load finishes.
    pub draft: Option<PreferencesDraft>,
    /// Author name being typed.
    pub author_input: String,
    pub is_loading: bool,
    pub is_saving: bool,
    pub error: Option<String>,
}

impl ProfileState {
    /// Replaces the draft with freshly loaded preferences.
    pub fn loaded(&mut self, result: Result<UserPreferences, Failure>) {
        self.is_loading = false;
        match result {
            Ok(saved) => {
                self.draft = Some(PreferencesDraft::new(saved));
                self.error = None;
            }
            Err(failure) => self.error = Some(failure.message),
        }
    }

    /// Adds the typed author, clearing the input when accepted.
    pub fn add_author(&mut self) {
        if let Some(draft) = self.draft.as_mut()
            && draft.add_author(&self.author_input)
        {
            self.author_input.clear();
        }
    }

    /// Save is offered only with unsaved edits and no save running.
    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.is_saving && self.draft.as_ref().is_some_and(PreferencesDraft::is_dirty)
    }

    /// Records the result of a save. Edits survive a failed save.
    pub fn saved(&mut self, result: Result<UserPreferences, Failure>) {
        self.is_saving = false;
        match result {
            Ok(saved) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.mark_saved(saved);
                } else {
                    self.draft = Some(PreferencesDraft::new(saved));
                }
                self.error = None;
            }
            Err(failure) => self.error = Some(failure.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_gate() {
        let mut profile = ProfileState::default();
        assert!(!profile.can_save());

        profile.loaded(Ok(UserPreferences::default()));
        assert!(!profile.can_save());

        profile.author_input = "Jane Doe".to_string();
        profile.add_author();
        assert!(profile.author_input.is_empty());
        assert!(profile.can_save());

        profile.is_saving = true;
        assert!(!profile.can_save());
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let mut profile = ProfileState::default();
        profile.loaded(Ok(UserPreferences::default()));
        if let Some(draft) = profile.draft.as_mut() {
            draft.set_language("de");
        }
        profile.is_saving = true;
        profile.saved(Err(Failure {
            message: "Server error".to_string(),
            ..Failure::default()
        }));
        assert!(profile.can_save());
        assert_eq!(profile.error.as_deref(), Some("Server error"));
    }
}

//! Article lists: the home feed and search results.

use std::fmt;

use newsdesk_api::{Article, Category, Paginated, Source};
use newsdesk_core::{FeedMode, FilterChange, SearchFilters, SearchForm, SearchFormError};

use super::Failure;

/// One article list and the request that produced it.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub mode: FeedMode,
    pub filters: SearchFilters,
    pub results: Option<Paginated<Article>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl FeedState {
    /// Empty list for `mode` with no filters.
    #[must_use]
    pub fn new(mode: FeedMode) -> Self {
        Self {
            mode,
            filters: SearchFilters::default(),
            results: None,
            is_loading: false,
            error: None,
        }
    }

    /// Starts loading `filters` in `mode`.
    pub fn begin(&mut self, mode: FeedMode, filters: SearchFilters) {
        self.mode = mode;
        self.filters = filters;
        self.is_loading = true;
        self.error = None;
    }

    /// Stores a response if it answers the current request.
    ///
    /// Returns false for a response that arrived after the filters moved on.
    pub fn accept(
        &mut self,
        mode: FeedMode,
        filters: &SearchFilters,
        result: Result<Paginated<Article>, Failure>,
    ) -> bool {
        if mode != self.mode || *filters != self.filters {
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(page) => {
                self.results = Some(page);
                self.error = None;
            }
            Err(failure) => self.error = Some(failure.message),
        }
        true
    }

    /// Articles on the current page.
    #[must_use]
    pub fn articles(&self) -> &[Article] {
        self.results.as_ref().map_or(&[], |page| page.data.as_slice())
    }
}

/// Search screen: filters, the text form and the result list.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub form: SearchForm,
    pub form_error: Option<SearchFormError>,
    pub feed: FeedState,
    /// Hint banner closed by this user.
    pub alert_dismissed: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            form: SearchForm::default(),
            form_error: None,
            feed: FeedState::new(FeedMode::Search),
            alert_dismissed: false,
        }
    }
}

impl SearchState {
    /// Filters currently applied.
    #[must_use]
    pub const fn filters(&self) -> &SearchFilters {
        &self.feed.filters
    }

    /// Filters after applying the text form, or the form error.
    pub fn submitted(&mut self) -> Option<SearchFilters> {
        match self.form.submit(self.filters()) {
            Ok(filters) => {
                self.form_error = None;
                Some(filters)
            }
            Err(error) => {
                self.form_error = Some(error);
                None
            }
        }
    }

    /// Filters after a picker or pager change.
    #[must_use]
    pub fn changed(&self, change: FilterChange) -> SearchFilters {
        self.filters().clone().with(change)
    }

    /// Syncs the text form with filters arriving from elsewhere.
    pub fn show(&mut self, filters: &SearchFilters) {
        self.form = SearchForm::from_filters(filters);
        self.form_error = None;
    }
}

/// Entry in a category or source picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub slug: Option<String>,
    pub label: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Categories and sources offered by the backend.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub sources: Vec<Source>,
    pub is_loaded: bool,
}

impl Catalog {
    /// Category picker entries, led by "All categories".
    #[must_use]
    pub fn category_choices(&self) -> Vec<Choice> {
        choices(
            "All categories",
            self.categories.iter().map(|c| (&c.slug, &c.name)),
        )
    }

    /// Source picker entries, led by "All sources".
    #[must_use]
    pub fn source_choices(&self) -> Vec<Choice> {
        choices("All sources", self.sources.iter().map(|s| (&s.slug, &s.name)))
    }

    /// Picker entry matching `slug`.
    #[must_use]
    pub fn selected(choices: &[Choice], slug: Option<&str>) -> Option<Choice> {
        choices
            .iter()
            .find(|choice| choice.slug.as_deref() == slug)
            .cloned()
    }
}

fn choices<'a>(
    all: &str,
    entries: impl Iterator<Item = (&'a String, &'a String)>,
) -> Vec<Choice> {
    std::iter::once(Choice {
        slug: None,
        label: all.to_string(),
    })
    .chain(entries.map(|(slug, name)| Choice {
        slug: Some(slug.clone()),
        label: name.clone(),
    }))
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(title: &str) -> Paginated<Article> {
        serde_json::from_value(serde_json::json!({
            "data": [{"id": 1, "title": title, "url": "https://example.com/1"}],
            "current_page": 1, "last_page": 1, "per_page": 15, "total": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut feed = FeedState::new(FeedMode::Latest);
        let first = SearchFilters::default();
        let second = first.clone().with(FilterChange::Page(2));

        feed.begin(FeedMode::Latest, first.clone());
        feed.begin(FeedMode::Latest, second.clone());
        assert!(!feed.accept(FeedMode::Latest, &first, Ok(page("old"))));
        assert!(feed.is_loading);

        assert!(feed.accept(FeedMode::Latest, &second, Ok(page("new"))));
        assert!(!feed.is_loading);
        assert_eq!(feed.articles()[0].title, "new");
    }

    #[test]
    fn test_failure_keeps_previous_results() {
        let mut feed = FeedState::new(FeedMode::Search);
        let filters = SearchFilters::default();
        feed.begin(FeedMode::Search, filters.clone());
        feed.accept(FeedMode::Search, &filters, Ok(page("kept")));
        feed.begin(FeedMode::Search, filters.clone());
        feed.accept(
            FeedMode::Search,
            &filters,
            Err(Failure {
                message: "Network error".to_string(),
                ..Failure::default()
            }),
        );
        assert_eq!(feed.error.as_deref(), Some("Network error"));
        assert_eq!(feed.articles().len(), 1);
    }

    #[test]
    fn test_search_form_error_is_kept() {
        let mut search = SearchState::default();
        search.form.date_from = "yesterday".to_string();
        assert!(search.submitted().is_none());
        assert_eq!(search.form_error, Some(SearchFormError::InvalidDateFrom));

        search.form.date_from = "2025-01-01".to_string();
        search.form.keyword = "rust".to_string();
        let filters = search.submitted().unwrap();
        assert_eq!(filters.keyword.as_deref(), Some("rust"));
        assert!(search.form_error.is_none());
    }

    #[test]
    fn test_choices_lead_with_all() {
        let catalog = Catalog {
            categories: serde_json::from_value(serde_json::json!([
                {"id": 1, "name": "Technology", "slug": "technology"}
            ]))
            .unwrap(),
            ..Catalog::default()
        };
        let choices = catalog.category_choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].to_string(), "All categories");
        assert_eq!(
            Catalog::selected(&choices, Some("technology")).map(|c| c.label),
            Some("Technology".to_string())
        );
        assert_eq!(Catalog::selected(&choices, None), Some(choices[0].clone()));
    }
}

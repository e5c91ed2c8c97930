//! Search filter composition.
//!
//! [`SearchFilters`] is the single source of truth for what the article list
//! shows. It round-trips through a URL-style query string so a search can be
//! linked from elsewhere (a finished job, for instance).

use chrono::NaiveDate;
use newsdesk_api::{ArticleQuery, JobFilters};
use url::form_urlencoded;

/// Date format used in query strings and form inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters applied to the article list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchFilters {
    /// Free-text keyword.
    pub keyword: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Source slug.
    pub source: Option<String>,
    /// Inclusive lower publication date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper publication date.
    pub date_to: Option<NaiveDate>,
    /// 1-based page.
    pub page: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            keyword: None,
            category: None,
            source: None,
            date_from: None,
            date_to: None,
            page: 1,
        }
    }
}

/// One edit to the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Replace the keyword.
    Keyword(Option<String>),
    /// Replace the category.
    Category(Option<String>),
    /// Replace the source.
    Source(Option<String>),
    /// Replace the lower date bound.
    DateFrom(Option<NaiveDate>),
    /// Replace the upper date bound.
    DateTo(Option<NaiveDate>),
    /// Go to another page.
    Page(u32),
    /// Drop every filter.
    Clear,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

impl SearchFilters {
    /// Returns true if any filter other than the page is set.
    #[must_use]
    pub const fn has_filters(&self) -> bool {
        self.keyword.is_some()
            || self.category.is_some()
            || self.source.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
    }

    /// Applies one change. Anything but a page change returns to page 1.
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Page(page) => {
                self.page = page.max(1);
                return;
            }
            FilterChange::Keyword(keyword) => self.keyword = non_empty(keyword),
            FilterChange::Category(category) => self.category = non_empty(category),
            FilterChange::Source(source) => self.source = non_empty(source),
            FilterChange::DateFrom(date) => self.date_from = date,
            FilterChange::DateTo(date) => self.date_to = date,
            FilterChange::Clear => *self = Self::default(),
        }
        self.page = 1;
    }

    /// Returns a copy with `change` applied.
    #[must_use]
    pub fn with(mut self, change: FilterChange) -> Self {
        self.apply(change);
        self
    }

    /// Encodes as `keyword=..&category=..&page=..`. Page 1 is omitted.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(keyword) = &self.keyword {
            serializer.append_pair("keyword", keyword);
        }
        if let Some(category) = &self.category {
            serializer.append_pair("category", category);
        }
        if let Some(source) = &self.source {
            serializer.append_pair("source", source);
        }
        if let Some(date) = self.date_from {
            serializer.append_pair("date_from", &date.format(DATE_FORMAT).to_string());
        }
        if let Some(date) = self.date_to {
            serializer.append_pair("date_to", &date.format(DATE_FORMAT).to_string());
        }
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        serializer.finish()
    }

    /// Decodes a query string. Unknown keys, blank values, malformed dates
    /// and malformed pages are ignored.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "keyword" => filters.keyword = non_empty(Some(value)),
                "category" => filters.category = non_empty(Some(value)),
                "source" => filters.source = non_empty(Some(value)),
                "date_from" => filters.date_from = parse_date(&value),
                "date_to" => filters.date_to = parse_date(&value),
                "page" => {
                    filters.page = value.trim().parse().ok().filter(|p| *p >= 1).unwrap_or(1);
                }
                _ => {}
            }
        }
        filters
    }

    /// Backend query for these filters.
    #[must_use]
    pub fn to_article_query(&self) -> ArticleQuery {
        ArticleQuery {
            keyword: self.keyword.clone(),
            category: self.category.clone(),
            source: self.source.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
            page: Some(self.page),
            per_page: None,
        }
    }

    /// Human-readable description of the active filters.
    #[must_use]
    pub fn describe(&self) -> String {
        JobFilters::from(self).summary()
    }
}

impl From<&JobFilters> for SearchFilters {
    fn from(filters: &JobFilters) -> Self {
        Self {
            keyword: non_empty(filters.keyword.clone()),
            category: non_empty(filters.category.clone()),
            source: non_empty(filters.source.clone()),
            date_from: filters.date_from,
            date_to: filters.date_to,
            page: 1,
        }
    }
}

impl From<&SearchFilters> for JobFilters {
    fn from(filters: &SearchFilters) -> Self {
        Self {
            keyword: filters.keyword.clone(),
            category: filters.category.clone(),
            source: filters.source.clone(),
            date_from: filters.date_from,
            date_to: filters.date_to,
        }
    }
}

/// Why a search form could not be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFormError {
    /// Lower date is not `YYYY-MM-DD`.
    InvalidDateFrom,
    /// Upper date is not `YYYY-MM-DD`.
    InvalidDateTo,
    /// Lower date is after the upper date.
    InvertedRange,
}

impl SearchFormError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidDateFrom => "Start date must be YYYY-MM-DD",
            Self::InvalidDateTo => "End date must be YYYY-MM-DD",
            Self::InvertedRange => "Start date must be before end date",
        }
    }
}

impl std::fmt::Display for SearchFormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SearchFormError {}

/// Text inputs of the search form, edited locally until submitted.
///
/// Category and source pickers bypass the form and change the filters
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    /// Keyword input.
    pub keyword: String,
    /// Lower date input.
    pub date_from: String,
    /// Upper date input.
    pub date_to: String,
}

impl SearchForm {
    /// Form pre-filled from the current filters.
    #[must_use]
    pub fn from_filters(filters: &SearchFilters) -> Self {
        let format = |date: Option<NaiveDate>| {
            date.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        Self {
            keyword: filters.keyword.clone().unwrap_or_default(),
            date_from: format(filters.date_from),
            date_to: format(filters.date_to),
        }
    }

    /// Merges the form into `current`, returning the new filters on page 1.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is malformed or the range is inverted.
    pub fn submit(&self, current: &SearchFilters) -> Result<SearchFilters, SearchFormError> {
        let date_from = Self::parse_optional(&self.date_from, SearchFormError::InvalidDateFrom)?;
        let date_to = Self::parse_optional(&self.date_to, SearchFormError::InvalidDateTo)?;
        if let (Some(from), Some(to)) = (date_from, date_to)
            && from > to
        {
            return Err(SearchFormError::InvertedRange);
        }

        let mut filters = current.clone();
        filters.apply(FilterChange::Keyword(Some(self.keyword.clone())));
        filters.apply(FilterChange::DateFrom(date_from));
        filters.apply(FilterChange::DateTo(date_to));
        Ok(filters)
    }

    fn parse_optional(
        value: &str,
        error: SearchFormError,
    ) -> Result<Option<NaiveDate>, SearchFormError> {
        if value.trim().is_empty() {
            Ok(None)
        } else {
            parse_date(value).map(Some).ok_or(error)
        }
    }
}

/// Which article list the home screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedMode {
    /// Feed built from the user's saved preferences.
    Personalized,
    /// Filtered search results.
    Search,
    /// Unfiltered latest articles.
    Latest,
}

impl FeedMode {
    /// Personalized only for signed-in users with no explicit filters.
    #[must_use]
    pub const fn select(authenticated: bool, filters: &SearchFilters) -> Self {
        if filters.has_filters() {
            Self::Search
        } else if authenticated {
            Self::Personalized
        } else {
            Self::Latest
        }
    }

    /// Heading for the list.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Personalized => "Your feed",
            Self::Search => "Search results",
            Self::Latest => "Latest news",
        }
    }
}

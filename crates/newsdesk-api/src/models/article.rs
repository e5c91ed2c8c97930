//! Articles and their taxonomy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Backend article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A news category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL-safe key used in filters and preferences.
    pub slug: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A news source (publisher or feed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL-safe key used in filters and preferences.
    pub slug: String,
    /// Homepage of the source.
    #[serde(default)]
    pub url: Option<String>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A scraped article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier.
    pub id: ArticleId,
    /// Headline.
    pub title: String,
    /// Short summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Full body (HTML).
    #[serde(default)]
    pub content: Option<String>,
    /// Link to the original article.
    pub url: String,
    /// Lead image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Byline.
    #[serde(default)]
    pub author: Option<String>,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Originating source.
    #[serde(default)]
    pub source: Option<Source>,
    /// Category.
    #[serde(default)]
    pub category: Option<Category>,
}

/// Query string for the article list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleQuery {
    /// Free-text keyword.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Category slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Source slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Inclusive lower publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    /// 1-based page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ArticleQuery {
    /// Query for a single page with no filters.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Returns true if any explicit filter (not paging) is set.
    #[must_use]
    pub const fn has_filters(&self) -> bool {
        self.keyword.is_some()
            || self.category.is_some()
            || self.source.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserialization() {
        let json = r#"{
            "id": 42,
            "title": "Rust 2024 ships",
            "url": "https://example.com/rust",
            "published_at": "2025-02-20T10:00:00.000000Z",
            "source": {"id": 1, "name": "The Guardian", "slug": "the-guardian"},
            "category": {"id": 3, "name": "Technology", "slug": "technology"}
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.id, ArticleId(42));
        assert_eq!(article.source.unwrap().slug, "the-guardian");
        assert!(article.published_at.is_some());
        assert!(article.content.is_none());
    }

    #[test]
    fn test_query_skips_unset_fields() {
        let query = ArticleQuery {
            keyword: Some("rust".to_string()),
            date_from: NaiveDate::from_ymd_opt(2025, 1, 31),
            page: Some(2),
            ..ArticleQuery::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"keyword": "rust", "date_from": "2025-01-31", "page": 2})
        );
        assert!(query.has_filters());
        assert!(!ArticleQuery::page(3).has_filters());
    }
}

//! Single article view.

use iced::widget::markdown;
use newsdesk_api::{Article, ArticleId};
use tracing::warn;

use super::Failure;

/// The article being read, with its body parsed for rendering.
#[derive(Debug, Clone)]
pub struct ArticleState {
    pub id: ArticleId,
    pub article: Option<Article>,
    pub body: Vec<markdown::Item>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ArticleState {
    /// Starts loading `id`.
    #[must_use]
    pub const fn loading(id: ArticleId) -> Self {
        Self {
            id,
            article: None,
            body: Vec::new(),
            is_loading: true,
            error: None,
        }
    }

    /// Stores the loaded article, ignoring one for another id.
    pub fn accept(&mut self, id: ArticleId, result: Result<Article, Failure>) {
        if id != self.id {
            return;
        }
        self.is_loading = false;
        match result {
            Ok(article) => {
                self.body = markdown::parse(&body_markdown(&article)).collect();
                self.article = Some(article);
                self.error = None;
            }
            Err(failure) => self.error = Some(failure.message),
        }
    }
}

/// Article body as Markdown, converted from the stored HTML.
///
/// Falls back to the summary when there is no body or it cannot be
/// converted.
#[must_use]
pub fn body_markdown(article: &Article) -> String {
    let converted = article
        .content
        .as_deref()
        .filter(|html| !html.trim().is_empty())
        .and_then(|html| match htmd::convert(html) {
            Ok(md) => Some(md),
            Err(e) => {
                warn!("Failed to convert article {} body: {e}", article.id);
                None
            }
        })
        .filter(|md| !md.trim().is_empty());

    converted
        .or_else(|| article.description.clone())
        .unwrap_or_default()
}

/// "By Jane Doe · BBC News · 3 Mar 2025" with missing parts left out.
#[must_use]
pub fn byline(article: &Article) -> String {
    let mut parts = Vec::new();
    if let Some(author) = article.author.as_deref().filter(|a| !a.is_empty()) {
        parts.push(format!("By {author}"));
    }
    if let Some(source) = &article.source {
        parts.push(source.name.clone());
    }
    if let Some(published) = article.published_at {
        parts.push(published.format("%-d %b %Y").to_string());
    }
    parts.join(" · ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn article(content: Option<&str>, description: Option<&str>) -> Article {
        Article {
            id: ArticleId(4),
            title: "Title".to_string(),
            description: description.map(str::to_string),
            content: content.map(str::to_string),
            url: "https://example.com/4".to_string(),
            image_url: None,
            author: None,
            published_at: None,
            source: None,
            category: None,
        }
    }

    #[test]
    fn test_html_body_becomes_markdown() {
        let md = body_markdown(&article(Some("<p>Hello <strong>world</strong></p>"), None));
        assert!(md.contains("**world**"));
        assert!(!md.contains("<p>"));
    }

    #[test]
    fn test_missing_body_falls_back_to_summary() {
        assert_eq!(body_markdown(&article(None, Some("Summary"))), "Summary");
        assert_eq!(body_markdown(&article(Some("  "), Some("Summary"))), "Summary");
        assert_eq!(body_markdown(&article(None, None)), "");
    }

    #[test]
    fn test_byline() {
        let mut a = article(None, None);
        assert_eq!(byline(&a), "");
        a.author = Some("Jane Doe".to_string());
        a.published_at = Some("2025-03-03T10:00:00Z".parse().unwrap());
        assert_eq!(byline(&a), "By Jane Doe · 3 Mar 2025");
    }

    #[test]
    fn test_response_for_other_article_is_ignored() {
        let mut state = ArticleState::loading(ArticleId(1));
        state.accept(ArticleId(2), Ok(article(None, Some("x"))));
        assert!(state.is_loading);
        state.accept(ArticleId(1), Err(Failure::default()));
        assert!(!state.is_loading);
        assert!(state.article.is_none());
    }
}

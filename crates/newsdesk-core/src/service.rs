//! Cached queries and invalidating mutations over the backend.

use chrono::{DateTime, Utc};
use newsdesk_api::{
    ApiClient, Article, ArticleId, ArticleQuery, Category, Job, JobFilters, JobId,
    NewJobRequest, Paginated, PreferencesUpdate, Source, UserId, UserPreferences,
};
use tracing::{debug, info};

use crate::cache::{FetchPolicy, QueryCache, QueryKey, Tag};
use crate::credits::{CreditLedger, CreditRecord};
use crate::error::Result;
use crate::search::{FeedMode, SearchFilters};

/// Credits one scraping job costs.
pub const JOB_COST: u32 = 1;

/// Result of submitting a scraping job.
#[derive(Debug, Clone)]
pub struct SubmittedJob {
    /// The queued job.
    pub job: Job,
    /// Credit balance after the deduction.
    pub credits: CreditRecord,
}

/// Backend access for screens: cached reads plus mutations that invalidate
/// the reads they affect.
///
/// Clones share the cache.
#[derive(Debug, Clone)]
pub struct NewsService {
    client: ApiClient,
    cache: QueryCache,
    credits: CreditLedger,
}

impl NewsService {
    /// Creates a service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache, credits: CreditLedger) -> Self {
        Self {
            client,
            cache,
            credits,
        }
    }

    /// Shared cache.
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Credit ledger.
    #[must_use]
    pub const fn credits(&self) -> &CreditLedger {
        &self.credits
    }

    /// `GET /articles`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn articles(
        &self,
        filters: &SearchFilters,
        policy: FetchPolicy,
    ) -> Result<Paginated<Article>> {
        let query = filters.to_article_query();
        self.cached_list("articles", query, policy).await
    }

    /// `GET /articles/search`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn search_articles(
        &self,
        filters: &SearchFilters,
        policy: FetchPolicy,
    ) -> Result<Paginated<Article>> {
        let query = filters.to_article_query();
        self.cached_list("articles/search", query, policy).await
    }

    /// `GET /articles/personalized`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn personalized_articles(
        &self,
        page: u32,
        policy: FetchPolicy,
    ) -> Result<Paginated<Article>> {
        self.cached_list("articles/personalized", ArticleQuery::page(page), policy)
            .await
    }

    async fn cached_list(
        &self,
        endpoint: &'static str,
        query: ArticleQuery,
        policy: FetchPolicy,
    ) -> Result<Paginated<Article>> {
        let key = QueryKey::with_params(endpoint, &query);
        self.cache
            .fetch(key, &[Tag::Articles], policy, || async {
                let page = match endpoint {
                    "articles/search" => self.client.search_articles(&query).await?,
                    "articles/personalized" => {
                        self.client
                            .personalized_articles(query.page.unwrap_or(1))
                            .await?
                    }
                    _ => self.client.articles(&query).await?,
                };
                Ok(page)
            })
            .await
    }

    /// The list the home screen shows for `mode`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn feed(
        &self,
        mode: FeedMode,
        filters: &SearchFilters,
        policy: FetchPolicy,
    ) -> Result<Paginated<Article>> {
        match mode {
            FeedMode::Personalized => self.personalized_articles(filters.page, policy).await,
            FeedMode::Search => self.search_articles(filters, policy).await,
            FeedMode::Latest => self.articles(filters, policy).await,
        }
    }

    /// `GET /articles/{id}`.
    ///
    /// # Errors
    ///
    /// Returns the backend error (not found included) on a miss that fails.
    pub async fn article(&self, id: ArticleId, policy: FetchPolicy) -> Result<Article> {
        let key = QueryKey::new(format!("articles/{id}"));
        self.cache
            .fetch(key, &[Tag::Article(id)], policy, || async {
                Ok(self.client.article(id).await?)
            })
            .await
    }

    /// `GET /categories`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn categories(&self, policy: FetchPolicy) -> Result<Vec<Category>> {
        self.cache
            .fetch(
                QueryKey::new("categories"),
                &[Tag::Categories],
                policy,
                || async { Ok(self.client.categories().await?) },
            )
            .await
    }

    /// `GET /sources`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn sources(&self, policy: FetchPolicy) -> Result<Vec<Source>> {
        self.cache
            .fetch(QueryKey::new("sources"), &[Tag::Sources], policy, || async {
                Ok(self.client.sources().await?)
            })
            .await
    }

    /// `GET /user/preferences`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn preferences(&self, policy: FetchPolicy) -> Result<UserPreferences> {
        self.cache
            .fetch(
                QueryKey::new("user/preferences"),
                &[Tag::Preferences],
                policy,
                || async { Ok(self.client.preferences().await?) },
            )
            .await
    }

    /// `GET /queue/jobs`.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a miss that fails.
    pub async fn jobs(&self, policy: FetchPolicy) -> Result<Vec<Job>> {
        self.cache
            .fetch(QueryKey::new("queue/jobs"), &[Tag::Jobs], policy, || async {
                Ok(self.client.jobs().await?)
            })
            .await
    }

    /// Saves preferences; the personalized feed depends on them, so article
    /// lists are invalidated too.
    ///
    /// # Errors
    ///
    /// Returns the backend error; nothing is invalidated on failure.
    pub async fn update_preferences(&self, update: &PreferencesUpdate) -> Result<UserPreferences> {
        let saved = self.client.update_preferences(update).await?;
        info!("Preferences saved");
        self.cache
            .invalidate(&[Tag::Preferences, Tag::Articles])
            .await;
        Ok(saved)
    }

    /// Cancels a queued job.
    ///
    /// # Errors
    ///
    /// Returns the backend error; nothing is invalidated on failure.
    pub async fn cancel_job(&self, id: JobId) -> Result<Option<String>> {
        let message = self.client.cancel_job(id).await?;
        self.cache.invalidate(&[Tag::Jobs]).await;
        Ok(message)
    }

    /// Re-queues a failed job.
    ///
    /// # Errors
    ///
    /// Returns the backend error; nothing is invalidated on failure.
    pub async fn retry_job(&self, id: JobId) -> Result<Option<String>> {
        let message = self.client.retry_job(id).await?;
        self.cache.invalidate(&[Tag::Jobs]).await;
        Ok(message)
    }

    /// Queues a scraping job for `filters`, spending [`JOB_COST`] credits.
    ///
    /// Credits are deducted before the call and not refunded if it fails.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InsufficientCredits`] without calling the
    /// backend when the balance is too low, otherwise the backend error.
    pub async fn submit_job(
        &self,
        user_id: UserId,
        filters: JobFilters,
        now: DateTime<Utc>,
    ) -> Result<SubmittedJob> {
        let credits = self.credits.deduct(user_id, JOB_COST, now)?;
        debug!("Submitting job for user {user_id}");
        let job = self
            .client
            .submit_job(&NewJobRequest::scrape(filters))
            .await?;
        self.cache.invalidate(&[Tag::Jobs]).await;
        Ok(SubmittedJob { job, credits })
    }

    /// Drops all cached data (on sign-out).
    pub async fn reset(&self) {
        self.cache.clear().await;
    }
}

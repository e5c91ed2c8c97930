//! Typed backend endpoints.

use tracing::info;

use crate::client::ApiClient;
use crate::envelope::{Acknowledgement, ApiResponse, Paginated};
use crate::error::Result;
use crate::models::{
    Article, ArticleId, ArticleQuery, AuthPayload, Category, ForgotPasswordRequest, Job, JobId,
    LoginRequest, NewJobRequest, PreferencesUpdate, RegisterRequest, Source, User,
    UserPreferences,
};

impl ApiClient {
    /// `POST /login`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the call fails.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload> {
        info!("Logging in as {}", request.email);
        self.post::<_, ApiResponse<AuthPayload>>("login", request)
            .await?
            .into_data()
    }

    /// `POST /register`.
    ///
    /// # Errors
    ///
    /// Returns an error (422 with field errors for invalid input) if registration fails.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload> {
        info!("Registering {}", request.email);
        self.post::<_, ApiResponse<AuthPayload>>("register", request)
            .await?
            .into_data()
    }

    /// `POST /logout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn logout(&self) -> Result<()> {
        let body = self
            .post::<_, Option<Acknowledgement>>("logout", &serde_json::json!({}))
            .await?;
        Acknowledgement::from_body(body).map(|_| ())
    }

    /// `GET /user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the call fails.
    pub async fn current_user(&self) -> Result<User> {
        self.get::<ApiResponse<User>>("user").await?.into_data()
    }

    /// `POST /forgot-password`. Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<Option<String>> {
        let body = self
            .post::<_, Option<Acknowledgement>>("forgot-password", request)
            .await?;
        Acknowledgement::from_body(body)
    }

    /// `GET /articles`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn articles(&self, query: &ArticleQuery) -> Result<Paginated<Article>> {
        self.get_with_query("articles", query).await
    }

    /// `GET /articles/search`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn search_articles(&self, query: &ArticleQuery) -> Result<Paginated<Article>> {
        self.get_with_query("articles/search", query).await
    }

    /// `GET /articles/personalized`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the user is not authenticated.
    pub async fn personalized_articles(&self, page: u32) -> Result<Paginated<Article>> {
        self.get_with_query("articles/personalized", &ArticleQuery::page(page))
            .await
    }

    /// `GET /articles/{id}`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown ids, or any call failure.
    pub async fn article(&self, id: ArticleId) -> Result<Article> {
        self.get::<ApiResponse<Article>>(&format!("articles/{id}"))
            .await?
            .into_data()
    }

    /// `GET /categories`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.get::<ApiResponse<Vec<Category>>>("categories")
            .await?
            .into_data()
    }

    /// `GET /sources`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn sources(&self) -> Result<Vec<Source>> {
        self.get::<ApiResponse<Vec<Source>>>("sources")
            .await?
            .into_data()
    }

    /// `GET /user/preferences`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn preferences(&self) -> Result<UserPreferences> {
        self.get::<ApiResponse<UserPreferences>>("user/preferences")
            .await?
            .into_data()
    }

    /// `PUT /user/preferences`. Returns the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns an error (422 for invalid values) if the update fails.
    pub async fn update_preferences(&self, update: &PreferencesUpdate) -> Result<UserPreferences> {
        self.put::<_, ApiResponse<UserPreferences>>("user/preferences", update)
            .await?
            .into_data()
    }

    /// `GET /queue/jobs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn jobs(&self) -> Result<Vec<Job>> {
        self.get::<ApiResponse<Vec<Job>>>("queue/jobs")
            .await?
            .into_data()
    }

    /// `POST /queue/jobs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the job or the call fails.
    pub async fn submit_job(&self, request: &NewJobRequest) -> Result<Job> {
        info!("Submitting {} job: {}", request.job_type, request.filters.summary());
        self.post::<_, ApiResponse<Job>>("queue/jobs", request)
            .await?
            .into_data()
    }

    /// `POST /queue/jobs/{id}/cancel`.
    ///
    /// # Errors
    ///
    /// Returns an error if the job cannot be cancelled or the call fails.
    pub async fn cancel_job(&self, id: JobId) -> Result<Option<String>> {
        info!("Cancelling job {id}");
        let body = self
            .post::<_, Option<Acknowledgement>>(
                &format!("queue/jobs/{id}/cancel"),
                &serde_json::json!({}),
            )
            .await?;
        Acknowledgement::from_body(body)
    }

    /// `POST /queue/jobs/{id}/retry`.
    ///
    /// # Errors
    ///
    /// Returns an error if the job cannot be retried or the call fails.
    pub async fn retry_job(&self, id: JobId) -> Result<Option<String>> {
        info!("Retrying job {id}");
        let body = self
            .post::<_, Option<Acknowledgement>>(
                &format!("queue/jobs/{id}/retry"),
                &serde_json::json!({}),
            )
            .await?;
        Acknowledgement::from_body(body)
    }
}

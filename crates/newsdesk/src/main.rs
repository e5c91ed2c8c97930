//! `newsdesk` - desktop reader for the newsdesk aggregation backend.
//!
//! Built with Rust and the iced GUI framework.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod message;
mod model;
mod style;
mod view;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{column, container, row, stack, text};
use iced::{Element, Length, Subscription, Task};
use newsdesk_api::{ApiClient, ArticleId, JobFilters, JobId};
use newsdesk_core::{
    ApiConfig, CreditLedger, FeedMode, FetchPolicy, FilterChange, LocalStore, NewsService,
    QueryCache, RefreshSchedule, Route, SearchFilters, SessionManager, SessionState, Severity,
    Tag, UiStore, resolve, view_target,
};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use message::{
    AuthMessage, FeedTarget, JobsMessage, KeyboardAction, Message, ProfileMessage, SearchMessage,
};
use model::{
    ArticleState, Catalog, Failure, FeedState, ForgotPasswordForm, JobsState, LoginForm,
    ProfileState, RegisterForm, SearchState,
};

/// Housekeeping period for toast expiry and token expiry.
const TICK: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "newsdesk=debug,newsdesk_core=debug,newsdesk_api=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting newsdesk");

    let services = Services::bootstrap()?;
    info!("Using API at {}", services.config.api_url);
    let start = start_route(std::env::args().nth(1).as_deref());

    iced::application(
        move || Newsdesk::new(services.clone(), start.clone()),
        Newsdesk::update,
        Newsdesk::view,
    )
    .title("newsdesk")
    .subscription(Newsdesk::subscription)
    .run()?;

    Ok(())
}

/// Screen to open once the session is known, from an optional path argument
/// such as `/search?keyword=rust`.
fn start_route(arg: Option<&str>) -> Route {
    match arg {
        None => Route::Root,
        Some(path) => Route::parse(path).unwrap_or_else(|| {
            warn!("Ignoring unknown start path {path}");
            Route::Root
        }),
    }
}

/// Long-lived handles shared by every task.
#[derive(Clone)]
struct Services {
    config: ApiConfig,
    store: LocalStore,
    session: SessionManager,
    news: NewsService,
}

impl Services {
    fn bootstrap() -> anyhow::Result<Self> {
        let config = ApiConfig::from_env().context("Failed to read NEWSDESK_* configuration")?;
        let store = LocalStore::open_default();
        let client = ApiClient::new(config.api_url.clone())
            .context("Invalid NEWSDESK_API_URL")?
            .with_session(Arc::new(store.clone()));

        let session = SessionManager::new(client.clone(), store.clone(), config.session_policy);
        let news = NewsService::new(
            client,
            QueryCache::default(),
            CreditLedger::new(store.clone()),
        );

        Ok(Self {
            config,
            store,
            session,
            news,
        })
    }
}

/// Main application state.
struct Newsdesk {
    services: Services,
    /// Current screen.
    route: Route,
    /// Where Back returns to from an article.
    back_to: Route,
    /// Requested first screen, consumed after session restore.
    start: Route,
    /// Snapshot of the session for rendering.
    session: SessionState,
    ui: UiStore,
    login: LoginForm,
    register: RegisterForm,
    forgot: ForgotPasswordForm,
    home: FeedState,
    search: SearchState,
    catalog: Catalog,
    article: Option<ArticleState>,
    profile: ProfileState,
    jobs: JobsState,
}

impl Newsdesk {
    /// Create the app and start restoring the session.
    fn new(services: Services, start: Route) -> (Self, Task<Message>) {
        let ui = UiStore::load(services.store.clone());
        style::widgets::set_theme(ui.theme());

        let session = services.session.clone();
        let restore = Task::perform(
            async move { session.initialize().await },
            Message::SessionRestored,
        );

        let app = Self {
            services,
            route: Route::Root,
            back_to: Route::Home,
            start,
            session: SessionState::Uninitialized,
            ui,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            forgot: ForgotPasswordForm::default(),
            home: FeedState::new(FeedMode::Latest),
            search: SearchState::default(),
            catalog: Catalog::default(),
            article: None,
            profile: ProfileState::default(),
            jobs: JobsState::default(),
        };
        let catalog = app.load_catalog(FetchPolicy::CacheFirst);
        (app, Task::batch([restore, catalog]))
    }

    fn user_id(&self) -> Option<newsdesk_api::UserId> {
        self.session.user().map(|user| user.id)
    }

    fn toast(&mut self, severity: Severity, message: impl Into<String>) {
        self.ui
            .notifications
            .push(severity, message, Instant::now());
    }

    /// Handle state changes.
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => return self.navigate(route),
            Message::SessionRestored(state) => {
                info!(
                    "Session restored: {}",
                    if state.is_authenticated() {
                        "signed in"
                    } else {
                        "guest"
                    }
                );
                self.session = state;
                self.refresh_credits();
                let start = std::mem::replace(&mut self.start, Route::Root);
                let mut tasks = vec![self.navigate(start)];
                if self.session.is_authenticated() {
                    tasks.push(self.load_jobs(FetchPolicy::Refetch));
                }
                return Task::batch(tasks);
            }
            Message::Auth(msg) => return self.handle_auth(msg),
            Message::SignedIn(result) => return self.handle_signed_in(result),
            Message::ResetRequested(result) => self.forgot.finish(result),
            Message::Logout => {
                let session = self.services.session.clone();
                let news = self.services.news.clone();
                return Task::perform(
                    async move {
                        let state = session.logout().await;
                        news.reset().await;
                        state
                    },
                    Message::LoggedOut,
                );
            }
            Message::LoggedOut(state) => {
                self.session = state;
                self.clear_user_state();
                self.toast(Severity::Info, "Signed out");
                return self.navigate(Route::Login);
            }
            Message::FeedLoaded(target, mode, filters, result) => {
                let failure = result.as_ref().err().cloned();
                let feed = match target {
                    FeedTarget::Home => &mut self.home,
                    FeedTarget::Search => &mut self.search.feed,
                };
                if !feed.accept(mode, &filters, result) {
                    debug!("Dropping stale {mode:?} response for {}", filters.to_query_string());
                    return Task::none();
                }
                if let Some(failure) = failure {
                    return self.fail(&failure);
                }
            }
            Message::CatalogLoaded(result) => match result {
                Ok((categories, sources)) => {
                    self.catalog = Catalog {
                        categories,
                        sources,
                        is_loaded: true,
                    };
                }
                Err(failure) => {
                    warn!("Failed to load categories and sources: {}", failure.message);
                }
            },
            Message::ArticleLoaded(id, result) => {
                let failure = result.as_ref().err().cloned();
                if let Some(article) = self.article.as_mut() {
                    article.accept(id, result);
                }
                if let Some(failure) = failure {
                    return self.fail(&failure);
                }
            }
            Message::OpenUrl(url) => self.open_url(&url),
            Message::LinkClicked(uri) => self.open_url(&uri.to_string()),
            Message::FeedPage(page) => {
                let filters = self.home.filters.clone().with(FilterChange::Page(page));
                return self.load_home(filters, FetchPolicy::CacheFirst);
            }
            Message::Search(msg) => return self.handle_search(msg),
            Message::Profile(msg) => return self.handle_profile(msg),
            Message::PreferencesLoaded(result) => {
                let failure = result.as_ref().err().cloned();
                self.profile.loaded(result);
                if let Some(failure) = failure {
                    return self.fail(&failure);
                }
            }
            Message::PreferencesSaved(result) => {
                let failure = result.as_ref().err().cloned();
                self.profile.saved(result);
                match failure {
                    None => self.toast(Severity::Success, "Preferences saved"),
                    Some(failure) => {
                        self.toast(Severity::Error, failure.message.clone());
                        return self.fail(&failure);
                    }
                }
            }
            Message::Jobs(msg) => return self.handle_jobs(msg),
            Message::JobsLoaded(result) => return self.handle_jobs_loaded(result),
            Message::JobActionFinished(id, result) => {
                self.jobs.pending.remove(&id);
                match result {
                    Ok(message) => {
                        self.toast(
                            Severity::Success,
                            message.unwrap_or_else(|| format!("Job {id} updated")),
                        );
                        return self.load_jobs(FetchPolicy::Refetch);
                    }
                    Err(failure) => {
                        self.toast(Severity::Error, failure.message.clone());
                        return self.fail(&failure);
                    }
                }
            }
            Message::JobSubmitted(result) => {
                self.jobs.is_submitting = false;
                match result {
                    Ok(submitted) => {
                        self.jobs.credits = Some(submitted.credits);
                        self.toast(
                            Severity::Success,
                            format!("Scrape queued: {}", submitted.job.filters.summary()),
                        );
                        return self.load_jobs(FetchPolicy::Refetch);
                    }
                    Err(failure) => {
                        // The credit was spent even though the backend refused.
                        self.refresh_credits();
                        self.toast(Severity::Error, failure.message.clone());
                        return self.fail(&failure);
                    }
                }
            }
            Message::Notified(result) => {
                if let Err(e) = result {
                    warn!("Desktop notification failed: {e}");
                }
            }
            Message::ToggleTheme => {
                let mode = self.ui.toggle_theme();
                style::widgets::set_theme(mode);
            }
            Message::DismissToast(id) => self.ui.notifications.dismiss(id),
            Message::Tick(now) => {
                self.ui.notifications.prune(now);
                if self.session.is_authenticated() && self.services.session.expire_if_due(Utc::now())
                {
                    return self.signed_out("Your session expired. Please sign in again.");
                }
            }
            Message::KeyPressed(action) => return self.handle_keyboard_action(action),
            Message::Ignored => {}
        }
        Task::none()
    }

    /// Moves to `route` after the access rules, loading what it shows.
    fn navigate(&mut self, route: Route) -> Task<Message> {
        let route = resolve(route, self.session.is_authenticated());
        if matches!(route, Route::Article(_)) && !matches!(self.route, Route::Article(_)) {
            self.back_to = self.route.clone();
        }
        debug!("Navigating to {}", route.path());
        self.route = route.clone();
        self.load_route(&route, FetchPolicy::CacheFirst)
    }

    fn load_route(&mut self, route: &Route, policy: FetchPolicy) -> Task<Message> {
        match route {
            Route::Home => self.load_home(self.home.filters.clone(), policy),
            Route::Search(filters) => {
                self.search.show(filters);
                self.search.alert_dismissed = self
                    .user_id()
                    .is_some_and(|id| self.services.store.search_alert_dismissed(id));
                let catalog = if self.catalog.is_loaded {
                    Task::none()
                } else {
                    self.load_catalog(policy)
                };
                Task::batch([self.load_search(filters.clone(), policy), catalog])
            }
            Route::Article(id) => self.load_article(*id, policy),
            Route::Profile => {
                self.refresh_credits();
                self.profile.is_loading = true;
                let news = self.services.news.clone();
                let preferences = Task::perform(
                    async move { news.preferences(policy).await.map_err(Failure::from) },
                    Message::PreferencesLoaded,
                );
                Task::batch([preferences, self.load_catalog(policy)])
            }
            Route::Jobs => {
                self.refresh_credits();
                self.load_jobs(policy)
            }
            Route::Root | Route::Login | Route::Register | Route::ForgotPassword => Task::none(),
        }
    }

    fn load_home(&mut self, filters: SearchFilters, policy: FetchPolicy) -> Task<Message> {
        let mode = FeedMode::select(self.session.is_authenticated(), &filters);
        self.home.begin(mode, filters.clone());
        self.fetch_feed(FeedTarget::Home, mode, filters, policy)
    }

    fn load_search(&mut self, filters: SearchFilters, policy: FetchPolicy) -> Task<Message> {
        // The search screen never shows the personalized feed.
        let mode = FeedMode::select(false, &filters);
        self.search.feed.begin(mode, filters.clone());
        self.fetch_feed(FeedTarget::Search, mode, filters, policy)
    }

    fn fetch_feed(
        &self,
        target: FeedTarget,
        mode: FeedMode,
        filters: SearchFilters,
        policy: FetchPolicy,
    ) -> Task<Message> {
        let news = self.services.news.clone();
        Task::perform(
            async move {
                let result = news
                    .feed(mode, &filters, policy)
                    .await
                    .map_err(Failure::from);
                (mode, filters, result)
            },
            move |(mode, filters, result)| Message::FeedLoaded(target, mode, filters, result),
        )
    }

    fn load_article(&mut self, id: ArticleId, policy: FetchPolicy) -> Task<Message> {
        self.article = Some(ArticleState::loading(id));
        let news = self.services.news.clone();
        Task::perform(
            async move { news.article(id, policy).await.map_err(Failure::from) },
            move |result| Message::ArticleLoaded(id, result),
        )
    }

    fn load_catalog(&self, policy: FetchPolicy) -> Task<Message> {
        let news = self.services.news.clone();
        Task::perform(
            async move {
                tokio::try_join!(news.categories(policy), news.sources(policy))
                    .map_err(Failure::from)
            },
            Message::CatalogLoaded,
        )
    }

    fn load_jobs(&mut self, policy: FetchPolicy) -> Task<Message> {
        if !self.session.is_authenticated() {
            return Task::none();
        }
        self.jobs.is_loading = true;
        let news = self.services.news.clone();
        Task::perform(
            async move { news.jobs(policy).await.map_err(Failure::from) },
            Message::JobsLoaded,
        )
    }

    /// Re-reads the local credit balance of the signed-in user.
    fn refresh_credits(&mut self) {
        self.jobs.credits = self.user_id().and_then(|id| {
            self.services
                .news
                .credits()
                .record(id, Utc::now())
                .map_err(|e| warn!("Failed to read credits: {e}"))
                .ok()
        });
    }

    /// Signs out locally if the backend rejected the session.
    fn fail(&mut self, failure: &Failure) -> Task<Message> {
        if failure.unauthorized && self.session.is_authenticated() {
            self.services.session.handle_unauthorized();
            return self.signed_out("Your session has ended. Please sign in again.");
        }
        Task::none()
    }

    fn signed_out(&mut self, notice: &str) -> Task<Message> {
        warn!("Signed out: {notice}");
        self.session = SessionState::Guest;
        self.clear_user_state();
        self.toast(Severity::Warning, notice);
        let news = self.services.news.clone();
        let reset = Task::perform(async move { news.reset().await }, |()| Message::Ignored);
        Task::batch([reset, self.navigate(Route::Login)])
    }

    fn clear_user_state(&mut self) {
        self.jobs.reset();
        self.profile = ProfileState::default();
        self.home = FeedState::new(FeedMode::Latest);
        self.article = None;
        self.back_to = Route::Home;
    }

    fn open_url(&mut self, url: &str) {
        info!("Opening {url}");
        if let Err(e) = opener::open(url) {
            error!("Failed to open {url}: {e}");
            self.toast(Severity::Error, format!("Could not open the link: {e}"));
        }
    }

    /// Handle sign-in, registration and reset form messages.
    fn handle_auth(&mut self, msg: AuthMessage) -> Task<Message> {
        match msg {
            AuthMessage::LoginEmailChanged(v) => self.login.email = v,
            AuthMessage::LoginPasswordChanged(v) => self.login.password = v,
            AuthMessage::SubmitLogin => {
                if self.login.begin_submit() {
                    let session = self.services.session.clone();
                    let email = self.login.email.trim().to_string();
                    let password = self.login.password.clone();
                    return Task::perform(
                        async move {
                            session
                                .login(&email, &password)
                                .await
                                .map_err(Failure::from)
                        },
                        Message::SignedIn,
                    );
                }
            }
            AuthMessage::RegisterNameChanged(v) => self.register.name = v,
            AuthMessage::RegisterEmailChanged(v) => self.register.email = v,
            AuthMessage::RegisterPasswordChanged(v) => self.register.password = v,
            AuthMessage::RegisterConfirmationChanged(v) => self.register.password_confirmation = v,
            AuthMessage::SubmitRegister => {
                if let Some(registration) = self.register.begin_submit() {
                    let session = self.services.session.clone();
                    return Task::perform(
                        async move {
                            session
                                .register(&registration)
                                .await
                                .map_err(Failure::from)
                        },
                        Message::SignedIn,
                    );
                }
            }
            AuthMessage::ForgotEmailChanged(v) => self.forgot.email = v,
            AuthMessage::SubmitForgot => {
                if self.forgot.begin_submit() {
                    let session = self.services.session.clone();
                    let email = self.forgot.email.trim().to_string();
                    return Task::perform(
                        async move {
                            session
                                .forgot_password(&email)
                                .await
                                .map_err(Failure::from)
                        },
                        Message::ResetRequested,
                    );
                }
            }
        }
        Task::none()
    }

    fn handle_signed_in(&mut self, result: model::Outcome<newsdesk_api::User>) -> Task<Message> {
        match result {
            Ok(user) => {
                info!("Signed in as user {}", user.id);
                self.session = self.services.session.state();
                self.login = LoginForm::default();
                self.register = RegisterForm::default();
                self.home = FeedState::new(FeedMode::Personalized);
                self.refresh_credits();
                self.toast(Severity::Success, format!("Welcome, {}", user.name));
                let jobs = self.load_jobs(FetchPolicy::Refetch);
                Task::batch([self.navigate(Route::Home), jobs])
            }
            Err(failure) => {
                if self.register.is_submitting {
                    self.register.fail(failure);
                } else {
                    self.login.fail(failure);
                }
                Task::none()
            }
        }
    }

    /// Handle search screen messages.
    fn handle_search(&mut self, msg: SearchMessage) -> Task<Message> {
        match msg {
            SearchMessage::KeywordChanged(v) => self.search.form.keyword = v,
            SearchMessage::DateFromChanged(v) => self.search.form.date_from = v,
            SearchMessage::DateToChanged(v) => self.search.form.date_to = v,
            SearchMessage::Submit => {
                if let Some(filters) = self.search.submitted() {
                    return self.navigate(Route::Search(filters));
                }
            }
            SearchMessage::CategorySelected(slug) => {
                let filters = self.search.changed(FilterChange::Category(slug));
                return self.navigate(Route::Search(filters));
            }
            SearchMessage::SourceSelected(slug) => {
                let filters = self.search.changed(FilterChange::Source(slug));
                return self.navigate(Route::Search(filters));
            }
            SearchMessage::Page(page) => {
                let filters = self.search.changed(FilterChange::Page(page));
                return self.navigate(Route::Search(filters));
            }
            SearchMessage::Clear => {
                let filters = self.search.changed(FilterChange::Clear);
                return self.navigate(Route::Search(filters));
            }
            SearchMessage::DismissAlert => {
                self.search.alert_dismissed = true;
                if let Some(id) = self.user_id()
                    && let Err(e) = self.services.store.dismiss_search_alert(id)
                {
                    warn!("Failed to remember dismissed search alert: {e}");
                }
            }
        }
        Task::none()
    }

    /// Handle profile screen messages.
    fn handle_profile(&mut self, msg: ProfileMessage) -> Task<Message> {
        if let ProfileMessage::AuthorInputChanged(v) = msg {
            self.profile.author_input = v;
            return Task::none();
        }
        if let ProfileMessage::AddAuthor = msg {
            self.profile.add_author();
            return Task::none();
        }

        let Some(draft) = self.profile.draft.as_mut() else {
            return Task::none();
        };
        match msg {
            ProfileMessage::ToggleCategory(slug) => draft.toggle_category(&slug),
            ProfileMessage::ToggleSource(slug) => draft.toggle_source(&slug),
            ProfileMessage::RemoveAuthor(name) => draft.remove_author(&name),
            ProfileMessage::LanguageChanged(v) => draft.set_language(v),
            ProfileMessage::TimezoneChanged(v) => draft.set_timezone(v),
            ProfileMessage::EmailNotificationsToggled(on) => draft.set_email_notifications(on),
            ProfileMessage::Reset => draft.reset(),
            ProfileMessage::Save => {
                let update = draft.to_update();
                if update.is_empty() || self.profile.is_saving {
                    return Task::none();
                }
                self.profile.is_saving = true;
                let news = self.services.news.clone();
                return Task::perform(
                    async move { news.update_preferences(&update).await.map_err(Failure::from) },
                    Message::PreferencesSaved,
                );
            }
            ProfileMessage::AuthorInputChanged(_) | ProfileMessage::AddAuthor => {}
        }
        Task::none()
    }

    /// Handle jobs page and drawer messages.
    fn handle_jobs(&mut self, msg: JobsMessage) -> Task<Message> {
        match msg {
            JobsMessage::Refresh => return self.load_jobs(FetchPolicy::Refetch),
            JobsMessage::Poll => {
                if !self.jobs.is_loading {
                    return self.load_jobs(FetchPolicy::Refetch);
                }
            }
            JobsMessage::ToggleDrawer => {
                self.jobs.drawer_open = !self.jobs.drawer_open;
                if self.jobs.drawer_open {
                    return self.load_jobs(FetchPolicy::Refetch);
                }
            }
            JobsMessage::DrawerAutoRefresh(on) => self.jobs.drawer_auto_refresh = on,
            JobsMessage::PageAutoRefresh(on) => self.jobs.page_auto_refresh = on,
            JobsMessage::Cancel(id) => return self.job_action(id, false),
            JobsMessage::Retry(id) => return self.job_action(id, true),
            JobsMessage::View(filters) => return self.navigate(view_target(&filters)),
            JobsMessage::SubmitScrape => {
                let Some(user_id) = self.user_id() else {
                    return Task::none();
                };
                if self.jobs.is_submitting {
                    return Task::none();
                }
                let filters = match &self.route {
                    Route::Search(filters) => JobFilters::from(filters),
                    _ => JobFilters::default(),
                };
                self.jobs.is_submitting = true;
                let news = self.services.news.clone();
                return Task::perform(
                    async move {
                        news.submit_job(user_id, filters, Utc::now())
                            .await
                            .map_err(Failure::from)
                    },
                    Message::JobSubmitted,
                );
            }
        }
        Task::none()
    }

    fn job_action(&mut self, id: JobId, retry: bool) -> Task<Message> {
        if !self.jobs.pending.insert(id) {
            return Task::none();
        }
        let news = self.services.news.clone();
        Task::perform(
            async move {
                let result = if retry {
                    news.retry_job(id).await
                } else {
                    news.cancel_job(id).await
                };
                result.map_err(Failure::from)
            },
            move |result| Message::JobActionFinished(id, result),
        )
    }

    fn handle_jobs_loaded(&mut self, result: model::Outcome<Vec<newsdesk_api::Job>>) -> Task<Message> {
        let failure = result.as_ref().err().cloned();
        let transitions = self.jobs.loaded(result);
        if let Some(failure) = failure {
            return self.fail(&failure);
        }
        if transitions.is_empty() {
            return Task::none();
        }

        let mut tasks = Vec::new();
        let mut finished = false;
        for transition in &transitions {
            let summary = transition.summary();
            let severity = match transition.job.status {
                newsdesk_api::JobStatus::Completed => {
                    finished = true;
                    Severity::Success
                }
                newsdesk_api::JobStatus::Failed => Severity::Error,
                _ => Severity::Info,
            };
            self.toast(severity, summary.clone());
            tasks.push(notify_desktop(summary));
        }

        if finished {
            // Fresh articles may be in; drop cached lists.
            let news = self.services.news.clone();
            tasks.push(Task::perform(
                async move { news.cache().invalidate(&[Tag::Articles]).await },
                |_| Message::Ignored,
            ));
        }
        Task::batch(tasks)
    }

    /// Handle keyboard shortcut actions.
    fn handle_keyboard_action(&mut self, action: KeyboardAction) -> Task<Message> {
        let signed_in = self.session.is_authenticated();
        match action {
            KeyboardAction::Refresh => {
                let route = self.route.clone();
                let refresh = self.load_route(&route, FetchPolicy::Refetch);
                if matches!(route, Route::Home | Route::Search(_)) {
                    return Task::batch([refresh, self.load_catalog(FetchPolicy::Refetch)]);
                }
                return refresh;
            }
            KeyboardAction::Home => return self.navigate(Route::Home),
            KeyboardAction::Search => {
                let filters = self.search.filters().clone();
                return self.navigate(Route::Search(filters));
            }
            KeyboardAction::Jobs if signed_in => return self.navigate(Route::Jobs),
            KeyboardAction::ToggleDrawer if signed_in => {
                return self.handle_jobs(JobsMessage::ToggleDrawer);
            }
            KeyboardAction::ToggleTheme => return self.update(Message::ToggleTheme),
            KeyboardAction::Back => {
                if matches!(self.route, Route::Article(_)) {
                    let back = self.back_to.clone();
                    return self.navigate(back);
                }
            }
            KeyboardAction::Jobs | KeyboardAction::ToggleDrawer => {}
        }
        Task::none()
    }

    /// Render current state as UI.
    fn view(&self) -> Element<'_, Message> {
        let p = style::widgets::current();

        if matches!(self.session, SessionState::Uninitialized) {
            return container(text("Loading newsdesk...").size(16).color(p.text_secondary))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(style::widgets::page_style)
                .into();
        }

        let header = view::view_header(view::HeaderContext {
            route: &self.route,
            user: self.session.user(),
            theme: self.ui.theme(),
            active_jobs: self.jobs.monitor.active_count(),
            drawer_open: self.jobs.drawer_open,
        });

        let screen: Element<'_, Message> = match &self.route {
            Route::Root | Route::Home => view::view_home(&self.home),
            Route::Login => view::view_login(&self.login),
            Route::Register => view::view_register(&self.register),
            Route::ForgotPassword => view::view_forgot_password(&self.forgot),
            Route::Search(_) => view::view_search(
                &self.search,
                &self.catalog,
                self.session.is_authenticated(),
                self.jobs.credits.as_ref(),
                self.jobs.can_submit(),
            ),
            Route::Article(_) => match &self.article {
                Some(article) => view::view_article(article, self.ui.theme()),
                None => view::view_home(&self.home),
            },
            Route::Profile => view::view_profile(
                &self.profile,
                view::ProfileContext {
                    user: self.session.user(),
                    catalog: &self.catalog,
                    credits: self.jobs.credits.as_ref(),
                    theme: self.ui.theme(),
                    now: Utc::now(),
                },
            ),
            Route::Jobs => view::view_jobs_page(&self.jobs, Utc::now()),
        };

        let mut main = row![container(screen).width(Length::Fill)].height(Length::Fill);
        if self.drawer_visible() {
            main = main.push(container(view::view_jobs_drawer(&self.jobs)).padding(12));
        }

        let page = container(column![header, main])
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::widgets::page_style);

        let toasts = container(view::view_toasts(&self.ui.notifications))
            .padding(20)
            .align_right(Length::Fill)
            .align_bottom(Length::Fill);

        stack![page, toasts].into()
    }

    fn drawer_visible(&self) -> bool {
        self.session.is_authenticated() && self.jobs.drawer_open && self.route != Route::Jobs
    }

    fn job_schedule(&self) -> RefreshSchedule {
        self.jobs.poll_schedule(
            self.session.is_authenticated(),
            self.route == Route::Jobs,
            &self.services.config,
        )
    }

    /// Keyboard shortcuts, housekeeping ticks and job polling.
    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![keyboard::listen().map(|event| {
            if let keyboard::Event::KeyPressed { key, modifiers, .. } = event {
                handle_key_press(key, modifiers).unwrap_or(Message::Ignored)
            } else {
                Message::Ignored
            }
        })];

        if self.session.is_authenticated() || !self.ui.notifications.is_empty() {
            subscriptions.push(iced::time::every(TICK).map(Message::Tick));
        }

        let schedule = self.job_schedule();
        if schedule.is_active() {
            subscriptions.push(
                iced::time::every(schedule.interval).map(|_| Message::Jobs(JobsMessage::Poll)),
            );
        }

        Subscription::batch(subscriptions)
    }
}

/// Handle keyboard shortcuts and return appropriate message.
fn handle_key_press(key: Key, modifiers: Modifiers) -> Option<Message> {
    let ctrl = modifiers.command(); // Ctrl on Linux/Windows, Cmd on macOS
    let shift = modifiers.shift();

    let action = match key {
        Key::Named(keyboard::key::Named::F5) => KeyboardAction::Refresh,
        Key::Named(keyboard::key::Named::Escape) => KeyboardAction::Back,
        Key::Character(c) if ctrl => match (c.as_str(), shift) {
            ("r", false) => KeyboardAction::Refresh,
            ("h", false) => KeyboardAction::Home,
            ("f", false) => KeyboardAction::Search,
            ("j", false) => KeyboardAction::Jobs,
            ("j" | "J", true) => KeyboardAction::ToggleDrawer,
            ("l" | "L", true) => KeyboardAction::ToggleTheme,
            _ => return None,
        },
        _ => return None,
    };
    Some(Message::KeyPressed(action))
}

/// Shows a desktop notification without blocking the UI thread.
fn notify_desktop(body: String) -> Task<Message> {
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || {
                notify_rust::Notification::new()
                    .appname("newsdesk")
                    .summary("newsdesk")
                    .body(&body)
                    .show()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| e.to_string())?
        },
        Message::Notified,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_start_route_from_argument() {
        assert_eq!(start_route(None), Route::Root);
        assert_eq!(start_route(Some("/jobs")), Route::Jobs);
        assert_eq!(start_route(Some("/articles/12")), Route::Article(ArticleId(12)));
        assert_eq!(start_route(Some("--bogus")), Route::Root);

        match start_route(Some("/search?keyword=rust&page=2")) {
            Route::Search(filters) => {
                assert_eq!(filters.keyword.as_deref(), Some("rust"));
                assert_eq!(filters.page, 2);
            }
            other => panic!("unexpected route {other:?}"),
        }
    }

    #[test]
    fn test_shortcuts() {
        let ctrl = Modifiers::COMMAND;
        assert!(matches!(
            handle_key_press(Key::Character("j".into()), ctrl),
            Some(Message::KeyPressed(KeyboardAction::Jobs))
        ));
        assert!(matches!(
            handle_key_press(Key::Character("J".into()), ctrl | Modifiers::SHIFT),
            Some(Message::KeyPressed(KeyboardAction::ToggleDrawer))
        ));
        assert!(handle_key_press(Key::Character("j".into()), Modifiers::empty()).is_none());
    }
}

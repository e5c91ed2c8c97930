use std::sync::Arc;

use chrono::{Duration, Utc};
use newsdesk_api::token::unsigned_token;
use newsdesk_api::{ApiClient, User, UserId};
use newsdesk_core::storage::{TOKEN_KEY, USER_KEY};
use newsdesk_core::{
    LocalStore, MemoryStorage, Route, SessionManager, SessionPolicy, SessionState, Storage,
    resolve,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    storage: Arc<MemoryStorage>,
    store: LocalStore,
    session: SessionManager,
}

fn harness(server: &MockServer, policy: SessionPolicy) -> Harness {
    let storage = Arc::new(MemoryStorage::new());
    let store = LocalStore::new(storage.clone());
    let client = ApiClient::new(format!("{}/api", server.uri()))
        .unwrap()
        .with_session(Arc::new(store.clone()));
    let session = SessionManager::new(client, store.clone(), policy);
    Harness {
        storage,
        store,
        session,
    }
}

fn ada() -> User {
    User {
        id: UserId(1),
        name: "Ada".to_string(),
        email: "a@b.com".to_string(),
    }
}

#[tokio::test]
async fn login_then_logout_round_trip() {
    let server = MockServer::start().await;
    let token = unsigned_token((Utc::now() + Duration::hours(2)).timestamp());
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": token, "user": {"id": 1, "name": "Ada", "email": "a@b.com"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, SessionPolicy::TrustCached);
    assert_eq!(h.session.initialize().await, SessionState::Guest);

    let user = h.session.login("a@b.com", "secret1").await.unwrap();
    assert_eq!(user, ada());
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some(token.as_str()));
    assert!(h.storage.get(USER_KEY).is_some());
    assert_eq!(resolve(Route::Root, h.session.is_authenticated()), Route::Home);

    assert_eq!(h.session.logout().await, SessionState::Guest);
    assert!(h.storage.get(TOKEN_KEY).is_none());
    assert!(h.storage.get(USER_KEY).is_none());
    assert_eq!(resolve(Route::Root, h.session.is_authenticated()), Route::Login);
    assert_eq!(resolve(Route::Jobs, h.session.is_authenticated()), Route::Login);
}

#[tokio::test]
async fn failed_login_leaves_guest_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let h = harness(&server, SessionPolicy::TrustCached);
    h.session.initialize().await;
    let err = h.session.login("a@b.com", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!h.session.is_authenticated());
    assert!(h.store.token().is_none());
}

#[tokio::test]
async fn revalidation_replaces_cached_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 1, "name": "Ada Lovelace", "email": "a@b.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, SessionPolicy::Revalidate);
    let token = unsigned_token((Utc::now() + Duration::hours(2)).timestamp());
    h.store.save_session(&token, &ada()).unwrap();

    let state = h.session.initialize().await;
    assert_eq!(state.user().map(|u| u.name.as_str()), Some("Ada Lovelace"));
    assert_eq!(h.store.user().unwrap().name, "Ada Lovelace");
}

#[tokio::test]
async fn revalidation_rejected_token_signs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server, SessionPolicy::Revalidate);
    let token = unsigned_token((Utc::now() + Duration::hours(2)).timestamp());
    h.store.save_session(&token, &ada()).unwrap();

    assert_eq!(h.session.initialize().await, SessionState::Guest);
    assert!(h.store.token().is_none());
    assert!(h.store.user().is_none());
}

#[tokio::test]
async fn forgot_password_returns_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/forgot-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "We have emailed your password reset link."
        })))
        .mount(&server)
        .await;

    let h = harness(&server, SessionPolicy::TrustCached);
    let message = h.session.forgot_password("a@b.com").await.unwrap();
    assert_eq!(
        message.as_deref(),
        Some("We have emailed your password reset link.")
    );
}

use std::sync::{Arc, Mutex};

use newsdesk_api::{
    ApiClient, ArticleQuery, ErrorKind, JobId, JobStatus, LoginRequest, NETWORK_MESSAGE,
    SessionStore, UNAUTHORIZED_MESSAGE,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestSession {
    token: Mutex<Option<String>>,
    clears: Mutex<usize>,
}

impl TestSession {
    fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(Some(token.to_string())),
            clears: Mutex::new(0),
        })
    }

    fn clears(&self) -> usize {
        *self.clears.lock().unwrap()
    }
}

impl SessionStore for TestSession {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn clear(&self) {
        *self.token.lock().unwrap() = None;
        *self.clears.lock().unwrap() += 1;
    }
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(format!("{}/api", server.uri())).unwrap()
}

#[tokio::test]
async fn login_posts_credentials_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({"email": "a@b.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "token": "header.payload.sig",
                "user": {"id": 1, "name": "Ada", "email": "a@b.com"}
            }
        })))
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .login(&LoginRequest {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(payload.token, "header.payload.sig");
    assert_eq!(payload.user.name, "Ada");
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 7, "name": "Grace", "email": "g@h.io"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = TestSession::with_token("tok-123");
    let client = client_for(&server).with_session(session);
    let user = client.current_user().await.unwrap();
    assert_eq!(user.email, "g@h.io");
}

#[tokio::test]
async fn unauthorized_clears_session_and_substitutes_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/queue/jobs"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .mount(&server)
        .await;

    let session = TestSession::with_token("stale");
    let client = client_for(&server).with_session(session.clone());
    let err = client.jobs().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(err.message, UNAUTHORIZED_MESSAGE);
    assert_eq!(session.clears(), 1);
    assert!(session.token().is_none());
}

#[tokio::test]
async fn validation_errors_expose_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": {"email": ["The email field must be a valid email address."]}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login(&LoginRequest {
            email: "nope".to_string(),
            password: "x".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.status, Some(422));
    assert_eq!(
        err.field_error("email"),
        Some("The email field must be a valid email address.")
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = ApiClient::new("http://127.0.0.1:1/api").unwrap();
    let err = client.categories().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.message, NETWORK_MESSAGE);
}

#[tokio::test]
async fn logout_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client_for(&server).logout().await.unwrap();
}

#[tokio::test]
async fn job_actions_accept_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs/7/cancel"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs/8/retry"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.cancel_job(JobId(7)).await.unwrap(), None);
    assert_eq!(client.retry_job(JobId(8)).await.unwrap(), None);
}

#[tokio::test]
async fn forgot_password_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/forgot-password"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let request = newsdesk_api::ForgotPasswordRequest {
        email: "a@b.com".to_string(),
    };
    assert_eq!(client_for(&server).forgot_password(&request).await.unwrap(), None);
}

#[tokio::test]
async fn search_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/search"))
        .and(query_param("keyword", "rust"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "title": "Rust", "url": "https://example.com/1"}],
            "current_page": 2,
            "last_page": 3,
            "per_page": 1,
            "total": 3
        })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search_articles(&ArticleQuery {
            keyword: Some("rust".to_string()),
            page: Some(2),
            ..ArticleQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert!(page.has_next());
    assert!(page.has_prev());
}

#[tokio::test]
async fn job_actions_hit_queue_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs/5/cancel"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Job cancelled"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs/6/retry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "Job is not failed"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/queue/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": 5, "type": "scrape", "status": "cancelled",
                "created_at": "2025-03-01T08:00:00Z"
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let message = client.cancel_job(JobId(5)).await.unwrap();
    assert_eq!(message.as_deref(), Some("Job cancelled"));

    let err = client.retry_job(JobId(6)).await.unwrap_err();
    assert_eq!(err.message, "Job is not failed");

    let jobs = client.jobs().await.unwrap();
    assert_eq!(jobs[0].status, JobStatus::Cancelled);
}

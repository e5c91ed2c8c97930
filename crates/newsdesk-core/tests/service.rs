use std::time::Duration;

use chrono::Utc;
use newsdesk_api::{ApiClient, JobFilters, JobId, JobStatus, PreferencesUpdate, UserId};
use newsdesk_core::{
    CreditLedger, Error, FetchPolicy, LocalStore, NewsService, QueryCache, SearchFilters,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer, store: &LocalStore) -> NewsService {
    let client = ApiClient::new(format!("{}/api", server.uri())).unwrap();
    NewsService::new(client, QueryCache::default(), CreditLedger::new(store.clone()))
}

fn jobs_body() -> serde_json::Value {
    json!({
        "success": true,
        "data": [
            {"id": 1, "type": "scrape", "status": "queued", "created_at": "2025-03-01T08:00:00Z"},
            {"id": 2, "type": "scrape", "status": "failed", "created_at": "2025-03-01T07:00:00Z",
             "failed_at": "2025-03-01T07:05:00Z", "error_message": "timeout"}
        ]
    })
}

fn articles_body() -> serde_json::Value {
    json!({
        "data": [{"id": 1, "title": "Hello", "url": "https://example.com/1"}],
        "current_page": 1, "last_page": 1, "per_page": 15, "total": 1
    })
}

#[tokio::test]
async fn reads_are_cached_until_a_mutation_invalidates_them() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/queue/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs/1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service(&server, &LocalStore::in_memory());
    assert_eq!(svc.jobs(FetchPolicy::CacheFirst).await.unwrap().len(), 2);
    assert_eq!(svc.jobs(FetchPolicy::CacheFirst).await.unwrap().len(), 2);

    svc.cancel_job(JobId(1)).await.unwrap();
    svc.jobs(FetchPolicy::CacheFirst).await.unwrap();
}

#[tokio::test]
async fn poll_in_flight_during_cancel_does_not_hide_the_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/queue/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": [
                    {"id": 1, "type": "scrape", "status": "queued", "created_at": "2025-03-01T08:00:00Z"}
                ]}))
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/queue/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": [
            {"id": 1, "type": "scrape", "status": "cancelled", "created_at": "2025-03-01T08:00:00Z"}
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs/1/cancel"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service(&server, &LocalStore::in_memory());
    let poll = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.jobs(FetchPolicy::Refetch).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    svc.cancel_job(JobId(1)).await.unwrap();
    let late = poll.await.unwrap().unwrap();
    assert_eq!(late[0].status, JobStatus::Queued);

    let jobs = svc.jobs(FetchPolicy::CacheFirst).await.unwrap();
    assert_eq!(jobs[0].status, JobStatus::Cancelled);
}

#[tokio::test]
async fn saving_preferences_invalidates_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/personalized"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/user/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"preferred_categories": ["science"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service(&server, &LocalStore::in_memory());
    svc.personalized_articles(1, FetchPolicy::CacheFirst).await.unwrap();
    svc.categories(FetchPolicy::CacheFirst).await.unwrap();

    let saved = svc
        .update_preferences(&PreferencesUpdate {
            preferred_categories: Some(vec!["science".to_string()]),
            ..PreferencesUpdate::default()
        })
        .await
        .unwrap();
    assert_eq!(saved.preferred_categories, vec!["science"]);

    // Articles refetch, categories stay cached.
    svc.personalized_articles(1, FetchPolicy::CacheFirst).await.unwrap();
    svc.categories(FetchPolicy::CacheFirst).await.unwrap();
}

#[tokio::test]
async fn failed_mutation_keeps_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/queue/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs/2/retry"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let svc = service(&server, &LocalStore::in_memory());
    svc.jobs(FetchPolicy::CacheFirst).await.unwrap();
    let err = svc.retry_job(JobId(2)).await.unwrap_err();
    assert_eq!(err.api().and_then(|e| e.status), Some(500));
    svc.jobs(FetchPolicy::CacheFirst).await.unwrap();
}

#[tokio::test]
async fn submitting_a_job_spends_credits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"id": 7, "type": "scrape", "status": "queued",
                     "filters": {"keyword": "rust"}, "created_at": "2025-03-01T08:00:00Z"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = LocalStore::in_memory();
    let svc = service(&server, &store);
    let now = Utc::now();
    let filters = JobFilters::from(
        &SearchFilters::from_query_string("keyword=rust"),
    );
    let submitted = svc.submit_job(UserId(1), filters, now).await.unwrap();
    assert_eq!(submitted.job.id, JobId(7));
    assert_eq!(submitted.credits.remaining, 9);
    assert_eq!(store.credits(UserId(1)).unwrap().used_this_month, 1);
}

#[tokio::test]
async fn empty_balance_blocks_submission_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/queue/jobs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let store = LocalStore::in_memory();
    let client = ApiClient::new(format!("{}/api", server.uri())).unwrap();
    let svc = NewsService::new(client, QueryCache::default(), CreditLedger::with_max(store, 0));
    let err = svc
        .submit_job(UserId(1), JobFilters::default(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientCredits { remaining: 0, .. }));
}

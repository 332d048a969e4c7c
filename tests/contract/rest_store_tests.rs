//! PostgREST task store contract tests.
//!
//! Verify filter syntax, auth headers, and error mapping for the hosted
//! store client.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reminder_dispatch::clock::{civil_instant, CivilNow};
use reminder_dispatch::models::task::TaskId;
use reminder_dispatch::store::rest::RestTaskStore;
use reminder_dispatch::store::{StoreSettings, TaskStore};
use reminder_dispatch::AppError;

const TASKS_PATH: &str = "/rest/v1/tasks";

fn store(server: &MockServer) -> RestTaskStore {
    RestTaskStore::new(&StoreSettings {
        url: format!("{}/", server.uri()),
        key: "service-key".into(),
    })
}

fn nine_am() -> CivilNow {
    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    CivilNow::from_utc(civil_instant(date, 9, 0).unwrap())
}

#[tokio::test]
async fn fetch_due_sends_every_filter_and_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASKS_PATH))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .and(query_param("select", "*"))
        .and(query_param("due_date", "eq.2025-06-10"))
        .and(query_param("completed", "eq.false"))
        .and(query_param("reminder_sent_today", "eq.false"))
        .and(query_param("reminder_time", "not.is.null"))
        .and(query_param("reminder_time", "lte.09:00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 12,
                "task": "Pay rent",
                "due_date": "2025-06-10",
                "completed": false,
                "priority": "high",
                "category": "Finance",
                "reminder_time": "09:00:00",
                "reminder_sent_today": false
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = store(&server).fetch_due(nine_am()).await.expect("query");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::Number(12));
    assert_eq!(tasks[0].task, "Pay rent");
}

#[tokio::test]
async fn query_error_uses_postgrest_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "42P01",
            "message": "relation \"public.tasks\" does not exist",
            "details": null,
            "hint": null
        })))
        .mount(&server)
        .await;

    let err = store(&server).fetch_due(nine_am()).await.expect_err("404");

    match err {
        AppError::StoreQuery(msg) => assert_eq!(msg, "relation \"public.tasks\" does not exist"),
        other => panic!("expected StoreQuery, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_rows_are_query_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "x" }])))
        .mount(&server)
        .await;

    let err = store(&server).fetch_due(nine_am()).await.expect_err("bad rows");
    assert!(matches!(err, AppError::StoreQuery(msg) if msg.starts_with("invalid task rows")));
}

#[tokio::test]
async fn mark_notified_patches_single_row() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(TASKS_PATH))
        .and(query_param("id", "eq.12"))
        .and(header("prefer", "return=minimal"))
        .and(body_json(json!({ "reminder_sent_today": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .mark_notified(&TaskId::Number(12))
        .await
        .expect("patch");
}

#[tokio::test]
async fn mark_notified_failure_is_update_error() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "JWT expired"
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .mark_notified(&TaskId::from("abc"))
        .await
        .expect_err("401");
    assert!(matches!(err, AppError::Update(msg) if msg == "JWT expired"));
}

#[tokio::test]
async fn reset_patches_all_flagged_rows() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(TASKS_PATH))
        .and(query_param("reminder_sent_today", "eq.true"))
        .and(body_json(json!({ "reminder_sent_today": false })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).reset_notified().await.expect("reset");
}

#[tokio::test]
async fn reset_failure_is_reset_error() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = store(&server).reset_notified().await.expect_err("500");
    assert!(matches!(err, AppError::Reset(msg) if msg.contains("boom")));
}

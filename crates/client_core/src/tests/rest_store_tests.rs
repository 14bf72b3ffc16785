use super::*;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: &'static str,
    query: HashMap<String, String>,
    prefer: Option<String>,
    apikey: Option<String>,
    authorization: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    response: Value,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn record(
    state: &MockState,
    method: &'static str,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: Option<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().expect("lock").push(RecordedRequest {
        method,
        query,
        prefer: header(headers, "prefer"),
        apikey: header(headers, "apikey"),
        authorization: header(headers, "authorization"),
        body,
    });
    (state.status, Json(state.response.clone()))
}

async fn handle_select(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record(&state, "GET", query, &headers, None)
}

async fn handle_insert(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&state, "POST", query, &headers, Some(body))
}

async fn handle_update(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&state, "PATCH", query, &headers, Some(body))
}

async fn handle_delete(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> StatusCode {
    let (status, _) = record(&state, "DELETE", query, &headers, None);
    status
}

async fn spawn_store_server(
    status: StatusCode,
    response: Value,
) -> anyhow::Result<(String, Arc<Mutex<Vec<RecordedRequest>>>)> {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState {
        requests: requests.clone(),
        status,
        response,
    };

    let app = Router::new()
        .route(
            "/rest/v1/todos",
            get(handle_select)
                .post(handle_insert)
                .patch(handle_update)
                .delete(handle_delete),
        )
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{addr}"), requests))
}

fn only_request(requests: &Arc<Mutex<Vec<RecordedRequest>>>) -> RecordedRequest {
    let requests = requests.lock().expect("lock");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0].clone()
}

#[test]
fn builds_table_url_under_rest_prefix() {
    let store = RestRowStore::new("https://example.supabase.co/", "todos", None).expect("store");
    assert_eq!(
        store.table_url().as_str(),
        "https://example.supabase.co/rest/v1/todos"
    );

    let proxied = RestRowStore::new("http://localhost:8000/proxy", "tasks", None).expect("store");
    assert_eq!(
        proxied.table_url().as_str(),
        "http://localhost:8000/proxy/rest/v1/tasks"
    );
}

#[test]
fn from_settings_requires_store_url() {
    let err = RestRowStore::from_settings(&StoreSettings::default())
        .err()
        .expect("must fail without url");
    assert!(err.to_string().contains("no store url"));
}

#[tokio::test]
async fn select_all_orders_by_created_at_descending() {
    let (url, requests) = spawn_store_server(
        StatusCode::OK,
        json!([
            {"id": 2, "text": "second", "completed": true, "created_at": "2024-01-02T00:00:00+00:00"},
            {"id": 1, "text": "first", "completed": false, "created_at": "2024-01-01T00:00:00+00:00"}
        ]),
    )
    .await
    .expect("spawn server");
    let store = RestRowStore::new(&url, "todos", None).expect("store");

    let rows = store.select_all().await.expect("select");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, TodoId(2));
    assert!(rows[0].completed);
    let request = only_request(&requests);
    assert_eq!(request.method, "GET");
    assert_eq!(request.query.get("select").map(String::as_str), Some("*"));
    assert_eq!(
        request.query.get("order").map(String::as_str),
        Some("created_at.desc")
    );
    assert!(request.apikey.is_none());
    assert!(request.authorization.is_none());
}

#[tokio::test]
async fn insert_posts_single_row_and_asks_for_representation() {
    let (url, requests) = spawn_store_server(
        StatusCode::CREATED,
        json!([{"id": 5, "text": "buy milk", "completed": false}]),
    )
    .await
    .expect("spawn server");
    let store = RestRowStore::new(&url, "todos", Some("anon-key".into())).expect("store");

    let rows = store.insert(NewTodo::new("buy milk")).await.expect("insert");

    assert_eq!(rows, vec![Todo::new(5, "buy milk", false)]);
    let request = only_request(&requests);
    assert_eq!(request.method, "POST");
    assert_eq!(request.body, Some(json!([{"text": "buy milk"}])));
    assert_eq!(request.prefer.as_deref(), Some("return=representation"));
    assert_eq!(request.apikey.as_deref(), Some("anon-key"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer anon-key"));
}

#[tokio::test]
async fn insert_accepts_rows_with_timestamps_lacking_an_offset() {
    let (url, requests) = spawn_store_server(
        StatusCode::CREATED,
        json!([{"id": 6, "text": "walk dog", "completed": false, "created_at": "2024-01-01T00:00:00.123456"}]),
    )
    .await
    .expect("spawn server");
    let store = RestRowStore::new(&url, "todos", None).expect("store");

    let rows = store.insert(NewTodo::new("walk dog")).await.expect("insert");

    assert_eq!(rows, vec![Todo::new(6, "walk dog", false)]);
    assert_eq!(only_request(&requests).method, "POST");
}

#[tokio::test]
async fn update_filters_by_id_and_sends_patch() {
    let (url, requests) = spawn_store_server(
        StatusCode::OK,
        json!([{"id": 5, "text": "buy milk", "completed": true}]),
    )
    .await
    .expect("spawn server");
    let store = RestRowStore::new(&url, "todos", None).expect("store");

    let rows = store
        .update(TodoId(5), TodoPatch { completed: false })
        .await
        .expect("update");

    assert_eq!(rows, vec![Todo::new(5, "buy milk", true)]);
    let request = only_request(&requests);
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.query.get("id").map(String::as_str), Some("eq.5"));
    assert_eq!(request.body, Some(json!({"completed": false})));
    assert_eq!(request.prefer.as_deref(), Some("return=representation"));
}

#[tokio::test]
async fn delete_filters_by_id() {
    let (url, requests) = spawn_store_server(StatusCode::NO_CONTENT, Value::Null)
        .await
        .expect("spawn server");
    let store = RestRowStore::new(&url, "todos", None).expect("store");

    store.delete(TodoId(5)).await.expect("delete");

    let request = only_request(&requests);
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.query.get("id").map(String::as_str), Some("eq.5"));
}

#[tokio::test]
async fn error_body_maps_to_rejected() {
    let (url, _requests) = spawn_store_server(
        StatusCode::BAD_REQUEST,
        json!({"code": "23502", "message": "null value in column \"text\"", "details": null, "hint": null}),
    )
    .await
    .expect("spawn server");
    let store = RestRowStore::new(&url, "todos", None).expect("store");

    let err = store
        .insert(NewTodo::new("x"))
        .await
        .expect_err("must be rejected");

    assert!(err.is_store_reported());
    assert!(
        err.to_string().contains("(status 400): 23502: null value"),
        "store code must reach the log line: {err}"
    );
    match err {
        StoreError::Rejected { status, exception } => {
            assert_eq!(status, 400);
            assert_eq!(exception.code.as_deref(), Some("23502"));
            assert!(exception.message.contains("null value"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_rejection_without_json_body_uses_status_text() {
    let (url, _requests) = spawn_store_server(StatusCode::FORBIDDEN, Value::Null)
        .await
        .expect("spawn server");
    let store = RestRowStore::new(&url, "todos", None).expect("store");

    let err = store.delete(TodoId(1)).await.expect_err("must be rejected");
    match err {
        StoreError::Rejected { status, exception } => {
            assert_eq!(status, 403);
            assert!(exception.code.is_none());
            assert!(!exception.message.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let store = RestRowStore::new(&format!("http://{addr}"), "todos", None).expect("store");

    let err = store.select_all().await.expect_err("must fail");
    assert!(!err.is_store_reported());
    assert!(matches!(err, StoreError::Transport(_)));
}

// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Exercises `EcsClient` against a local management API stand-in.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use emcecs_client::{ClientConfig, ClientError, ClusterApi, EcsClient};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// base64("monitor:secret")
const EXPECTED_AUTHORIZATION: &str = "Basic bW9uaXRvcjpzZWNyZXQ=";

#[derive(Default)]
struct MockState {
    logins: AtomicUsize,
    logouts: AtomicUsize,
    expire_next: AtomicBool,
}

fn token_for(state: &MockState) -> String {
    format!("token-{}", state.logins.load(Ordering::SeqCst))
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    if state.expire_next.swap(false, Ordering::SeqCst) {
        return false;
    }
    headers
        .get("X-SDS-AUTH-TOKEN")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == token_for(state))
}

async fn login(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let presented = headers.get("authorization").and_then(|v| v.to_str().ok());
    if presented != Some(EXPECTED_AUTHORIZATION) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.logins.fetch_add(1, Ordering::SeqCst);
    ([("X-SDS-AUTH-TOKEN", token_for(&state))], "").into_response()
}

async fn logout(State(state): State<Arc<MockState>>) -> StatusCode {
    state.logouts.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

async fn namespaces(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"namespace": [{"name": "ns1"}, {"name": "ns2"}]})).into_response()
}

async fn billing(
    State(state): State<Arc<MockState>>,
    Path(namespace): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if namespace == "broken" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "namespace": namespace,
        "request": body,
        "bucket_billing_info": [{"name": "b1", "total_objects": 10, "total_size": 2}]
    }))
    .into_response()
}

async fn nodes(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"node": [
        {"id": "n1", "ip": "10.0.0.1"},
        {"id": "n2", "displayName": "ecs-2"},
        {"id": "gone", "ip": "10.0.0.3"}
    ]}))
    .into_response()
}

async fn node_detail(State(state): State<Arc<MockState>>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "n1" => Json(json!({"numDisks": 12, "numGoodDisks": 12, "numBadDisks": 0, "activeConnections": "7"})).into_response(),
        "n2" => Json(json!({"numDisks": 8, "numGoodDisks": 7, "numBadDisks": 1})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn start_server() -> (String, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/login", get(login))
        .route("/logout", get(logout))
        .route("/object/namespaces", get(namespaces))
        .route("/object/billing/buckets/{namespace}/info", post(billing))
        .route("/dashboard/zones/localzone/nodes", get(nodes))
        .route("/dashboard/nodes/{id}", get(node_detail))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr.port().to_string(), state)
}

fn client_for(port: &str, password: &str) -> EcsClient {
    EcsClient::new(ClientConfig {
        cluster_address: "127.0.0.1".to_string(),
        username: "monitor".to_string(),
        password: password.to_string(),
        mgmt_port: port.parse().unwrap(),
        use_tls: false,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_first_call_logs_in_and_reuses_token() {
    let (port, state) = start_server().await;
    let client = client_for(&port, "secret");

    let body = client.get("/object/namespaces").await.unwrap();
    let doc = emcecs_jsonpath::parse(&body).unwrap();
    assert_eq!(emcecs_jsonpath::get(&doc, "namespace.#.name").strings(), vec!["ns1", "ns2"]);

    client.get("/object/namespaces").await.unwrap();
    assert_eq!(state.logins.load(Ordering::SeqCst), 1);
    assert!(client.has_session().await);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let (port, _state) = start_server().await;
    let client = client_for(&port, "secret");

    let body = client
        .post("/object/billing/buckets/ns1/info", r#"{"bucketName":"*","sizeunit":"GB"}"#)
        .await
        .unwrap();
    let doc = emcecs_jsonpath::parse(&body).unwrap();
    assert_eq!(emcecs_jsonpath::get(&doc, "namespace").as_string(), "ns1");
    assert_eq!(emcecs_jsonpath::get(&doc, "request.bucketName").as_string(), "*");
    assert_eq!(emcecs_jsonpath::get(&doc, "request.sizeunit").as_string(), "GB");
}

#[tokio::test]
async fn test_server_error_is_status() {
    let (port, _state) = start_server().await;
    let client = client_for(&port, "secret");

    let err = client.post("/object/billing/buckets/broken/info", "{}").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_bad_credentials() {
    let (port, state) = start_server().await;
    let client = client_for(&port, "wrong");

    let err = client.get("/object/namespaces").await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(state.logins.load(Ordering::SeqCst), 0);
    assert!(!client.has_session().await);
}

#[tokio::test]
async fn test_expired_session_fails_once_then_relogs() {
    let (port, state) = start_server().await;
    let client = client_for(&port, "secret");

    client.get("/object/namespaces").await.unwrap();
    state.expire_next.store(true, Ordering::SeqCst);

    let err = client.get("/object/namespaces").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert!(!client.has_session().await);

    client.get("/object/namespaces").await.unwrap();
    assert_eq!(state.logins.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_retrieve_node_states_over_http() {
    let (port, _state) = start_server().await;
    let client = client_for(&port, "secret");

    let states = client.retrieve_node_states().await.unwrap();
    assert_eq!(states.len(), 2);
    assert_eq!(states[0].node_address, "10.0.0.1");
    assert_eq!(states[0].disk_counts.total, 12);
    assert_eq!(states[0].active_connections, 7);
    assert_eq!(states[1].node_address, "ecs-2");
    assert_eq!(states[1].disk_counts.bad, 1);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (port, state) = start_server().await;
    let client = client_for(&port, "secret");

    client.login().await.unwrap();
    client.logout().await.unwrap();
    assert!(!client.has_session().await);
    assert_eq!(state.logouts.load(Ordering::SeqCst), 1);
}

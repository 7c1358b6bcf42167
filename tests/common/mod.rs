//! Common test utilities

#![allow(dead_code)] // Not every test binary uses every helper

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use workboard_daemon::{router, AppState, MemoryStore, SqliteStore, Store, UserId, Workspace};

pub const OWNER_TOKEN: &str = "token-owner";
pub const OUTSIDER_TOKEN: &str = "token-outsider";

/// A router wired to a seeded store.
///
/// The owner has a session and owns `workspace`; the outsider has a session
/// but no membership.
pub struct TestApp {
    pub store: Arc<dyn Store>,
    pub router: Router,
    pub owner: UserId,
    pub outsider: UserId,
    pub workspace: Workspace,
}

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// App backed by the in-memory store.
pub async fn memory_app() -> TestApp {
    seeded_app(Arc::new(MemoryStore::new())).await
}

/// App backed by an on-disk SQLite database inside `dir`.
pub async fn sqlite_app(dir: &TempDir) -> TestApp {
    let store = SqliteStore::open(dir.path().join("workboard.db")).expect("Failed to open store");
    seeded_app(Arc::new(store)).await
}

pub async fn seeded_app(store: Arc<dyn Store>) -> TestApp {
    let owner = UserId::from("user-owner");
    let outsider = UserId::from("user-outsider");
    store
        .insert_session(OWNER_TOKEN, &owner)
        .await
        .expect("Failed to insert owner session");
    store
        .insert_session(OUTSIDER_TOKEN, &outsider)
        .await
        .expect("Failed to insert outsider session");
    let workspace = store
        .create_workspace("Acme", &owner)
        .await
        .expect("Failed to create workspace");

    TestApp {
        router: router(AppState::new(store.clone())),
        store,
        owner,
        outsider,
        workspace,
    }
}

impl TestApp {
    /// Send one request through the router and decode the response body.
    ///
    /// Non-JSON bodies come back as `Value::String`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send_request(request).await
    }

    /// Send a prebuilt request, e.g. one with a malformed body.
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub async fn create_board(&self, name: &str) -> Value {
        let uri = format!("/workspaces/{}/boards", self.workspace.id);
        let (status, body) = self
            .send(Method::POST, &uri, Some(OWNER_TOKEN), Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create board failed: {body}");
        body
    }

    pub async fn create_group(&self, board_id: &str, title: &str) -> Value {
        let uri = format!("/boards/{board_id}/groups");
        let (status, body) = self
            .send(Method::POST, &uri, Some(OWNER_TOKEN), Some(json!({ "title": title })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create group failed: {body}");
        body
    }

    pub async fn create_item(&self, board_id: &str, group_id: &str, name: &str) -> Value {
        let uri = format!("/boards/{board_id}/items");
        let (status, body) = self
            .send(
                Method::POST,
                &uri,
                Some(OWNER_TOKEN),
                Some(json!({ "name": name, "groupId": group_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create item failed: {body}");
        body
    }

    pub async fn create_subitem(&self, item_id: &str, name: &str) -> Value {
        let uri = format!("/items/{item_id}/subitems");
        let (status, body) = self
            .send(Method::POST, &uri, Some(OWNER_TOKEN), Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create subitem failed: {body}");
        body
    }

    pub async fn get_board(&self, board_id: &str) -> Value {
        let (status, body) = self
            .send(Method::GET, &format!("/boards/{board_id}"), Some(OWNER_TOKEN), None)
            .await;
        assert_eq!(status, StatusCode::OK, "get board failed: {body}");
        body
    }

    pub async fn reorder(&self, board_id: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(
            Method::PATCH,
            &format!("/boards/{board_id}/reorder"),
            token,
            Some(body),
        )
        .await
    }

    pub async fn activity(&self, board_id: &str) -> Vec<Value> {
        let (status, body) = self
            .send(
                Method::GET,
                &format!("/boards/{board_id}/activity"),
                Some(OWNER_TOKEN),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "list activity failed: {body}");
        body.as_array().cloned().expect("activity is an array")
    }
}

/// `id` field of a created entity.
pub fn id_of(entity: &Value) -> String {
    entity["id"].as_str().expect("entity has an id").to_string()
}

/// Names of the top-level items of `group_index` in a `GET /boards/:id` body.
pub fn item_names(board: &Value, group_index: usize) -> Vec<String> {
    board["groups"][group_index]["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|i| i["name"].as_str().expect("item name").to_string())
        .collect()
}

/// Map of item name to position across every group of a board body.
pub fn item_positions(board: &Value) -> Vec<(String, i64)> {
    board["groups"]
        .as_array()
        .expect("groups array")
        .iter()
        .flat_map(|g| g["items"].as_array().cloned().unwrap_or_default())
        .map(|i| {
            (
                i["name"].as_str().expect("item name").to_string(),
                i["position"].as_i64().expect("item position"),
            )
        })
        .collect()
}

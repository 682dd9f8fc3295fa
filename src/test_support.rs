//! Router harness over the in-memory store.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{
    app::{AppState, router},
    services::{password_service::PasswordService, token_service::TokenService},
    store::{Store, memory::MemoryStore},
};

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// App with a starting balance of 100 and cheap password hashing.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let state = AppState {
            store: store.clone(),
            tokens: TokenService::new(b"test-secret", Duration::hours(1)).unwrap(),
            passwords: PasswordService::new(8, 1).unwrap(),
            starting_balance: Decimal::new(100, 0),
        };

        Self {
            router: router(state.clone()),
            state,
            store,
        }
    }

    /// Send a request and decode the JSON response body (`Null` if empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Register a user and return its id and token.
    pub async fn sign_up(&self, email: &str, password: &str) -> (i64, String) {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/sign-up",
                None,
                json!({ "email": email, "password": password }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "sign-up failed: {body}");

        let id = body["user"]["id"].as_i64().unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        (id, token)
    }

    pub async fn balance(&self, user_id: i64) -> Decimal {
        self.store
            .find_user_by_id(user_id)
            .await
            .unwrap()
            .unwrap()
            .balance
    }
}

/// Build a request with an optional token; a `Null` body sends no body.
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }

    if body.is_null() {
        builder.body(Body::empty()).unwrap()
    } else {
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

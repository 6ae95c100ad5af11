//! Shared helpers for the router-level integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chirpy_api::config::{ApiConfig, Platform};
use chirpy_api::{AppState, router};
use chirpy_core::store::MemoryStore;
use serde_json::Value;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn config(platform: Platform, fileserver_root: PathBuf) -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: String::new(),
        jwt_secret: JWT_SECRET.into(),
        polka_key: POLKA_KEY.into(),
        platform,
        fileserver_root,
    }
}

/// Router over a fresh in-memory store.
pub fn app(platform: Platform) -> TestApp {
    app_serving(platform, PathBuf::from("public"))
}

pub fn app_serving(platform: Platform, fileserver_root: PathBuf) -> TestApp {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        config(platform, fileserver_root),
    );
    TestApp {
        router: router(state.clone()),
        state,
    }
}

/// Build a request with an optional JSON body and `Authorization` header.
pub fn request(method: Method, uri: &str, body: Option<Value>, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Send a request and return the status and raw body.
pub async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.router.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, body.to_vec())
}

/// Send a request and parse the body as JSON (`Null` for an empty body).
pub async fn send_json(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).expect("parse JSON"))
}

pub async fn register(app: &TestApp, email: &str, password: &str) -> Value {
    let (status, user) = send_json(
        app,
        request(
            Method::POST,
            "/api/users",
            Some(serde_json::json!({ "email": email, "password": password })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {user}");
    user
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    send_json(
        app,
        request(
            Method::POST,
            "/api/login",
            Some(serde_json::json!({ "email": email, "password": password })),
            None,
        ),
    )
    .await
}

/// Register then log in; returns the login response.
pub async fn signed_in(app: &TestApp, email: &str, password: &str) -> Value {
    register(app, email, password).await;
    let (status, session) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "login {email}: {session}");
    session
}

/// Common test utilities for integration tests
///
/// Provides a `TestContext` holding the full router wired to an
/// in-memory SQLite database, plus helpers for driving the form-based
/// HTTP surface: registering, logging in (capturing the session
/// cookie), and reading response bodies.

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;
use uzduotys_api::app::{build_router, AppState};
use uzduotys_api::config::Config;
use uzduotys_shared::db::{pool::create_test_pool, run_migrations};
use uzduotys_shared::mail::LogMailer;

/// Test context containing the app and its backing store
pub struct TestContext {
    pub app: Router,
    pub db: SqlitePool,
    pub config: Config,
}

impl TestContext {
    /// Builds a fresh application over an empty in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::for_tests();

        let db = create_test_pool().await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone(), Arc::new(LogMailer));
        let app = build_router(state);

        Ok(TestContext { app, db, config })
    }

    /// Sends a GET request, optionally with a session cookie
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a form POST, optionally with a session cookie
    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Registers a user through the registration form
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Response<Body> {
        let body = format!(
            "username={}&email={}&password={}&password_confirm={}",
            username, email, password, password
        );
        self.post_form("/registruotis", &body, None).await
    }

    /// Logs in and returns the session cookie pair (`session=...`)
    ///
    /// Panics if login does not succeed; tests for failed logins drive
    /// the form directly.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = format!("username={}&password={}", username, password);
        let response = self.post_form("/prisijungti", &body, None).await;
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "login should redirect on success"
        );
        session_cookie(&response).expect("login should set a session cookie")
    }

    /// Registers and logs in, returning the session cookie pair
    pub async fn register_and_login(&self, username: &str, email: &str, password: &str) -> String {
        let response = self.register(username, email, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        self.login(username, password).await
    }
}

/// Extracts the `session=<value>` pair from a response's Set-Cookie
/// headers
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session=") && !v.starts_with("session=;"))
        .map(|v| v.split(';').next().unwrap_or(v).to_string())
}

/// Reads a response body into a string
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

/// Location header of a redirect response
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// First task id linked from a rendered task-list page
pub fn first_task_id(list_page: &str) -> Option<i64> {
    let marker = "/uzduotys/redaguoti/";
    let start = list_page.find(marker)? + marker.len();
    let rest = &list_page[start..];
    let end = rest.find('"')?;
    rest[..end].parse().ok()
}

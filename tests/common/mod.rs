//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::Path,
    http::{header, HeaderMap, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use login_gate::accounts::employees::password_digest;
use login_gate::config::EmployeeConfig;
use login_gate::http::AppState;
use login_gate::session::Session;
use login_gate::{CurrentId, GateConfig, HttpServer};

pub const ADMIN_ID: i64 = 17;
pub const ADMIN_PASSWORD: &str = "123456";

/// Default config plus one enabled and one disabled employee.
pub fn test_config() -> GateConfig {
    let mut config = GateConfig::default();
    config.accounts.employees = vec![
        EmployeeConfig {
            id: ADMIN_ID,
            username: "admin".into(),
            name: "Administrator".into(),
            password_sha256: password_digest(ADMIN_PASSWORD),
            enabled: true,
        },
        EmployeeConfig {
            id: 99,
            username: "former".into(),
            name: "Former Staff".into(),
            password_sha256: password_digest("secret"),
            enabled: false,
        },
    ];
    config
}

/// A server with stand-in business routes that count how often they run.
pub struct TestApp {
    pub server: HttpServer,
    pub hits: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn new(config: GateConfig) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let server = HttpServer::with_routes(config, business_routes(hits.clone()));
        Self { server, hits }
    }

    pub fn router(&self) -> Router {
        self.server.router()
    }

    pub fn state(&self) -> &AppState {
        self.server.state()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Create a session carrying `key = id` and return its cookie.
    pub async fn session_with(&self, key: &str, id: i64) -> String {
        self.add_to_session(None, key, id).await
    }

    /// Set `key = id` in the session named by `cookie` (or a new one) and
    /// return the cookie to use from now on.
    pub async fn add_to_session(&self, cookie: Option<&str>, key: &str, id: i64) -> String {
        let res = self
            .send(post_json(&format!("/common/test/session/{key}/{id}"), cookie, json!({})))
            .await;
        res.session_cookie()
            .or_else(|| cookie.map(str::to_string))
            .expect("session cookie")
    }

    /// Read `key` from the session named by `cookie`.
    pub async fn session_value(&self, cookie: &str, key: &str) -> Value {
        self.send(get_req(&format!("/common/test/session/{key}"), Some(cookie)))
            .await
            .body
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        send(self.router(), req).await
    }
}

/// Handlers standing in for business logic behind the login check, plus
/// session fixtures under the exempt `/common/**`.
pub fn business_routes(hits: Arc<AtomicUsize>) -> Router<AppState> {
    let handler = move |current: Option<CurrentId>| {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "reached": true, "identity": current }))
        }
    };

    Router::new()
        .route("/order/list", get(handler.clone()))
        .route("/front/index.html", get(handler))
        .route("/common/test/session/{key}/{id}", post(put_session_value))
        .route("/common/test/session/{key}", get(get_session_value))
}

async fn put_session_value(session: Session, Path((key, id)): Path<(String, i64)>) -> Json<Value> {
    session.insert(&key, id).await.unwrap();
    Json(json!({}))
}

async fn get_session_value(session: Session, Path(key): Path<String>) -> Json<Value> {
    Json(session.get::<Value>(&key).await.unwrap().unwrap_or(Value::Null))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON, or null when the body is not JSON.
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    pub fn is_not_login(&self) -> bool {
        self.body["code"] == json!(0) && self.body["msg"] == json!("NOTLOGIN")
    }

    /// `name=value` of the session cookie set by this response, ignoring removals.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .filter(|pair| pair.split_once('=').is_some_and(|(_, value)| !value.is_empty()))
            .map(|v| v.to_string())
    }

    pub fn identity(&self) -> &Value {
        &self.body["identity"]
    }
}

pub async fn send(router: Router, req: Request<Body>) -> TestResponse {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
        text: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn get_req(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(path: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

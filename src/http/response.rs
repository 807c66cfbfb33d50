//! Result envelope returned by every JSON endpoint.
//!
//! ```json
//! { "code": 1, "msg": null, "data": { ... } }
//! { "code": 0, "msg": "NOTLOGIN", "data": null }
//! ```
//!
//! Clients decide success from `code`, not from the HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

pub const CODE_SUCCESS: i32 = 1;
pub const CODE_ERROR: i32 = 0;

/// Message carried by the login check rejection.
pub const NOT_LOGIN: &str = "NOTLOGIN";

#[derive(Debug, Clone, Serialize)]
pub struct ApiResult<T> {
    pub code: i32,
    pub msg: Option<String>,
    pub data: Option<T>,
    /// Extra dynamic values, omitted when empty.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub map: Map<String, Value>,
}

impl<T> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: CODE_SUCCESS,
            msg: None,
            data: Some(data),
            map: Map::new(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            code: CODE_ERROR,
            msg: Some(msg.into()),
            data: None,
            map: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.map.insert(key.into(), value.into());
        self
    }
}

impl ApiResult<()> {
    /// The NOTLOGIN rejection sent when a request has no session identity.
    pub fn not_login() -> Self {
        Self::error(NOT_LOGIN)
    }
}

impl<T: Serialize> ApiResult<T> {
    /// Render with an explicit status instead of the default 200.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResult<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

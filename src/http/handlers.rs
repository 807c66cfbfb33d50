//! Login surface: the endpoints that establish and clear session identities,
//! plus one protected endpoint reporting the bound identity.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::session;
use tracing::{error, info, warn};

use crate::accounts::{sms, LoginError};
use crate::http::response::ApiResult;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::identity::CurrentId;
use crate::session::{establish, Session, EMPLOYEE_KEY, USER_KEY};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employee/login", post(employee_login))
        .route("/employee/logout", post(employee_logout))
        .route("/user/sendMsg", post(send_msg))
        .route("/user/login", post(user_login))
        .route("/user/loginout", post(user_logout))
        .route("/session/current", get(current_session))
}

#[derive(Debug, Deserialize)]
pub struct EmployeeLogin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SendCode {
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct UserLogin {
    pub phone: String,
    pub code: String,
}

/// Session attribute holding the pending code for `phone`.
fn code_key(phone: &str) -> String {
    format!("sms_code:{phone}")
}

fn session_failure(e: session::Error) -> Response {
    error!(error = %e, "Session store failure");
    ApiResult::<()>::error("session unavailable").into_response()
}

async fn employee_login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<EmployeeLogin>,
) -> Response {
    let employee = match state.employees.authenticate(&body.username, &body.password) {
        Ok(employee) => employee,
        Err(e) => {
            warn!(username = %body.username, reason = %e, "Employee login refused");
            let result = match e {
                LoginError::Disabled => "disabled",
                LoginError::InvalidCredentials => "failed",
            };
            metrics::record_login("employee", result);
            return ApiResult::<()>::error(e.to_string()).into_response();
        }
    };

    if let Err(e) = establish(&session, EMPLOYEE_KEY, employee.id).await {
        return session_failure(e);
    }
    metrics::record_login("employee", "success");
    info!(id = employee.id, username = %employee.username, "Employee logged in");

    ApiResult::success(employee).into_response()
}

async fn employee_logout(session: Session) -> Response {
    match session.remove::<Value>(EMPLOYEE_KEY).await {
        Ok(Some(previous)) => info!(id = %previous, "Employee logged out"),
        Ok(None) => {}
        Err(e) => return session_failure(e),
    }
    ApiResult::success("logged out".to_string()).into_response()
}

async fn send_msg(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SendCode>,
) -> Response {
    let phone = body.phone.trim();
    if phone.is_empty() {
        return ApiResult::<()>::error("failed to send code").into_response();
    }

    let code = sms::generate_code(state.sms.code_length);
    info!(phone = %phone, code = %code, "Verification code generated");

    if let Err(e) = session.insert(&code_key(phone), code).await {
        return session_failure(e);
    }
    ApiResult::success("verification code sent".to_string()).into_response()
}

async fn user_login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<UserLogin>,
) -> Response {
    let phone = body.phone.trim();
    let key = code_key(phone);

    let expected = match session.get::<String>(&key).await {
        Ok(expected) => expected,
        Err(e) => return session_failure(e),
    };
    if body.code.is_empty() || expected.as_deref() != Some(body.code.as_str()) {
        warn!(phone = %phone, "User login refused");
        metrics::record_login("user", "failed");
        return ApiResult::<()>::error(LoginError::InvalidCredentials.to_string()).into_response();
    }

    let (user, registered) = state.users.find_or_register(phone);
    // Codes are single use.
    if let Err(e) = session.remove::<String>(&key).await {
        return session_failure(e);
    }
    if let Err(e) = establish(&session, USER_KEY, user.id).await {
        return session_failure(e);
    }
    metrics::record_login("user", "success");
    info!(id = user.id, registered, users = state.users.len(), "User logged in");

    ApiResult::success(user)
        .with("registered", registered)
        .into_response()
}

async fn user_logout(current: CurrentId, session: Session) -> Response {
    if let Err(e) = session.remove::<Value>(USER_KEY).await {
        return session_failure(e);
    }
    info!(id = current.id, "User logged out");
    ApiResult::success("logged out".to_string()).into_response()
}

async fn current_session(current: CurrentId) -> ApiResult<CurrentId> {
    ApiResult::success(current)
}

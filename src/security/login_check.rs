//! Login check middleware.
//! Lets exempt paths through, binds the session identity for everything else,
//! and answers NOTLOGIN when there is none.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info};

use crate::config::LoginCheckConfig;
use crate::http::response::ApiResult;
use crate::observability::metrics;
use crate::routing::ExemptPaths;
use crate::security::identity::CurrentId;
use crate::session::Session;

/// Outcome of checking one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Path needs no login.
    Exempt,
    /// Session carries an identity.
    Authenticated(CurrentId),
    /// Neither; answer NOTLOGIN.
    Rejected,
}

impl Decision {
    fn label(&self) -> &'static str {
        match self {
            Decision::Exempt => "exempt",
            Decision::Authenticated(_) => "authenticated",
            Decision::Rejected => "rejected",
        }
    }
}

/// Decide a request from its path and session.
///
/// `session` is read only when the path is not exempt. A session that
/// cannot be read counts as not logged in.
pub async fn decide(exempt: &ExemptPaths, path: &str, session: &Session) -> Decision {
    if exempt.is_exempt(path) {
        return Decision::Exempt;
    }
    match CurrentId::from_session(session).await {
        Ok(Some(current)) => Decision::Authenticated(current),
        Ok(None) => Decision::Rejected,
        Err(e) => {
            error!(path = %path, error = %e, "Session lookup failed");
            Decision::Rejected
        }
    }
}

/// State shared by every invocation of the middleware.
#[derive(Clone)]
pub struct LoginCheck {
    exempt: Arc<ArcSwap<ExemptPaths>>,
    reject_status: StatusCode,
}

impl LoginCheck {
    pub fn new(config: &LoginCheckConfig) -> Self {
        Self {
            exempt: Arc::new(ArcSwap::from_pointee(ExemptPaths::from_patterns(
                config.exempt_paths.iter().cloned(),
            ))),
            reject_status: StatusCode::from_u16(config.reject_status).unwrap_or(StatusCode::OK),
        }
    }

    /// Snapshot of the current exemption list.
    pub fn exempt_paths(&self) -> Arc<ExemptPaths> {
        self.exempt.load_full()
    }

    /// Swap in a new exemption list. In-flight requests keep the old one.
    pub fn replace_exempt_paths(&self, exempt: ExemptPaths) {
        info!(patterns = exempt.len(), "Exemption list replaced");
        self.exempt.store(Arc::new(exempt));
    }

    /// Check one request by path and session.
    pub async fn check(&self, path: &str, session: &Session) -> Decision {
        let exempt = self.exempt.load_full();
        decide(&exempt, path, session).await
    }

    fn reject(&self) -> Response {
        ApiResult::not_login().with_status(self.reject_status)
    }
}

pub async fn login_check_middleware(
    State(check): State<LoginCheck>,
    session: Session,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    debug!(path = %path, "Intercepted request");

    let decision = check.check(&path, &session).await;
    metrics::record_decision(decision.label());

    match decision {
        Decision::Exempt => {
            debug!(path = %path, "Exempt path, passing through");
            next.run(req).await
        }
        Decision::Authenticated(current) => {
            debug!(
                path = %path,
                id = current.id,
                principal = ?current.principal,
                "Logged in, passing through"
            );
            req.extensions_mut().insert(current);
            next.run(req).await
        }
        Decision::Rejected => {
            info!(path = %path, "Not logged in");
            check.reject()
        }
    }
}

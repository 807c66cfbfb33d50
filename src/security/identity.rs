//! Identity resolved for the current request.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tower_sessions::session;

use crate::http::response::ApiResult;
use crate::session::{Session, EMPLOYEE_KEY, USER_KEY};

/// Which kind of account an identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Principal {
    /// Back-office staff.
    Employee,
    /// Front-end (mobile) customer.
    User,
}

impl Principal {
    /// Lookup order when resolving a session.
    pub const PRIORITY: [Principal; 2] = [Principal::Employee, Principal::User];

    pub fn session_key(self) -> &'static str {
        match self {
            Principal::Employee => EMPLOYEE_KEY,
            Principal::User => USER_KEY,
        }
    }
}

/// The logged-in identity, attached to request extensions by the login check.
///
/// Handlers take it as an extractor. It lives and dies with the request,
/// so one request's identity can never be observed by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentId {
    pub id: i64,
    pub principal: Principal,
}

impl CurrentId {
    /// Resolve the identity carried by a session, employee first.
    ///
    /// An attribute that is present but not an integer is skipped.
    pub async fn from_session(session: &Session) -> Result<Option<Self>, session::Error> {
        for principal in Principal::PRIORITY {
            let key = principal.session_key();
            let Some(value) = session.get::<Value>(key).await? else {
                continue;
            };
            match value.as_i64() {
                Some(id) => return Ok(Some(CurrentId { id, principal })),
                None => tracing::warn!(
                    key,
                    value = %value,
                    "Ignoring non-numeric session identity"
                ),
            }
        }
        Ok(None)
    }
}

impl<S> FromRequestParts<S> for CurrentId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentId>()
            .copied()
            .ok_or_else(|| ApiResult::not_login().into_response())
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentId>().copied())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    async fn session(pairs: &[(&str, Value)]) -> Session {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        for (k, v) in pairs {
            session.insert(k, v.clone()).await.unwrap();
        }
        session
    }

    async fn resolve(pairs: &[(&str, Value)]) -> Option<CurrentId> {
        CurrentId::from_session(&session(pairs).await).await.unwrap()
    }

    #[tokio::test]
    async fn test_employee() {
        let current = resolve(&[("employee", 17.into())]).await.unwrap();
        assert_eq!(current, CurrentId { id: 17, principal: Principal::Employee });
    }

    #[tokio::test]
    async fn test_user() {
        let current = resolve(&[("user", 42.into())]).await.unwrap();
        assert_eq!(current, CurrentId { id: 42, principal: Principal::User });
    }

    #[tokio::test]
    async fn test_employee_wins_over_user() {
        let current = resolve(&[("user", 42.into()), ("employee", 17.into())])
            .await
            .unwrap();
        assert_eq!(current.id, 17);
        assert_eq!(current.principal, Principal::Employee);
    }

    #[tokio::test]
    async fn test_non_numeric_falls_through() {
        let current = resolve(&[("employee", "17".into()), ("user", 42.into())])
            .await
            .unwrap();
        assert_eq!(current.principal, Principal::User);

        assert!(resolve(&[("employee", 1.5.into())]).await.is_none());
    }

    #[tokio::test]
    async fn test_unrelated_attributes() {
        assert!(resolve(&[("sms_code:13800000000", "1234".into())]).await.is_none());
        assert!(resolve(&[]).await.is_none());
    }
}

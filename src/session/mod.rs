//! Server-side sessions, managed by `tower-sessions`.
//!
//! # Data Flow
//! ```text
//! Cookie header
//!     → SessionManagerLayer (session id → lazily loaded record)
//!     → login check reads the identity keys
//!     → handlers insert/remove keys, cycle the id on login
//!     → Set-Cookie when the session changed or its idle expiry moved
//! ```
//!
//! # Design Decisions
//! - Sessions live in a `MemoryStore`; a restart logs everyone out
//! - Expiry is on inactivity, so every authenticated request extends it
//! - Establishing an identity always issues a fresh session id

use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SessionConfig;

pub use tower_sessions::Session;

/// Session attribute holding a back-office employee id.
pub const EMPLOYEE_KEY: &str = "employee";

/// Session attribute holding a front-end user id.
pub const USER_KEY: &str = "user";

/// Upper bound accepted for `session.idle_timeout_secs` (one year).
pub const MAX_IDLE_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Build the session layer for `store` from configuration.
pub fn session_layer(
    config: &SessionConfig,
    store: MemoryStore,
) -> SessionManagerLayer<MemoryStore> {
    let idle = config.idle_timeout_secs.min(MAX_IDLE_TIMEOUT_SECS) as i64;

    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure_cookie)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(idle)))
}

/// Issue a new session id and set `key` to `id` in the session.
///
/// The previous id stops working immediately, so a session id obtained
/// before login cannot be used to ride on the login.
pub async fn establish(
    session: &Session,
    key: &str,
    id: i64,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(key, id).await
}

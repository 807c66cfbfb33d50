//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → login_check.rs (exempt path? session identity?)
//!         → exempt: pass through untouched
//!         → identity: attach CurrentId to request extensions, pass through
//!         → neither: NOTLOGIN envelope, next handler never runs
//!     → handlers extract CurrentId (identity.rs)
//! ```
//!
//! # Design Decisions
//! - Identity is request-scoped state, never thread or process global
//! - Employee identity takes priority over user identity
//! - Rejection is signalled in the body; the status is configurable

pub mod identity;
pub mod login_check;

pub use identity::{CurrentId, Principal};
pub use login_check::{login_check_middleware, Decision, LoginCheck};

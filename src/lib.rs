//! Login gate: an axum middleware that lets exempt paths through, binds the
//! session identity for everything else, and answers NOTLOGIN otherwise.

pub mod accounts;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod session;

pub use config::schema::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::{CurrentId, Principal};

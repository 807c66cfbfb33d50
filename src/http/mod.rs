//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → security::login_check (exempt? identity? NOTLOGIN)
//!     → handlers.rs (login surface, protected endpoints)
//!     → response.rs (result envelope)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::ApiResult;
pub use server::{AppState, HttpServer};

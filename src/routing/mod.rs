//! Path routing for the login check.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → exempt.rs (ordered exemption list)
//!     → matcher.rs (Ant-style pattern evaluation)
//!     → Return: exempt or not
//!
//! Compilation (at startup and on reload):
//!     login_check.exempt_paths[]
//!     → Compile patterns into segments
//!     → Freeze as immutable ExemptPaths
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once, immutable at runtime
//! - Deterministic: same path always yields the same answer

pub mod exempt;
pub mod matcher;

pub use exempt::ExemptPaths;
pub use matcher::PathPattern;

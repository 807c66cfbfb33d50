//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → shared with the server at startup
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the exemption list atomically
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Only the exemption list is reloadable; other sections need a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::AccountsConfig;
pub use schema::EmployeeConfig;
pub use schema::GateConfig;
pub use schema::LoginCheckConfig;
pub use schema::SessionConfig;
pub use schema::StaticFilesConfig;

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the login gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Login check filter settings.
    pub login_check: LoginCheckConfig,

    /// Session store settings.
    pub session: SessionConfig,

    /// Static resources served behind the login check.
    pub static_files: StaticFilesConfig,

    /// Verification code settings for front-end login.
    pub sms: SmsConfig,

    /// Back-office accounts.
    pub accounts: AccountsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Paths that never require a logged-in session.
pub const DEFAULT_EXEMPT_PATHS: &[&str] = &[
    "/employee/login",
    "/employee/logout",
    "/backend/**",
    "/front/**",
    "/common/**",
    "/user/sendMsg",
    "/user/login",
];

/// Login check filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginCheckConfig {
    /// Ant-style patterns exempt from authentication, in match order.
    pub exempt_paths: Vec<String>,

    /// HTTP status sent with the NOTLOGIN envelope.
    /// Clients detect rejection from the body, so this stays 200 by default.
    pub reject_status: u16,
}

impl Default for LoginCheckConfig {
    fn default() -> Self {
        Self {
            exempt_paths: DEFAULT_EXEMPT_PATHS.iter().map(|p| p.to_string()).collect(),
            reject_status: 200,
        }
    }
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    pub cookie_name: String,

    /// Sessions idle for longer than this are discarded.
    pub idle_timeout_secs: u64,

    /// Mark the session cookie `Secure`. Enable when served over HTTPS.
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "SESSION".to_string(),
            idle_timeout_secs: 1800,
            secure_cookie: false,
        }
    }
}

/// Static resource configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served for paths no route handles, e.g. `static/backend/index.html`
    /// for `/backend/index.html`.
    pub root: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static"),
        }
    }
}

/// Verification code configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    /// Number of digits in a generated code.
    pub code_length: usize,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self { code_length: 4 }
    }
}

/// Back-office account directory.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AccountsConfig {
    pub employees: Vec<EmployeeConfig>,
}

/// A single back-office account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmployeeConfig {
    /// Numeric id bound to the session on login.
    pub id: i64,

    /// Login name (unique).
    pub username: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Lowercase hex SHA-256 of the password.
    pub password_sha256: String,

    /// Disabled accounts cannot log in.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes valid)
//! - Check account uniqueness
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use axum::http::StatusCode;

use crate::config::schema::GateConfig;
use crate::session::MAX_IDLE_TIMEOUT_SECS;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    for (i, pattern) in config.login_check.exempt_paths.iter().enumerate() {
        if !pattern.starts_with('/') {
            errors.push(ValidationError::new(
                format!("login_check.exempt_paths[{i}]"),
                format!("'{pattern}' must start with '/'"),
            ));
        }
    }

    if StatusCode::from_u16(config.login_check.reject_status).is_err() {
        errors.push(ValidationError::new(
            "login_check.reject_status",
            format!("{} is not an HTTP status", config.login_check.reject_status),
        ));
    }

    let cookie_name = &config.session.cookie_name;
    if cookie_name.is_empty() || !cookie_name.chars().all(is_cookie_token_char) {
        errors.push(ValidationError::new(
            "session.cookie_name",
            format!("'{cookie_name}' is not a valid cookie name"),
        ));
    }
    let idle = config.session.idle_timeout_secs;
    if idle == 0 || idle > MAX_IDLE_TIMEOUT_SECS {
        errors.push(ValidationError::new(
            "session.idle_timeout_secs",
            format!("must be between 1 and {MAX_IDLE_TIMEOUT_SECS}"),
        ));
    }

    if !(4..=8).contains(&config.sms.code_length) {
        errors.push(ValidationError::new("sms.code_length", "must be between 4 and 8"));
    }

    let mut ids = HashSet::new();
    let mut usernames = HashSet::new();
    for (i, employee) in config.accounts.employees.iter().enumerate() {
        let field = format!("accounts.employees[{i}]");
        if !ids.insert(employee.id) {
            errors.push(ValidationError::new(
                format!("{field}.id"),
                format!("duplicate id {}", employee.id),
            ));
        }
        if employee.username.is_empty() {
            errors.push(ValidationError::new(format!("{field}.username"), "must not be empty"));
        } else if !usernames.insert(employee.username.as_str()) {
            errors.push(ValidationError::new(
                format!("{field}.username"),
                format!("duplicate username '{}'", employee.username),
            ));
        }
        let digest = &employee.password_sha256;
        if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            errors.push(ValidationError::new(
                format!("{field}.password_sha256"),
                "must be 64 hex characters",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// RFC 6265 token characters.
fn is_cookie_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EmployeeConfig;

    const DIGEST: &str = "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918";

    fn employee(id: i64, username: &str) -> EmployeeConfig {
        EmployeeConfig {
            id,
            username: username.to_string(),
            name: String::new(),
            password_sha256: DIGEST.to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GateConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GateConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.login_check.reject_status = 1000;
        config.session.cookie_name = "bad name".into();
        config.session.idle_timeout_secs = 0;
        config.sms.code_length = 2;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.request_secs",
                "login_check.reject_status",
                "session.cookie_name",
                "session.idle_timeout_secs",
                "sms.code_length",
            ]
        );
    }

    #[test]
    fn test_exempt_patterns_must_be_absolute() {
        let mut config = GateConfig::default();
        config.login_check.exempt_paths = vec!["/ok/**".into(), "".into(), "front/**".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "login_check.exempt_paths[1]");
        assert_eq!(errors[1].field, "login_check.exempt_paths[2]");
    }

    #[test]
    fn test_duplicate_accounts() {
        let mut config = GateConfig::default();
        config.accounts.employees = vec![employee(1, "admin"), employee(1, "admin")];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("duplicate id"));
        assert!(errors[1].message.contains("duplicate username"));
    }

    #[test]
    fn test_bad_digest() {
        let mut config = GateConfig::default();
        let mut admin = employee(1, "admin");
        admin.password_sha256 = "e10adc3949ba59abbe56e057f20f883e".into();
        config.accounts.employees = vec![admin];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "accounts.employees[0].password_sha256");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GateConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}

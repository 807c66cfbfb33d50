//! Back-office employee directory, loaded from configuration.

use std::collections::HashMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::accounts::LoginError;
use crate::config::EmployeeConfig;

/// Public view of an employee, returned on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
struct Account {
    profile: Employee,
    password_sha256: String,
}

/// Lookup of employees by username.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    by_username: HashMap<String, Account>,
}

impl EmployeeDirectory {
    pub fn from_config(employees: &[EmployeeConfig]) -> Self {
        let by_username = employees
            .iter()
            .map(|e| {
                let account = Account {
                    profile: Employee {
                        id: e.id,
                        username: e.username.clone(),
                        name: e.name.clone(),
                        enabled: e.enabled,
                    },
                    password_sha256: e.password_sha256.to_ascii_lowercase(),
                };
                (e.username.clone(), account)
            })
            .collect();
        Self { by_username }
    }

    /// Verify a username and plaintext password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Employee, LoginError> {
        let account = self
            .by_username
            .get(username)
            .ok_or(LoginError::InvalidCredentials)?;

        if password_digest(password) != account.password_sha256 {
            return Err(LoginError::InvalidCredentials);
        }
        if !account.profile.enabled {
            return Err(LoginError::Disabled);
        }
        Ok(account.profile.clone())
    }

    pub fn len(&self) -> usize {
        self.by_username.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_username.is_empty()
    }
}

/// Lowercase hex SHA-256 of a password, the form stored in configuration.
pub fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

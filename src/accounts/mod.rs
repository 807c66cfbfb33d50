//! Accounts that can log in.
//!
//! Employees come from configuration and log in with a password. Front-end
//! users log in with a phone number and a one-time code and are registered
//! on first login.

pub mod employees;
pub mod sms;
pub mod users;

use thiserror::Error;

pub use employees::{Employee, EmployeeDirectory};
pub use users::{User, UserDirectory};

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    /// Unknown account, wrong password or wrong code.
    #[error("login failed")]
    InvalidCredentials,

    #[error("account disabled")]
    Disabled,
}

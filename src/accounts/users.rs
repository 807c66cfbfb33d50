//! Front-end users, registered on first login by phone number.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub phone: String,
    pub enabled: bool,
}

/// A thread-safe phone → user map.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    inner: Arc<DashMap<String, User>>,
    next_id: Arc<AtomicI64>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Find the user registered with `phone`, registering one if needed.
    ///
    /// The flag is true when this call registered the user.
    pub fn find_or_register(&self, phone: &str) -> (User, bool) {
        let mut registered = false;
        let user = self
            .inner
            .entry(phone.to_string())
            .or_insert_with(|| {
                registered = true;
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed),
                    phone: phone.to_string(),
                    enabled: true,
                };
                tracing::info!(id = user.id, "Registered new user");
                user
            })
            .clone();
        (user, registered)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

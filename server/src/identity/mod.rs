//! Owner identity resolution.
//!
//! User authentication and session management live outside this service;
//! the core only needs to turn a monitor's owner id into a notification
//! email when an alert fires. `IdentityProvider` is that seam, with a
//! config-backed directory as the production implementation.

use std::collections::HashMap;

pub trait IdentityProvider: Send + Sync {
    /// Notification email for a user, if the user is known
    fn email_for(&self, user_id: &str) -> Option<String>;

    /// Whether the user exists at all (used to gate the CRUD surface)
    fn is_known_user(&self, user_id: &str) -> bool {
        self.email_for(user_id).is_some()
    }
}

/// Directory loaded from the `[users]` table in config.
pub struct ConfigIdentityProvider {
    users: HashMap<String, String>,
}

impl ConfigIdentityProvider {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }
}

impl IdentityProvider for ConfigIdentityProvider {
    fn email_for(&self, user_id: &str) -> Option<String> {
        self.users.get(user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_users_only() {
        let mut users = HashMap::new();
        users.insert("alice".to_string(), "alice@example.com".to_string());
        let provider = ConfigIdentityProvider::new(users);

        assert_eq!(
            provider.email_for("alice").as_deref(),
            Some("alice@example.com")
        );
        assert!(provider.email_for("bob").is_none());
        assert!(provider.is_known_user("alice"));
        assert!(!provider.is_known_user("bob"));
    }
}

//! In-memory user store
//!
//! The only mutation surface over the shared user collection. Handlers never
//! see the backing `Vec`; every read and write goes through the operations
//! here, which take the store's lock for the full read-modify-write step.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A user record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Shared collection of users, insertion-order preserved.
///
/// No uniqueness is enforced on `id`, and creation never assigns one, so a
/// created user keeps the zero value.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user at the end of the collection
    pub async fn append(&self, user: User) {
        self.users.write().await.push(user);
    }

    /// Remove every user, returning how many were removed.
    ///
    /// The emptiness check and the clear happen under one write lock, so an
    /// append cannot slip in between them.
    pub async fn clear(&self) -> usize {
        let mut users = self.users.write().await;
        let removed = users.len();
        users.clear();
        removed
    }

    /// Find the first user whose decimal id matches `id` exactly.
    ///
    /// The parameter is never parsed as a number; a non-numeric value simply
    /// matches nothing.
    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.id.to_string() == id)
            .cloned()
    }

    /// Copy of the full collection in insertion order
    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}

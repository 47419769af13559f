//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: BTreeMap<UserId, User>,
    /// Index for username -> user ID lookup, doubles as the unique constraint
    username_index: HashMap<String, UserId>,
    last_id: i64,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.table.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .username_index
            .get(username)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.username_index.contains_key(&user.username) {
            return Err(DomainError::duplicate_key("username"));
        }

        table.last_id += 1;
        let id = UserId::new(table.last_id);
        let user = User::from_new(id, user);

        table.username_index.insert(user.username().to_string(), id);
        table.users.insert(id, user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let alice = repo.create(NewUser::new("alice", "hash")).await.unwrap();
        let bob = repo.create(NewUser::new("bob", "hash")).await.unwrap();

        assert_eq!(alice.id(), UserId::new(1));
        assert_eq!(bob.id(), UserId::new(2));
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(NewUser::new("alice", "hash")).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.username(), "alice");

        assert!(repo.get(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(NewUser::new("alice", "hash")).await.unwrap();

        let retrieved = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(retrieved.id(), user.id());

        assert!(repo.get_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_uniqueness() {
        let repo = InMemoryUserRepository::new();

        repo.create(NewUser::new("alice", "hash-1")).await.unwrap();

        let result = repo.create(NewUser::new("alice", "hash-2")).await;
        assert_eq!(result.unwrap_err(), DomainError::duplicate_key("username"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_one() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(NewUser::new("alice", "hash")).await })
            })
            .collect();

        let mut successes = 0;

        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len().await, 1);
    }
}

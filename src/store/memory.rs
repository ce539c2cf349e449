//! In-process stores with the same contracts as the PostgreSQL ones.
//!
//! Used by the test-suite and for running the server without a database.
//! Guards are never held across an `.await`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{SessionToken, Task, TaskInput, User, UserProfile};
use crate::store::users::email_taken;
use crate::store::{CredentialStore, TaskStore, TokenLedger};

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::StoreFailure("in-memory store lock poisoned".into())
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<Vec<User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i32, AppError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|u| u.email == email) {
            return Err(email_taken());
        }

        let id = users.len() as i32 + 1;
        users.push(User {
            id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserProfile>, AppError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .map(UserProfile::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.users.read().map_err(poisoned)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenLedger {
    entries: RwLock<Vec<SessionToken>>,
}

impl MemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ledger rows, active or not.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenLedger for MemoryTokenLedger {
    async fn insert(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let id = entries.len() as i32 + 1;
        entries.push(SessionToken {
            id,
            user_id,
            token: token.to_string(),
            created_at: Utc::now(),
            expires_at,
            is_active: true,
        });
        Ok(())
    }

    async fn is_valid(&self, token: &str) -> Result<bool, AppError> {
        let now = Utc::now();
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .any(|e| e.token == token && e.is_valid_at(now)))
    }

    async fn deactivate(&self, token: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries
            .iter_mut()
            .filter(|e| e.token == token)
            .for_each(|e| e.is_active = false);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, user_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let task = Task::new(input, user_id);
        self.tasks.write().map_err(poisoned)?.push(task.clone());
        Ok(task)
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        // Reverse insertion order first so equal timestamps still list newest first.
        let mut owned: Vec<Task> = tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn owner_of(&self, task_id: Uuid) -> Result<Option<i32>, AppError> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.iter().find(|t| t.id == task_id).map(|t| t.user_id))
    }

    async fn update(
        &self,
        task_id: Uuid,
        user_id: i32,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        match tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == user_id)
        {
            Some(task) => {
                task.apply(input);
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, task_id: Uuid, user_id: i32) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == task_id && t.user_id == user_id));
        Ok(tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use chrono::Duration;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: None,
            due_date: None,
        }
    }

    #[actix_rt::test]
    async fn test_credential_store_rejects_duplicate_email() {
        let store = MemoryCredentialStore::new();
        let id = store.create("Jane", "jane@x.com", "hash").await.unwrap();

        match store.create("Other", "jane@x.com", "hash2").await {
            Err(AppError::Conflict(_)) => {}
            other => panic!("expected conflict, got {:?}", other),
        }

        let user = store.find_by_email("jane@x.com").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.full_name, "Jane");

        let profile = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(profile.email, "jane@x.com");
        assert!(store.find_by_id(id + 1).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_ledger_validity_and_deactivation() {
        let ledger = MemoryTokenLedger::new();
        let tomorrow = Utc::now() + Duration::hours(24);

        ledger.insert(1, "live", tomorrow).await.unwrap();
        ledger
            .insert(1, "stale", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(ledger.is_valid("live").await.unwrap());
        assert!(!ledger.is_valid("stale").await.unwrap());
        assert!(!ledger.is_valid("unknown").await.unwrap());

        ledger.deactivate("live").await.unwrap();
        assert!(!ledger.is_valid("live").await.unwrap());

        // Idempotent, and unknown tokens are fine.
        ledger.deactivate("live").await.unwrap();
        ledger.deactivate("unknown").await.unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[actix_rt::test]
    async fn test_task_store_scopes_by_owner() {
        let store = MemoryTaskStore::new();
        let first = store.create(1, input("first")).await.unwrap();
        let second = store.create(1, input("second")).await.unwrap();
        store.create(2, input("someone else's")).await.unwrap();

        let titles: Vec<String> = store
            .list_for_user(1)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);

        assert_eq!(store.owner_of(first.id).await.unwrap(), Some(1));
        assert!(store.update(first.id, 2, input("hijack")).await.unwrap().is_none());
        assert!(!store.delete(second.id, 2).await.unwrap());

        let updated = store.update(first.id, 1, input("renamed")).await.unwrap().unwrap();
        assert_eq!(updated.title, "renamed");
        assert!(store.delete(second.id, 1).await.unwrap());
        assert_eq!(store.owner_of(second.id).await.unwrap(), None);
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput};

/// Per-user task persistence.
///
/// Mutations take the acting user's id and are scoped by it; callers still
/// check [`TaskStore::owner_of`] first so that a foreign task is reported as
/// access denied rather than silently left alone.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, user_id: i32, input: TaskInput) -> Result<Task, AppError>;

    /// All tasks owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError>;

    /// The owning user of a task, or `None` if the task does not exist.
    async fn owner_of(&self, task_id: Uuid) -> Result<Option<i32>, AppError>;

    /// Replaces the task's editable fields. Returns `None` if no task with this
    /// id is owned by `user_id`.
    async fn update(
        &self,
        task_id: Uuid,
        user_id: i32,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError>;

    /// Returns whether a task was removed.
    async fn delete(&self, task_id: Uuid, user_id: i32) -> Result<bool, AppError>;
}

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, user_id, created_at, updated_at";

pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, user_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let task = Task::new(input, user_id);

        let sql = format!(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.title)
            .bind(task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.due_date)
            .bind(task.user_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn owner_of(&self, task_id: Uuid) -> Result<Option<i32>, AppError> {
        let owner = sqlx::query_scalar::<_, i32>("SELECT user_id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    async fn update(
        &self,
        task_id: Uuid,
        user_id: i32,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks
             SET title = $1, description = $2, status = $3, priority = $4, due_date = $5, updated_at = NOW()
             WHERE id = $6 AND user_id = $7
             RETURNING {}",
            TASK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.due_date)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, task_id: Uuid, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed and under review.
    Review,
    /// Task is completed.
    Done,
}

/// Input structure for creating or updating a task.
///
/// Updates replace every field, mirroring a `PUT`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    pub priority: Option<TaskPriority>,

    #[serde(alias = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` owned by `user_id`, with a fresh id and both timestamps set to now.
    pub fn new(input: TaskInput, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the editable fields from `input` and bumps `updated_at`.
    pub fn apply(&mut self, input: TaskInput) {
        self.title = input.title;
        self.description = input.description;
        self.status = input.status;
        self.priority = input.priority;
        self.due_date = input.due_date;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("Test Description".to_string()),
            status: TaskStatus::Todo,
            priority: Some(TaskPriority::High),
            due_date: Some(Utc::now()),
        }
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(input("Test Task"), 1);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, 1);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut long_description = input("Valid title");
        long_description.description = Some("b".repeat(1001));
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_input_defaults_and_aliases() {
        let parsed: TaskInput = serde_json::from_value(serde_json::json!({
            "title": "A",
            "dueDate": "2026-11-01T09:00:00Z"
        }))
        .unwrap();

        assert_eq!(parsed.status, TaskStatus::Todo);
        assert!(parsed.priority.is_none());
        assert!(parsed.due_date.is_some());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut task = Task::new(input("Before"), 3);
        let id = task.id;
        let mut update = input("After");
        update.status = TaskStatus::Done;
        task.apply(update);

        assert_eq!(task.id, id);
        assert_eq!(task.user_id, 3);
        assert_eq!(task.title, "After");
        assert_eq!(task.status, TaskStatus::Done);
    }
}

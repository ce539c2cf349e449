use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::TaskInput,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Retrieves every task owned by the authenticated user, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects (possibly empty).
/// - `401 Unauthorized`: missing or rejected token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_for_user(user.user_id).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The owner is always the authenticated user; any `user_id` in the body is ignored.
///
/// ## Responses:
/// - `200 OK`: the created `Task`, including its generated `id`.
/// - `400 Bad Request`: missing title or oversized fields.
/// - `401 Unauthorized`: missing or rejected token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    validate_task(&task_data)?;

    let task = state
        .tasks
        .create(user.user_id, task_data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Replaces the editable fields of a task the authenticated user owns.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: missing title or oversized fields.
/// - `403 Forbidden`: the task does not exist or belongs to someone else.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    validate_task(&task_data)?;
    let task_id = task_id.into_inner();

    ensure_owner(&state, task_id, user.user_id).await?;

    let task = state
        .tasks
        .update(task_id, user.user_id, task_data.into_inner())
        .await?
        .ok_or_else(access_denied)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the authenticated user owns.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted"}`.
/// - `403 Forbidden`: the task does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    ensure_owner(&state, task_id, user.user_id).await?;

    if !state.tasks.delete(task_id, user.user_id).await? {
        return Err(access_denied());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}

pub(super) fn access_denied() -> AppError {
    AppError::AccessDenied("Access denied".into())
}

/// Fails with `AccessDenied` unless `user_id` owns `task_id`.
async fn ensure_owner(state: &AppState, task_id: Uuid, user_id: i32) -> Result<(), AppError> {
    match state.tasks.owner_of(task_id).await? {
        Some(owner) if owner == user_id => Ok(()),
        Some(owner) => {
            log::warn!(
                "user {} attempted to modify task {} owned by {}",
                user_id,
                task_id,
                owner
            );
            Err(access_denied())
        }
        None => Err(access_denied()),
    }
}

fn validate_task(input: &TaskInput) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    #[test]
    fn test_task_input_validation() {
        let valid_input = TaskInput {
            title: "Valid Title".to_string(),
            description: Some("Test Description".to_string()),
            status: TaskStatus::Done,
            priority: Some(TaskPriority::Low),
            due_date: None,
        };
        assert!(validate_task(&valid_input).is_ok());

        let empty_title = TaskInput {
            title: String::new(),
            ..valid_input
        };
        match validate_task(&empty_title) {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("title")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use contest_hub_domain::model::{NewTask, Task, WinnerStatus};
use contest_hub_domain::storage::{ContestStore, TaskStore};

use crate::guards::{authorize, bearer_token, GuardRule};
use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitTaskRequest {
    pub contest_id: i32,
    pub submission_url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateWinnerRequest {
    pub winner_status: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub contest_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i32,
    pub contest_id: i32,
    pub participant_email: String,
    pub submission_url: String,
    pub winner_status: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            contest_id: task.contest_id,
            participant_email: task.participant_email,
            submission_url: task.submission_url,
            winner_status: task.winner_status.as_str().to_string(),
            submitted_at: task.submitted_at,
        }
    }
}

/// Submits an entry for a contest. The participant is the verified caller.
pub async fn submit_task_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    payload: web::Json<SubmitTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = authorize(&state, bearer_token(&request), &[GuardRule::Authenticated]).await?;

    let body = payload.into_inner();
    if state.storage().find_contest(body.contest_id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let task = state
        .storage()
        .insert_task(NewTask {
            contest_id: body.contest_id,
            participant_email: caller.email,
            submission_url: body.submission_url,
            submitted_at: Utc::now(),
        })
        .await?;

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

pub async fn list_tasks_handler(
    state: web::Data<AppState>,
    query: web::Query<TaskListQuery>,
) -> Result<HttpResponse, ApiError> {
    let tasks = state.storage().list_tasks_by_contest(query.contest_id).await?;
    let body: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn update_winner_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<i32>,
    payload: web::Json<UpdateWinnerRequest>,
) -> Result<HttpResponse, ApiError> {
    authorize(&state, bearer_token(&request), &[GuardRule::Authenticated]).await?;

    let status = WinnerStatus::parse(&payload.winner_status).ok_or_else(|| {
        ApiError::Validation(format!("unknown winner status `{}`", payload.winner_status))
    })?;
    let task = state
        .storage()
        .update_winner_status(path.into_inner(), status)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

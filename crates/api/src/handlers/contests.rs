use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use contest_hub_domain::model::{Contest, ContestStatus, ContestUpdate, NewContest};
use contest_hub_domain::storage::ContestStore;

use crate::guards::{authorize, bearer_token, GuardRule};
use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateContestRequest {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub prize_money: f64,
    pub task_instruction: String,
    pub contest_type: String,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct UpdateContestRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub prize_money: Option<f64>,
    pub task_instruction: Option<String>,
    pub contest_type: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateContestStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ContestListQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContestResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub prize_money: f64,
    pub task_instruction: String,
    pub contest_type: String,
    pub deadline: DateTime<Utc>,
    pub creator_email: String,
    pub status: String,
    pub payment_state: String,
    pub payment_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Contest> for ContestResponse {
    fn from(contest: Contest) -> Self {
        Self {
            id: contest.id,
            name: contest.name,
            description: contest.description,
            image: contest.image,
            price: contest.price,
            prize_money: contest.prize_money,
            task_instruction: contest.task_instruction,
            contest_type: contest.contest_type,
            deadline: contest.deadline,
            creator_email: contest.creator_email,
            status: contest.status.as_str().to_string(),
            payment_state: contest.payment_state.as_str().to_string(),
            payment_count: contest.payment_count,
            created_at: contest.created_at,
        }
    }
}

/// Creates a contest in `pending` state. The creator is whoever the bearer
/// token verifies as, never a body field.
pub async fn create_contest_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    payload: web::Json<CreateContestRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = authorize(&state, bearer_token(&request), &[GuardRule::Authenticated]).await?;

    let body = payload.into_inner();
    let contest = state
        .storage()
        .insert_contest(NewContest {
            name: body.name,
            description: body.description,
            image: body.image,
            price: body.price,
            prize_money: body.prize_money,
            task_instruction: body.task_instruction,
            contest_type: body.contest_type,
            deadline: body.deadline,
            creator_email: caller.email,
            created_at: Utc::now(),
        })
        .await?;

    Ok(HttpResponse::Created().json(ContestResponse::from(contest)))
}

/// Lists contests. `?email=` narrows to one creator and must match the
/// caller; the unfiltered listing is open to any authenticated caller.
pub async fn list_contests_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    query: web::Query<ContestListQuery>,
) -> Result<HttpResponse, ApiError> {
    let email = query.email.as_deref();
    authorize(
        &state,
        bearer_token(&request),
        &[GuardRule::Authenticated, GuardRule::OwnsEmail(email)],
    )
    .await?;

    let contests = state.storage().list_contests(email).await?;
    let body: Vec<ContestResponse> = contests.into_iter().map(ContestResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Public listing of confirmed contests, most-paid-for first.
pub async fn confirmed_contests_handler(
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let contests = state.storage().list_confirmed_contests().await?;
    let body: Vec<ContestResponse> = contests.into_iter().map(ContestResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn contest_detail_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let contest = state
        .storage()
        .find_contest(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(ContestResponse::from(contest)))
}

pub async fn update_contest_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<i32>,
    payload: web::Json<UpdateContestRequest>,
) -> Result<HttpResponse, ApiError> {
    authorize(&state, bearer_token(&request), &[GuardRule::Authenticated]).await?;

    let body = payload.into_inner();
    let updated = state
        .storage()
        .update_contest(
            path.into_inner(),
            ContestUpdate {
                name: body.name,
                description: body.description,
                image: body.image,
                price: body.price,
                prize_money: body.prize_money,
                task_instruction: body.task_instruction,
                contest_type: body.contest_type,
                deadline: body.deadline,
            },
        )
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(ContestResponse::from(updated)))
}

/// Admin review: moves a contest between `pending`, `confirmed`, and
/// `rejected`.
pub async fn update_contest_status_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<i32>,
    payload: web::Json<UpdateContestStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    authorize(
        &state,
        bearer_token(&request),
        &[GuardRule::Authenticated, GuardRule::Admin],
    )
    .await?;

    let status = ContestStatus::parse(&payload.status).ok_or_else(|| {
        ApiError::Validation(format!("unknown contest status `{}`", payload.status))
    })?;
    let updated = state
        .storage()
        .update_contest_status(path.into_inner(), status)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(ContestResponse::from(updated)))
}

pub async fn delete_contest_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    authorize(
        &state,
        bearer_token(&request),
        &[GuardRule::Authenticated, GuardRule::Admin],
    )
    .await?;

    if !state.storage().delete_contest(path.into_inner()).await? {
        return Err(ApiError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}

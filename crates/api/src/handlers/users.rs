use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};

use contest_hub_domain::model::{validate_email, NewUser, User, UserRole};
use contest_hub_domain::storage::UserStore;

use crate::guards::{authorize, bearer_token, GuardRule};
use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterUserRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub status: String,
    pub user: UserResponse,
}

/// Idempotent registration: repeating an email is reported as
/// `already_registered` with the existing row, never an error.
pub async fn register_user_handler(
    state: web::Data<AppState>,
    payload: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = payload.into_inner().email;
    validate_email(&email)?;

    let created = state
        .storage()
        .insert_user_if_absent(NewUser {
            email: email.clone(),
            created_at: Utc::now(),
        })
        .await?;

    match created {
        Some(user) => {
            counter!("api_user_registrations_total", "status" => "registered").increment(1);
            Ok(HttpResponse::Created().json(RegistrationResponse {
                status: "registered".to_string(),
                user: user.into(),
            }))
        }
        None => {
            let user = state
                .storage()
                .find_user_by_email(&email)
                .await?
                .ok_or(ApiError::NotFound)?;
            counter!("api_user_registrations_total", "status" => "already_registered")
                .increment(1);
            Ok(HttpResponse::Ok().json(RegistrationResponse {
                status: "already_registered".to_string(),
                user: user.into(),
            }))
        }
    }
}

pub async fn list_users_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authorize(
        &state,
        bearer_token(&request),
        &[GuardRule::Authenticated, GuardRule::Admin],
    )
    .await?;

    let users = state.storage().list_users().await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn update_user_role_handler(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<i32>,
    payload: web::Json<UpdateUserRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    authorize(
        &state,
        bearer_token(&request),
        &[GuardRule::Authenticated, GuardRule::Admin],
    )
    .await?;

    let role = UserRole::parse(&payload.role)
        .ok_or_else(|| ApiError::Validation(format!("unknown role `{}`", payload.role)))?;
    let user = state
        .storage()
        .update_user_role(path.into_inner(), role)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

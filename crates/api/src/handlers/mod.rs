pub mod checkout;
pub mod contests;
pub mod metrics;
pub mod payments;
pub mod tasks;
pub mod users;

pub use checkout::{create_checkout_session_handler, payment_confirmation_handler};
pub use contests::{
    confirmed_contests_handler, contest_detail_handler, create_contest_handler,
    delete_contest_handler, list_contests_handler, update_contest_handler,
    update_contest_status_handler,
};
pub use metrics::metrics_handler;
pub use payments::list_payments_handler;
pub use tasks::{list_tasks_handler, submit_task_handler, update_winner_handler};
pub use users::{list_users_handler, register_user_handler, update_user_role_handler};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use contest_hub_domain::model::{health_message, EmailFormatError};
use contest_hub_domain::storage::StorageError;
use contest_hub_gateway::GatewayError;

pub async fn health_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(health_message())
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("permission denied")]
    Forbidden,
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    #[error("payment has not completed")]
    PaymentIncomplete,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("gateway failure: {0}")]
    Gateway(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StorageError> for ApiError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Duplicate(message) => ApiError::Conflict(message),
            StorageError::Database(message) => ApiError::Storage(message),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(value: GatewayError) -> Self {
        match value {
            // A session id nobody recognizes is the caller's problem, not an
            // upstream outage.
            GatewayError::SessionNotFound => ApiError::NotFound,
            other => ApiError::Gateway(other.to_string()),
        }
    }
}

impl From<EmailFormatError> for ApiError {
    fn from(value: EmailFormatError) -> Self {
        ApiError::Validation(value.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PaymentIncomplete => StatusCode::PAYMENT_REQUIRED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

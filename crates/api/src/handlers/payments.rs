use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use contest_hub_domain::model::PaymentRecord;
use contest_hub_domain::storage::PaymentStore;

use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: i32,
    pub transaction_id: String,
    pub contest_id: i32,
    pub amount: f64,
    pub currency: String,
    pub customer_email: String,
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id,
            transaction_id: record.transaction_id,
            contest_id: record.contest_id,
            amount: record.amount,
            currency: record.currency,
            customer_email: record.customer_email,
            payment_status: record.payment_status,
            paid_at: record.paid_at,
        }
    }
}

// TODO: decide whether this listing should chain the ownership guard the way
// /contests does; today any caller can read any customer's payment history.
pub async fn list_payments_handler(
    state: web::Data<AppState>,
    query: web::Query<PaymentListQuery>,
) -> Result<HttpResponse, ApiError> {
    let payments = state
        .storage()
        .list_payments_by_customer(&query.email)
        .await?;
    let body: Vec<PaymentResponse> = payments.into_iter().map(PaymentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

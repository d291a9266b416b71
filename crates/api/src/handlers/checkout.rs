use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;
use tracing::{info, warn};

use contest_hub_domain::model::{validate_email, NewPayment};
use contest_hub_domain::services::counter_sync::sync_payment_counts;
use contest_hub_domain::storage::{ContestStore, PaymentStore, StorageError};
use contest_hub_gateway::{CheckoutSession, CreateSessionRequest, LineItem};

use crate::state::AppState;

use super::ApiError;

const CHECKOUT_CURRENCY: &str = "usd";

#[derive(Debug, Deserialize, Serialize)]
pub struct CheckoutSessionRequest {
    /// Entry fee in major currency units.
    pub price: f64,
    pub contest_id: i32,
    pub contest_name: String,
    pub contest_deadline: String,
    pub customer_email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    /// Hosted payment page to redirect the browser to.
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfirmationStatus {
    Recorded,
    AlreadyProcessed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmationResponse {
    pub status: ConfirmationStatus,
    pub transaction_id: String,
    pub contest_updated: bool,
    pub payment_recorded: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmationQuery {
    pub session_id: String,
}

/// Opens a hosted checkout session for a contest entry fee. Nothing is
/// persisted here; the ledger only changes on confirmation.
pub async fn create_checkout_session_handler(
    state: web::Data<AppState>,
    payload: web::Json<CheckoutSessionRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = payload.into_inner();
    if !body.price.is_finite() || body.price <= 0.0 {
        counter!("api_checkout_sessions_total", "status" => "invalid_price").increment(1);
        return Err(ApiError::Validation(
            "price must be a positive amount".to_string(),
        ));
    }
    validate_email(&body.customer_email)?;

    let unit_amount = (body.price * 100.0).round() as i64;
    let mut metadata = HashMap::new();
    metadata.insert("contestId".to_string(), body.contest_id.to_string());
    metadata.insert("contestName".to_string(), body.contest_name.clone());
    metadata.insert("contestDeadline".to_string(), body.contest_deadline);

    let session = state
        .gateway()
        .create_session(CreateSessionRequest {
            line_item: LineItem {
                currency: CHECKOUT_CURRENCY.to_string(),
                unit_amount,
                product_name: body.contest_name,
            },
            customer_email: body.customer_email,
            metadata,
            // The gateway substitutes the placeholder with the real session id
            // on redirect.
            success_url: format!(
                "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
                state.client_origin()
            ),
            cancel_url: format!("{}/payment-cancelled", state.client_origin()),
        })
        .await?;

    counter!("api_checkout_sessions_total", "status" => "created").increment(1);
    Ok(HttpResponse::Ok().json(CheckoutSessionResponse { url: session.url }))
}

/// Reconciles a checkout session against the ledger. The gateway's view of
/// the session is the only trusted input; the client contributes nothing but
/// the session id. Replays and concurrent duplicates converge on
/// `already_processed` with a single ledger row.
pub async fn payment_confirmation_handler(
    state: web::Data<AppState>,
    query: web::Query<ConfirmationQuery>,
) -> Result<HttpResponse, ApiError> {
    let session = state.gateway().retrieve_session(&query.session_id).await?;
    let transaction_id = session
        .payment_intent
        .clone()
        .unwrap_or_else(|| session.id.clone());

    if state
        .storage()
        .find_payment_by_transaction(&transaction_id)
        .await?
        .is_some()
    {
        let status = ConfirmationStatus::AlreadyProcessed;
        let status_tag = status.as_ref().to_owned();
        counter!("api_payment_confirmations_total", "status" => status_tag).increment(1);
        return Ok(HttpResponse::Ok().json(ConfirmationResponse {
            status,
            transaction_id,
            contest_updated: false,
            payment_recorded: false,
        }));
    }

    if !session.payment_status.is_paid() {
        counter!("api_payment_confirmations_total", "status" => "unpaid").increment(1);
        return Err(ApiError::PaymentIncomplete);
    }

    let contest_id = parse_contest_id(&session)?;
    let Some(customer_email) = session.customer_email.clone() else {
        counter!("api_payment_confirmations_total", "status" => "invalid_metadata").increment(1);
        return Err(ApiError::Validation(
            "session is missing the customer email".to_string(),
        ));
    };

    // A vanished contest does not void the payment; the row still lands in
    // the ledger and the outcome flag reports the miss.
    let contest_updated = state.storage().mark_contest_paid(contest_id).await?;

    let insert = state
        .storage()
        .insert_payment(NewPayment {
            transaction_id: transaction_id.clone(),
            contest_id,
            amount: session.amount_total as f64 / 100.0,
            currency: session.currency.clone(),
            customer_email,
            payment_status: session.payment_status.as_str().to_string(),
            paid_at: Utc::now(),
        })
        .await;

    let record = match insert {
        Ok(record) => record,
        Err(StorageError::Duplicate(_)) => {
            // Lost the race against a concurrent confirmation of the same
            // session; the winner's row already enforces the invariant.
            let status = ConfirmationStatus::AlreadyProcessed;
            let status_tag = status.as_ref().to_owned();
            counter!("api_payment_confirmations_total", "status" => status_tag).increment(1);
            return Ok(HttpResponse::Ok().json(ConfirmationResponse {
                status,
                transaction_id,
                contest_updated,
                payment_recorded: false,
            }));
        }
        Err(other) => return Err(other.into()),
    };

    if let Err(err) = sync_payment_counts(state.storage()).await {
        // The next sync pass recomputes from the ledger, so a miss here only
        // delays the counter.
        warn!(error = %err, contest_id, "payment counter sync failed after insert");
    }

    let status = ConfirmationStatus::Recorded;
    let status_tag = status.as_ref().to_owned();
    counter!("api_payment_confirmations_total", "status" => status_tag).increment(1);
    info!(
        transaction_id = %record.transaction_id,
        contest_id,
        amount = record.amount,
        "payment recorded"
    );
    Ok(HttpResponse::Ok().json(ConfirmationResponse {
        status,
        transaction_id,
        contest_updated,
        payment_recorded: true,
    }))
}

fn parse_contest_id(session: &CheckoutSession) -> Result<i32, ApiError> {
    let raw = session.metadata.get("contestId").ok_or_else(|| {
        counter!("api_payment_confirmations_total", "status" => "invalid_metadata").increment(1);
        ApiError::Validation("session metadata is missing contestId".to_string())
    })?;
    raw.parse::<i32>().map_err(|_| {
        counter!("api_payment_confirmations_total", "status" => "invalid_metadata").increment(1);
        ApiError::Validation(format!("session metadata contestId `{raw}` is not an id"))
    })
}

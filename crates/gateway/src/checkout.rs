//! Contract with the hosted checkout gateway.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// One purchasable line in a checkout session. Amounts are minor units
/// (cents for USD).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub currency: String,
    pub unit_amount: i64,
    pub product_name: String,
}

/// Inputs for creating a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionRequest {
    pub line_item: LineItem,
    pub customer_email: String,
    /// Opaque key/value pairs echoed back verbatim when the session is
    /// retrieved. Reconciliation reads the contest reference out of these.
    pub metadata: HashMap<String, String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// Session handle returned by the gateway right after creation. `url` is the
/// hosted payment page the browser gets redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub id: String,
    pub url: String,
}

/// Settlement state the gateway reports for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
}

impl SessionPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::NoPaymentRequired => "no_payment_required",
        }
    }

    /// Whether money actually settled. `NoPaymentRequired` does not count:
    /// nothing was collected, so nothing may be reconciled.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// A checkout session as reported by the gateway's retrieve endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Identifier of the underlying payment, present once the session has
    /// been completed. Falls back to the session id as a transaction key.
    pub payment_intent: Option<String>,
    pub payment_status: SessionPaymentStatus,
    /// Total charged, in minor units.
    pub amount_total: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Failures surfaced by the checkout gateway client.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("checkout session not found")]
    SessionNotFound,
    #[error("gateway rejected the request: {0}")]
    Rejected(String),
    #[error("gateway transport failure: {0}")]
    Transport(String),
    #[error("gateway response is missing `{0}`")]
    MalformedResponse(&'static str),
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CreatedSession, GatewayError>;

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError>;
}

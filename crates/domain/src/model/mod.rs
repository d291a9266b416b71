//! Data structures shared across the API, gateway, and storage crates.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Returns the static greeting served on the root route.
pub fn health_message() -> &'static str {
    "contest hub server running!"
}

/// Errors emitted when user-supplied email addresses fail validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailFormatError {
    #[error("email address must not be empty")]
    Empty,
    #[error("email address must contain a local part and a domain")]
    Malformed,
}

/// Validates the minimal shape of an email address: a non-empty local part
/// and domain around a single `@`. The identity provider owns real
/// verification; this only rejects obviously broken input.
pub fn validate_email(email: &str) -> Result<(), EmailFormatError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(EmailFormatError::Empty);
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(EmailFormatError::Malformed),
    }
}

/// Review state a contest moves through in the admin workflow. New contests
/// always start out `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContestStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl ContestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Whether a settled payment has been reconciled against the contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Unset,
    Paid,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Paid => "paid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unset" => Some(Self::Unset),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinnerStatus {
    Pending,
    Winner,
}

impl WinnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Winner => "winner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "winner" => Some(Self::Winner),
            _ => None,
        }
    }
}

/// A contest as stored, including the derived `payment_count` that the sync
/// service keeps consistent with the payment ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Contest {
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
    pub status: ContestStatus,
    pub payment_state: PaymentState,
    pub payment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Inputs for creating a contest. Status starts `Pending` and the payment
/// fields start empty regardless of what the caller sends.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContest {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub prize_money: f64,
    pub task_instruction: String,
    pub contest_type: String,
    pub deadline: DateTime<Utc>,
    pub creator_email: String,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a contest's editable fields. `None` leaves the stored
/// value untouched; review status and payment fields are managed through
/// their own operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContestUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub prize_money: Option<f64>,
    pub task_instruction: Option<String>,
    pub contest_type: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Inputs for registering a user. Every new user starts with the `User` role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One settled payment, keyed by the gateway transaction id. The unique
/// constraint on that id is what makes recording idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: i32,
    pub transaction_id: String,
    pub contest_id: i32,
    pub amount: f64,
    pub currency: String,
    pub customer_email: String,
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub transaction_id: String,
    pub contest_id: i32,
    pub amount: f64,
    pub currency: String,
    pub customer_email: String,
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
}

/// A participant's submission for a contest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i32,
    pub contest_id: i32,
    pub participant_email: String,
    pub submission_url: String,
    pub winner_status: WinnerStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub contest_id: i32,
    pub participant_email: String,
    pub submission_url: String,
    pub submitted_at: DateTime<Utc>,
}

/// Aggregated payment count for one contest, as produced by the ledger
/// aggregation and consumed by the counter sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestCounter {
    pub contest_id: i32,
    pub payments: i64,
}

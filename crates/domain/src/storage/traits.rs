use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    Contest, ContestCounter, ContestStatus, ContestUpdate, NewContest, NewPayment, NewTask,
    NewUser, PaymentRecord, Task, User, UserRole, WinnerStatus,
};

/// Common result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    /// A unique constraint rejected the write. Callers that treat duplicate
    /// inserts as "already done" branch on this variant.
    #[error("duplicate record: {0}")]
    Duplicate(String),
}

impl StorageError {
    pub fn from_source(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait]
pub trait ContestStore: Send + Sync {
    async fn insert_contest(&self, contest: NewContest) -> StorageResult<Contest>;
    async fn find_contest(&self, id: i32) -> StorageResult<Option<Contest>>;
    /// Lists contests, optionally narrowed to one creator's email.
    async fn list_contests(&self, creator_email: Option<&str>) -> StorageResult<Vec<Contest>>;
    /// Lists confirmed contests, most-paid-for first.
    async fn list_confirmed_contests(&self) -> StorageResult<Vec<Contest>>;
    async fn update_contest(
        &self,
        id: i32,
        update: ContestUpdate,
    ) -> StorageResult<Option<Contest>>;
    async fn update_contest_status(
        &self,
        id: i32,
        status: ContestStatus,
    ) -> StorageResult<Option<Contest>>;
    /// Flags the contest as paid for. Returns `false` when no such contest
    /// exists.
    async fn mark_contest_paid(&self, id: i32) -> StorageResult<bool>;
    async fn delete_contest(&self, id: i32) -> StorageResult<bool>;
    /// Overwrites `payment_count` for every contest named in `counters`,
    /// returning the number of rows written.
    async fn apply_payment_counts(&self, counters: &[ContestCounter]) -> StorageResult<u64>;
    /// Resets `payment_count` to zero for contests *not* in `contest_ids`,
    /// returning how many stale counters were actually changed.
    async fn zero_payment_counts_excluding(&self, contest_ids: &[i32]) -> StorageResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts the user unless the email is already registered. Returns the
    /// created row, or `None` when the email existed before the call.
    async fn insert_user_if_absent(&self, user: NewUser) -> StorageResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;
    async fn find_user(&self, id: i32) -> StorageResult<Option<User>>;
    async fn list_users(&self) -> StorageResult<Vec<User>>;
    async fn update_user_role(&self, id: i32, role: UserRole) -> StorageResult<Option<User>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Appends a payment to the ledger. A repeated transaction id surfaces as
    /// `StorageError::Duplicate`.
    async fn insert_payment(&self, payment: NewPayment) -> StorageResult<PaymentRecord>;
    async fn find_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> StorageResult<Option<PaymentRecord>>;
    async fn list_payments_by_customer(&self, email: &str) -> StorageResult<Vec<PaymentRecord>>;
    async fn list_payments_by_contest(&self, contest_id: i32)
        -> StorageResult<Vec<PaymentRecord>>;
    /// Counts ledger entries per contest. Contests with no payments do not
    /// appear in the result.
    async fn count_payments_by_contest(&self) -> StorageResult<Vec<ContestCounter>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: NewTask) -> StorageResult<Task>;
    async fn list_tasks_by_contest(&self, contest_id: i32) -> StorageResult<Vec<Task>>;
    async fn update_winner_status(
        &self,
        id: i32,
        status: WinnerStatus,
    ) -> StorageResult<Option<Task>>;
}

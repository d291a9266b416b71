use metrics::{counter, gauge};
use tracing::info;

use crate::storage::{ContestStore, PaymentStore, StorageResult};

/// Summary of one counter recomputation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Contests whose counter was written from a fresh ledger aggregate.
    pub applied: u64,
    /// Contests whose stale counter was reset to zero.
    pub zeroed: u64,
}

/// Rebuilds every contest's `payment_count` from the payment ledger.
///
/// The pass overwrites rather than increments: it aggregates the ledger,
/// writes the aggregate over the counters, and zeroes every contest the
/// aggregate did not mention. Running it twice in a row converges to the
/// same state, so it is safe to trigger after every recorded payment and
/// from any repair path.
pub async fn sync_payment_counts<S>(store: &S) -> StorageResult<SyncReport>
where
    S: PaymentStore + ContestStore + ?Sized,
{
    let counters = store.count_payments_by_contest().await?;
    let applied = store.apply_payment_counts(&counters).await?;

    let seen: Vec<i32> = counters.iter().map(|entry| entry.contest_id).collect();
    let zeroed = store.zero_payment_counts_excluding(&seen).await?;

    counter!("payment_counter_syncs_total").increment(1);
    gauge!("payment_counters_synced").set(seen.len() as f64);
    info!(applied, zeroed, "payment counters recomputed");

    Ok(SyncReport { applied, zeroed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Contest, ContestCounter, ContestStatus, ContestUpdate, NewContest, NewPayment,
        PaymentRecord, PaymentState,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory stand-in for the two stores the sync touches. Counters live
    /// in a map keyed by contest id; the ledger aggregate is fixed up front.
    struct MockStorage {
        counters: Mutex<HashMap<i32, i64>>,
        ledger_counts: Vec<ContestCounter>,
    }

    impl MockStorage {
        fn new(counters: &[(i32, i64)], ledger_counts: &[(i32, i64)]) -> Self {
            Self {
                counters: Mutex::new(counters.iter().copied().collect()),
                ledger_counts: ledger_counts
                    .iter()
                    .map(|(contest_id, payments)| ContestCounter {
                        contest_id: *contest_id,
                        payments: *payments,
                    })
                    .collect(),
            }
        }

        fn counter(&self, contest_id: i32) -> Option<i64> {
            self.counters.lock().unwrap().get(&contest_id).copied()
        }
    }

    #[async_trait]
    impl PaymentStore for MockStorage {
        async fn insert_payment(&self, payment: NewPayment) -> StorageResult<PaymentRecord> {
            Ok(PaymentRecord {
                id: 0,
                transaction_id: payment.transaction_id,
                contest_id: payment.contest_id,
                amount: payment.amount,
                currency: payment.currency,
                customer_email: payment.customer_email,
                payment_status: payment.payment_status,
                paid_at: payment.paid_at,
            })
        }

        async fn find_payment_by_transaction(
            &self,
            _transaction_id: &str,
        ) -> StorageResult<Option<PaymentRecord>> {
            Ok(None)
        }

        async fn list_payments_by_customer(
            &self,
            _email: &str,
        ) -> StorageResult<Vec<PaymentRecord>> {
            Ok(Vec::new())
        }

        async fn list_payments_by_contest(
            &self,
            _contest_id: i32,
        ) -> StorageResult<Vec<PaymentRecord>> {
            Ok(Vec::new())
        }

        async fn count_payments_by_contest(&self) -> StorageResult<Vec<ContestCounter>> {
            Ok(self.ledger_counts.clone())
        }
    }

    #[async_trait]
    impl ContestStore for MockStorage {
        async fn insert_contest(&self, contest: NewContest) -> StorageResult<Contest> {
            Ok(Contest {
                id: 0,
                name: contest.name,
                description: contest.description,
                image: contest.image,
                price: contest.price,
                prize_money: contest.prize_money,
                task_instruction: contest.task_instruction,
                contest_type: contest.contest_type,
                deadline: contest.deadline,
                creator_email: contest.creator_email,
                status: ContestStatus::Pending,
                payment_state: PaymentState::Unset,
                payment_count: 0,
                created_at: contest.created_at,
            })
        }

        async fn find_contest(&self, _id: i32) -> StorageResult<Option<Contest>> {
            Ok(None)
        }

        async fn list_contests(&self, _creator_email: Option<&str>) -> StorageResult<Vec<Contest>> {
            Ok(Vec::new())
        }

        async fn list_confirmed_contests(&self) -> StorageResult<Vec<Contest>> {
            Ok(Vec::new())
        }

        async fn update_contest(
            &self,
            _id: i32,
            _update: ContestUpdate,
        ) -> StorageResult<Option<Contest>> {
            Ok(None)
        }

        async fn update_contest_status(
            &self,
            _id: i32,
            _status: ContestStatus,
        ) -> StorageResult<Option<Contest>> {
            Ok(None)
        }

        async fn mark_contest_paid(&self, _id: i32) -> StorageResult<bool> {
            Ok(false)
        }

        async fn delete_contest(&self, _id: i32) -> StorageResult<bool> {
            Ok(false)
        }

        async fn apply_payment_counts(&self, counters: &[ContestCounter]) -> StorageResult<u64> {
            let mut guard = self.counters.lock().unwrap();
            let mut applied = 0;
            for entry in counters {
                if let Some(count) = guard.get_mut(&entry.contest_id) {
                    *count = entry.payments;
                    applied += 1;
                }
            }
            Ok(applied)
        }

        async fn zero_payment_counts_excluding(&self, contest_ids: &[i32]) -> StorageResult<u64> {
            let mut guard = self.counters.lock().unwrap();
            let mut zeroed = 0;
            for (id, count) in guard.iter_mut() {
                if !contest_ids.contains(id) && *count != 0 {
                    *count = 0;
                    zeroed += 1;
                }
            }
            Ok(zeroed)
        }
    }

    #[tokio::test]
    async fn recomputes_counters_from_ledger() {
        let storage = MockStorage::new(&[(1, 7), (2, 0), (3, 5)], &[(1, 2), (2, 1)]);

        let report = sync_payment_counts(&storage).await.expect("sync succeeds");

        assert_eq!(report, SyncReport { applied: 2, zeroed: 1 });
        assert_eq!(storage.counter(1), Some(2));
        assert_eq!(storage.counter(2), Some(1));
        assert_eq!(storage.counter(3), Some(0));
    }

    #[tokio::test]
    async fn rerunning_the_sync_changes_nothing() {
        let storage = MockStorage::new(&[(1, 7), (2, 0), (3, 5)], &[(1, 2), (2, 1)]);

        sync_payment_counts(&storage).await.expect("first sync");
        let report = sync_payment_counts(&storage).await.expect("second sync");

        assert_eq!(report, SyncReport { applied: 2, zeroed: 0 });
        assert_eq!(storage.counter(1), Some(2));
        assert_eq!(storage.counter(2), Some(1));
        assert_eq!(storage.counter(3), Some(0));
    }

    #[tokio::test]
    async fn empty_ledger_resets_every_counter() {
        let storage = MockStorage::new(&[(1, 4), (2, 0)], &[]);

        let report = sync_payment_counts(&storage).await.expect("sync succeeds");

        assert_eq!(report, SyncReport { applied: 0, zeroed: 1 });
        assert_eq!(storage.counter(1), Some(0));
        assert_eq!(storage.counter(2), Some(0));
    }
}

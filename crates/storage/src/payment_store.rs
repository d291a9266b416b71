use contest_hub_domain::model::{ContestCounter, NewPayment, PaymentRecord};
use contest_hub_domain::storage::{PaymentStore, StorageResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::payments;
use crate::errors::map_db_err;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl PaymentStore for SeaOrmStorage {
    async fn insert_payment(&self, payment: NewPayment) -> StorageResult<PaymentRecord> {
        let model = payments::ActiveModel {
            transaction_id: Set(payment.transaction_id),
            contest_id: Set(payment.contest_id),
            amount: Set(payment.amount),
            currency: Set(payment.currency),
            customer_email: Set(payment.customer_email),
            payment_status: Set(payment.payment_status),
            paid_at: Set(payment.paid_at),
            ..Default::default()
        };
        // The unique index on transaction_id rejects replays; map_db_err turns
        // that into StorageError::Duplicate for the caller.
        let created = model.insert(self.connection()).await.map_err(map_db_err)?;
        Ok(payment_from_model(created))
    }

    async fn find_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> StorageResult<Option<PaymentRecord>> {
        let maybe = payments::Entity::find()
            .filter(payments::Column::TransactionId.eq(transaction_id))
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(maybe.map(payment_from_model))
    }

    async fn list_payments_by_customer(&self, email: &str) -> StorageResult<Vec<PaymentRecord>> {
        let rows = payments::Entity::find()
            .filter(payments::Column::CustomerEmail.eq(email))
            .order_by_desc(payments::Column::PaidAt)
            .order_by_desc(payments::Column::Id)
            .all(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(payment_from_model).collect())
    }

    async fn list_payments_by_contest(
        &self,
        contest_id: i32,
    ) -> StorageResult<Vec<PaymentRecord>> {
        let rows = payments::Entity::find()
            .filter(payments::Column::ContestId.eq(contest_id))
            .order_by_desc(payments::Column::PaidAt)
            .order_by_desc(payments::Column::Id)
            .all(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(payment_from_model).collect())
    }

    async fn count_payments_by_contest(&self) -> StorageResult<Vec<ContestCounter>> {
        let rows = payments::Entity::find()
            .select_only()
            .column(payments::Column::ContestId)
            .column_as(payments::Column::Id.count(), "payments")
            .group_by(payments::Column::ContestId)
            .order_by_asc(payments::Column::ContestId)
            .into_model::<CounterRow>()
            .all(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(rows
            .into_iter()
            .map(|row| ContestCounter {
                contest_id: row.contest_id,
                payments: row.payments,
            })
            .collect())
    }
}

#[derive(FromQueryResult)]
struct CounterRow {
    contest_id: i32,
    payments: i64,
}

fn payment_from_model(model: payments::Model) -> PaymentRecord {
    PaymentRecord {
        id: model.id,
        transaction_id: model.transaction_id,
        contest_id: model.contest_id,
        amount: model.amount,
        currency: model.currency,
        customer_email: model.customer_email,
        payment_status: model.payment_status,
        paid_at: model.paid_at,
    }
}

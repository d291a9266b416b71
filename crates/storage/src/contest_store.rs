use contest_hub_domain::model::{
    Contest, ContestCounter, ContestStatus, ContestUpdate, NewContest, PaymentState,
};
use contest_hub_domain::storage::{ContestStore, StorageResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::contests::{self, ContestStatusDb, PaymentStateDb};
use crate::errors::map_db_err;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl ContestStore for SeaOrmStorage {
    async fn insert_contest(&self, contest: NewContest) -> StorageResult<Contest> {
        let model = contests::ActiveModel {
            name: Set(contest.name),
            description: Set(contest.description),
            image: Set(contest.image),
            price: Set(contest.price),
            prize_money: Set(contest.prize_money),
            task_instruction: Set(contest.task_instruction),
            contest_type: Set(contest.contest_type),
            deadline: Set(contest.deadline),
            creator_email: Set(contest.creator_email),
            status: Set(ContestStatusDb::Pending),
            payment_state: Set(PaymentStateDb::Unset),
            payment_count: Set(0),
            created_at: Set(contest.created_at),
            ..Default::default()
        };
        let created = model.insert(self.connection()).await.map_err(map_db_err)?;
        Ok(contest_from_model(created))
    }

    async fn find_contest(&self, id: i32) -> StorageResult<Option<Contest>> {
        let maybe = contests::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(maybe.map(contest_from_model))
    }

    async fn list_contests(&self, creator_email: Option<&str>) -> StorageResult<Vec<Contest>> {
        let mut query = contests::Entity::find();
        if let Some(email) = creator_email {
            query = query.filter(contests::Column::CreatorEmail.eq(email));
        }
        let rows = query
            .order_by_asc(contests::Column::Id)
            .all(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(contest_from_model).collect())
    }

    async fn list_confirmed_contests(&self) -> StorageResult<Vec<Contest>> {
        let rows = contests::Entity::find()
            .filter(contests::Column::Status.eq(ContestStatusDb::Confirmed))
            .order_by_desc(contests::Column::PaymentCount)
            .order_by_asc(contests::Column::Id)
            .all(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(contest_from_model).collect())
    }

    async fn update_contest(
        &self,
        id: i32,
        update: ContestUpdate,
    ) -> StorageResult<Option<Contest>> {
        let maybe = contests::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        let mut active: contests::ActiveModel = model.clone().into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(image) = update.image {
            active.image = Set(image);
        }
        if let Some(price) = update.price {
            active.price = Set(price);
        }
        if let Some(prize_money) = update.prize_money {
            active.prize_money = Set(prize_money);
        }
        if let Some(task_instruction) = update.task_instruction {
            active.task_instruction = Set(task_instruction);
        }
        if let Some(contest_type) = update.contest_type {
            active.contest_type = Set(contest_type);
        }
        if let Some(deadline) = update.deadline {
            active.deadline = Set(deadline);
        }
        // An all-empty patch would otherwise build an UPDATE with no values.
        if !active.is_changed() {
            return Ok(Some(contest_from_model(model)));
        }
        let updated = active.update(self.connection()).await.map_err(map_db_err)?;
        Ok(Some(contest_from_model(updated)))
    }

    async fn update_contest_status(
        &self,
        id: i32,
        status: ContestStatus,
    ) -> StorageResult<Option<Contest>> {
        let maybe = contests::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        let mut active: contests::ActiveModel = model.into();
        active.status = Set(status_to_db(status));
        let updated = active.update(self.connection()).await.map_err(map_db_err)?;
        Ok(Some(contest_from_model(updated)))
    }

    async fn mark_contest_paid(&self, id: i32) -> StorageResult<bool> {
        let result = contests::Entity::update_many()
            .col_expr(
                contests::Column::PaymentState,
                Expr::value(PaymentStateDb::Paid.to_value()),
            )
            .filter(contests::Column::Id.eq(id))
            .exec(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_contest(&self, id: i32) -> StorageResult<bool> {
        let result = contests::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn apply_payment_counts(&self, counters: &[ContestCounter]) -> StorageResult<u64> {
        let mut written = 0;
        for counter in counters {
            let result = contests::Entity::update_many()
                .col_expr(contests::Column::PaymentCount, Expr::value(counter.payments))
                .filter(contests::Column::Id.eq(counter.contest_id))
                .exec(self.connection())
                .await
                .map_err(map_db_err)?;
            written += result.rows_affected;
        }
        Ok(written)
    }

    async fn zero_payment_counts_excluding(&self, contest_ids: &[i32]) -> StorageResult<u64> {
        // An empty exclusion list renders as a constant-true predicate, so
        // every non-zero counter gets reset.
        let result = contests::Entity::update_many()
            .col_expr(contests::Column::PaymentCount, Expr::value(0_i64))
            .filter(contests::Column::Id.is_not_in(contest_ids.iter().copied()))
            .filter(contests::Column::PaymentCount.ne(0_i64))
            .exec(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }
}

fn contest_from_model(model: contests::Model) -> Contest {
    Contest {
        id: model.id,
        name: model.name,
        description: model.description,
        image: model.image,
        price: model.price,
        prize_money: model.prize_money,
        task_instruction: model.task_instruction,
        contest_type: model.contest_type,
        deadline: model.deadline,
        creator_email: model.creator_email,
        status: match model.status {
            ContestStatusDb::Pending => ContestStatus::Pending,
            ContestStatusDb::Confirmed => ContestStatus::Confirmed,
            ContestStatusDb::Rejected => ContestStatus::Rejected,
        },
        payment_state: match model.payment_state {
            PaymentStateDb::Unset => PaymentState::Unset,
            PaymentStateDb::Paid => PaymentState::Paid,
        },
        payment_count: model.payment_count,
        created_at: model.created_at,
    }
}

fn status_to_db(status: ContestStatus) -> ContestStatusDb {
    match status {
        ContestStatus::Pending => ContestStatusDb::Pending,
        ContestStatus::Confirmed => ContestStatusDb::Confirmed,
        ContestStatus::Rejected => ContestStatusDb::Rejected,
    }
}

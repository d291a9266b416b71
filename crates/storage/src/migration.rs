use sea_orm::sea_query::{ColumnDef, Expr, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};

use crate::entity::{contests, payments, tasks, users};
use crate::errors::map_db_err;
use contest_hub_domain::storage::StorageResult;

pub async fn run_migrations(db: &DatabaseConnection) -> StorageResult<()> {
    let backend = db.get_database_backend();

    let contests_table = Table::create()
        .if_not_exists()
        .table(contests::Entity)
        .col(
            ColumnDef::new(contests::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(contests::Column::Name).string().not_null())
        .col(
            ColumnDef::new(contests::Column::Description)
                .text()
                .not_null(),
        )
        .col(ColumnDef::new(contests::Column::Image).text().not_null())
        .col(ColumnDef::new(contests::Column::Price).double().not_null())
        .col(
            ColumnDef::new(contests::Column::PrizeMoney)
                .double()
                .not_null(),
        )
        .col(
            ColumnDef::new(contests::Column::TaskInstruction)
                .text()
                .not_null(),
        )
        .col(
            ColumnDef::new(contests::Column::ContestType)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(contests::Column::Deadline)
                .date_time()
                .not_null(),
        )
        .col(
            ColumnDef::new(contests::Column::CreatorEmail)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(contests::Column::Status)
                .string_len(16)
                .not_null(),
        )
        .col(
            ColumnDef::new(contests::Column::PaymentState)
                .string_len(16)
                .not_null(),
        )
        .col(
            ColumnDef::new(contests::Column::PaymentCount)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(contests::Column::CreatedAt)
                .date_time()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned();
    create_table(db, backend, contests_table).await?;

    let users_table = Table::create()
        .if_not_exists()
        .table(users::Entity)
        .col(
            ColumnDef::new(users::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(users::Column::Email)
                .string()
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(users::Column::Role)
                .string_len(16)
                .not_null(),
        )
        .col(
            ColumnDef::new(users::Column::CreatedAt)
                .date_time()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned();
    create_table(db, backend, users_table).await?;

    // The unique transaction id is what turns a replayed confirmation into a
    // no-op instead of a second ledger entry.
    let payments_table = Table::create()
        .if_not_exists()
        .table(payments::Entity)
        .col(
            ColumnDef::new(payments::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(payments::Column::TransactionId)
                .string()
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(payments::Column::ContestId)
                .integer()
                .not_null(),
        )
        .col(ColumnDef::new(payments::Column::Amount).double().not_null())
        .col(
            ColumnDef::new(payments::Column::Currency)
                .string_len(8)
                .not_null(),
        )
        .col(
            ColumnDef::new(payments::Column::CustomerEmail)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(payments::Column::PaymentStatus)
                .string_len(32)
                .not_null(),
        )
        .col(
            ColumnDef::new(payments::Column::PaidAt)
                .date_time()
                .not_null(),
        )
        .to_owned();
    create_table(db, backend, payments_table).await?;

    let tasks_table = Table::create()
        .if_not_exists()
        .table(tasks::Entity)
        .col(
            ColumnDef::new(tasks::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(tasks::Column::ContestId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(tasks::Column::ParticipantEmail)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(tasks::Column::SubmissionUrl)
                .text()
                .not_null(),
        )
        .col(
            ColumnDef::new(tasks::Column::WinnerStatus)
                .string_len(16)
                .not_null(),
        )
        .col(
            ColumnDef::new(tasks::Column::SubmittedAt)
                .date_time()
                .not_null(),
        )
        .to_owned();
    create_table(db, backend, tasks_table).await?;

    Ok(())
}

async fn create_table(
    db: &DatabaseConnection,
    backend: DatabaseBackend,
    mut statement: TableCreateStatement,
) -> StorageResult<()> {
    statement.if_not_exists();
    db.execute(backend.build(&statement))
        .await
        .map_err(map_db_err)?;
    Ok(())
}

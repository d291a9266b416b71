use contest_hub_domain::model::{NewTask, Task, WinnerStatus};
use contest_hub_domain::storage::{StorageResult, TaskStore};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::tasks::{self, WinnerStatusDb};
use crate::errors::map_db_err;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl TaskStore for SeaOrmStorage {
    async fn insert_task(&self, task: NewTask) -> StorageResult<Task> {
        let model = tasks::ActiveModel {
            contest_id: Set(task.contest_id),
            participant_email: Set(task.participant_email),
            submission_url: Set(task.submission_url),
            winner_status: Set(WinnerStatusDb::Pending),
            submitted_at: Set(task.submitted_at),
            ..Default::default()
        };
        let created = model.insert(self.connection()).await.map_err(map_db_err)?;
        Ok(task_from_model(created))
    }

    async fn list_tasks_by_contest(&self, contest_id: i32) -> StorageResult<Vec<Task>> {
        let rows = tasks::Entity::find()
            .filter(tasks::Column::ContestId.eq(contest_id))
            .order_by_asc(tasks::Column::Id)
            .all(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(task_from_model).collect())
    }

    async fn update_winner_status(
        &self,
        id: i32,
        status: WinnerStatus,
    ) -> StorageResult<Option<Task>> {
        let maybe = tasks::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        let mut active: tasks::ActiveModel = model.into();
        active.winner_status = Set(match status {
            WinnerStatus::Pending => WinnerStatusDb::Pending,
            WinnerStatus::Winner => WinnerStatusDb::Winner,
        });
        let updated = active.update(self.connection()).await.map_err(map_db_err)?;
        Ok(Some(task_from_model(updated)))
    }
}

fn task_from_model(model: tasks::Model) -> Task {
    Task {
        id: model.id,
        contest_id: model.contest_id,
        participant_email: model.participant_email,
        submission_url: model.submission_url,
        winner_status: match model.winner_status {
            WinnerStatusDb::Pending => WinnerStatus::Pending,
            WinnerStatusDb::Winner => WinnerStatus::Winner,
        },
        submitted_at: model.submitted_at,
    }
}

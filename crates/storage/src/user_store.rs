use contest_hub_domain::model::{NewUser, User, UserRole};
use contest_hub_domain::storage::{StorageError, StorageResult, UserStore};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::users::{self, UserRoleDb};
use crate::errors::map_db_err;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl UserStore for SeaOrmStorage {
    async fn insert_user_if_absent(&self, user: NewUser) -> StorageResult<Option<User>> {
        let email = user.email.clone();
        let model = users::ActiveModel {
            email: Set(user.email),
            role: Set(UserRoleDb::User),
            created_at: Set(user.created_at),
            ..Default::default()
        };
        let inserted = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await
            .map_err(map_db_err)?;
        if inserted == 0 {
            return Ok(None);
        }

        let created = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        let Some(created) = created else {
            return Err(StorageError::Database(format!(
                "user {email} vanished after insert"
            )));
        };
        Ok(Some(user_from_model(created)))
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let maybe = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(maybe.map(user_from_model))
    }

    async fn find_user(&self, id: i32) -> StorageResult<Option<User>> {
        let maybe = users::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(maybe.map(user_from_model))
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(self.connection())
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(user_from_model).collect())
    }

    async fn update_user_role(&self, id: i32, role: UserRole) -> StorageResult<Option<User>> {
        let maybe = users::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(map_db_err)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = model.into();
        active.role = Set(role_to_db(role));
        let updated = active.update(self.connection()).await.map_err(map_db_err)?;
        Ok(Some(user_from_model(updated)))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        role: match model.role {
            UserRoleDb::User => UserRole::User,
            UserRoleDb::Admin => UserRole::Admin,
        },
        created_at: model.created_at,
    }
}

fn role_to_db(role: UserRole) -> UserRoleDb {
    match role {
        UserRole::User => UserRoleDb::User,
        UserRole::Admin => UserRoleDb::Admin,
    }
}

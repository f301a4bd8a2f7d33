use crate::error::Result;
use crate::user::{User, entity, join_roles};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every user, ordered by id ascending.
    async fn find_all(&self) -> Result<Vec<User>>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>>;
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>>;
    async fn create(&self, identifier: &str, roles: &[String]) -> Result<User>;
    /// Returns `None` when no user has that id.
    async fn update(&self, id: i32, identifier: &str, roles: &[String]) -> Result<Option<User>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool>;
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self) -> Result<Vec<User>> {
        let users = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(user.map(User::from))
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let user = entity::Entity::find()
            .filter(entity::Column::Identifier.eq(identifier))
            .one(&self.db)
            .await?;
        Ok(user.map(User::from))
    }

    async fn create(&self, identifier: &str, roles: &[String]) -> Result<User> {
        let user = entity::ActiveModel {
            identifier: ActiveValue::Set(identifier.to_string()),
            roles: ActiveValue::Set(join_roles(roles)),
            ..Default::default()
        };
        let user = user.insert(&self.db).await?;
        tracing::info!(user_id = user.id, identifier, "user created");
        Ok(user.into())
    }

    async fn update(&self, id: i32, identifier: &str, roles: &[String]) -> Result<Option<User>> {
        let user = match entity::Entity::find_by_id(id).one(&self.db).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let mut user_am = user.into_active_model();
        user_am.identifier = ActiveValue::Set(identifier.to_string());
        user_am.roles = ActiveValue::Set(join_roles(roles));
        let user = user_am.update(&self.db).await?;
        tracing::info!(user_id = user.id, identifier, "user updated");

        Ok(Some(user.into()))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected > 0 {
            tracing::info!(user_id = id, "user removed");
        }
        Ok(result.rows_affected > 0)
    }
}

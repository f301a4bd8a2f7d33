//! User accounts stored through sea-orm.

pub mod entity;
mod repository;

pub use repository::{SeaOrmUserRepository, UserRepository};

use crate::security::Identity;
use sea_orm::{ConnectionTrait, DbErr, Schema};

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub identifier: String,
    pub roles: Vec<String>,
    pub google_id: Option<String>,
    pub github_id: Option<String>,
}

impl From<entity::Model> for User {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            identifier: model.identifier,
            roles: split_roles(&model.roles),
            google_id: model.google_id,
            github_id: model.github_id,
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity::new(user.id, user.identifier.clone(), user.roles.clone())
    }
}

pub(crate) fn join_roles(roles: &[String]) -> String {
    roles.join(",")
}

pub(crate) fn split_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create the user table if it does not exist yet.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());
    let mut stmt = schema.create_table_from_entity(entity::Entity);
    stmt.if_not_exists();
    db.execute(&stmt).await?;
    tracing::info!("user table ready");
    Ok(())
}

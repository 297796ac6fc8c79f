//! Screams posted by users, the text memes are generated from.

use chrono::Utc;
use sea_orm::{ActiveValue::Set, entity::prelude::*};

use crate::error::MemeError;
use crate::upstream::ScreamStore;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "screams")]
/// A stored scream
pub struct Model {
    #[sea_orm(primary_key)]
    /// db id
    pub id: i32,
    /// Telegram id of the author
    pub user_id: i64,
    /// the scream itself
    #[sea_orm(column_type = "Text")]
    pub text: String,
    /// when it was posted
    pub created_at: DateTime,
}

/// screams have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Stores a new scream and returns it.
pub async fn create(
    db: &impl ConnectionTrait,
    user_id: i64,
    text: &str,
) -> Result<Model, MemeError> {
    let active = ActiveModel {
        user_id: Set(user_id),
        text: Set(text.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    Ok(active.insert(db).await?)
}

impl ScreamStore for DatabaseConnection {
    async fn scream_text(&self, scream_id: i32) -> Result<String, MemeError> {
        Entity::find_by_id(scream_id)
            .one(self)
            .await?
            .map(|scream| scream.text)
            .ok_or(MemeError::ScreamNotFound(scream_id))
    }
}

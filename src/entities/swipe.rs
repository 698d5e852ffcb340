use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Directional like/dislike edge between two users.
///
/// At most one row exists per ordered (from, to) pair; re-swiping updates
/// `like` in place. Matches are computed per user, not per listing.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "swipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub from_user_id: i32,
    pub to_user_id: i32,
    pub like: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FromUserId",
        to = "super::user::Column::Id"
    )]
    FromUser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ToUserId",
        to = "super::user::Column::Id"
    )]
    ToUser,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Undirected match between two users, stored canonically with
/// `user1_id < user2_id` so the pair is unique regardless of like order.
/// Inactive matches are invisible to message operations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user1_id: i32,
    pub user2_id: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether `user_id` is one of the two participants.
    #[must_use]
    pub const fn has_participant(&self, user_id: i32) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The other participant relative to `user_id`.
    #[must_use]
    pub const fn other_participant(&self, user_id: i32) -> i32 {
        if self.user1_id == user_id {
            self.user2_id
        } else {
            self.user1_id
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::User1Id",
        to = "super::user::Column::Id"
    )]
    User1,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::User2Id",
        to = "super::user::Column::Id"
    )]
    User2,
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

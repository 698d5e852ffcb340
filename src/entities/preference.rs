use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Onboarding preferences, 1:1 with a user.
///
/// `types` is a comma-joined set of need types; elements must not contain
/// commas. Only the onboarding flow mutates this row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub online: bool,
    pub offline: bool,
    pub group_classes: bool,
    pub city: Option<String>,
    pub hourly_rate: Option<f64>,
    pub types: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

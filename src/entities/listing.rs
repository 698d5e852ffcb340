use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A tutor's offering, the source of listing cards in the feed.
///
/// The onboarding flow keeps at most one listing per tutor in sync with
/// their profile; additional listings can exist via the listings CRUD.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub subject_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub level: Option<String>,
    pub city: Option<String>,
    pub is_online: bool,
    pub is_offline: bool,
    pub hourly_rate: Option<f64>,
    pub is_published: bool,
    pub photo_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

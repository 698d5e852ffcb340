use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    /// `"student"` or `"tutor"`; immutable after registration.
    pub role: String,
    pub onboarding_done: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::preference::Entity")]
    Preference,
    #[sea_orm(has_many = "super::listing::Entity")]
    Listings,
    #[sea_orm(has_many = "super::user_subject::Entity")]
    UserSubjects,
}

impl Related<super::preference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Preference.def()
    }
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listings.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_subject::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_subject::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

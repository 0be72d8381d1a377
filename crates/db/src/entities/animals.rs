//! `SeaORM` Entity for the animals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "animals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub species: String,
    pub govt_tag_no: String,
    pub breed: String,
    pub color: String,
    pub gender: String,
    pub year_of_birth: i32,
    pub health_status: String,
    pub tag_color: String,
    pub identification_mark: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movements::Entity")]
    Movements,
    #[sea_orm(has_many = "super::milk_records::Entity")]
    MilkRecords,
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl Related<super::milk_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MilkRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

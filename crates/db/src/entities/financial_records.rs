//! `SeaORM` Entity for the `financial_records` table.
//!
//! `record_type` and `payment_method` hold the stored string forms parsed by
//! `gaurakshak_core::ledger`. The milk-sale columns are only populated on
//! milk-sale legs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub date: Date,
    pub record_type: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub description: String,
    pub account_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub invoice_no: Option<String>,
    pub customer_name: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

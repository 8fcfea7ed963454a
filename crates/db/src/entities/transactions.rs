//! `SeaORM` Entity for the transaction table.
//!
//! One table holds every ledger entry; `kind` is the discriminator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strequelistan_core::ledger::Transaction;
use strequelistan_shared::types::{AccountId, Money, TransactionId};

use super::sea_orm_active_enums::TransactionKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub performed_by_id: Uuid,
    pub kind: TransactionKind,
    pub value: i64,
    pub label: String,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub standard_units: Option<Decimal>,
    pub voided: bool,
    pub timestamp: DateTimeUtc,
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

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: TransactionId::from_uuid(model.id),
            account_id: AccountId::from_uuid(model.account_id),
            performed_by: AccountId::from_uuid(model.performed_by_id),
            kind: model.kind.into(),
            value: Money::from_minor(model.value),
            label: model.label,
            standard_units: model.standard_units,
            voided: model.voided,
            timestamp: model.timestamp,
        }
    }
}

//! `SeaORM` Entity for the credit_transfer table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strequelistan_core::ledger::CreditTransfer;
use strequelistan_shared::types::{CreditTransferId, TransactionId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_transfer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub payer_transaction_id: Uuid,
    #[sea_orm(unique)]
    pub payee_transaction_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::PayerTransactionId",
        to = "super::transactions::Column::Id"
    )]
    PayerTransaction,
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::PayeeTransactionId",
        to = "super::transactions::Column::Id"
    )]
    PayeeTransaction,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CreditTransfer {
    fn from(model: Model) -> Self {
        Self {
            id: CreditTransferId::from_uuid(model.id),
            payer_transaction_id: TransactionId::from_uuid(model.payer_transaction_id),
            payee_transaction_id: TransactionId::from_uuid(model.payee_transaction_id),
        }
    }
}

//! `SeaORM` Entity for the account table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strequelistan_core::bac::BacProfile;
use strequelistan_core::ledger::AccountInfo;
use strequelistan_shared::types::{AccountId, Money};

use super::sea_orm_active_enums::BacSex;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub balance: i64,
    pub is_admin: bool,
    pub active: bool,
    pub body_mass: Option<i32>,
    pub bac_sex: BacSex,
    pub group_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_groups::Entity",
        from = "Column::GroupId",
        to = "super::account_groups::Column::Id"
    )]
    AccountGroups,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::account_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountGroups.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns the stored balance.
    #[must_use]
    pub fn balance(&self) -> Money {
        Money::from_minor(self.balance)
    }

    /// Returns the identity the ledger uses for labels and permission checks.
    #[must_use]
    pub fn info(&self) -> AccountInfo {
        AccountInfo {
            id: AccountId::from_uuid(self.id),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            nickname: self.nickname.clone(),
            is_admin: self.is_admin,
        }
    }

    /// Returns the inputs of the BAC estimate.
    #[must_use]
    pub fn bac_profile(&self) -> BacProfile {
        BacProfile {
            body_mass_kg: self.body_mass,
            sex: self.bac_sex.into(),
        }
    }
}

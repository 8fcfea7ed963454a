//! `SeaORM` Entity for the article table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strequelistan_core::ledger::ArticleInfo;
use strequelistan_shared::types::{ArticleId, Money};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))")]
    pub standard_units: Decimal,
    pub weight: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns the article as the ledger sees it.
    #[must_use]
    pub fn info(&self) -> ArticleInfo {
        ArticleInfo {
            id: ArticleId::from_uuid(self.id),
            name: self.name.clone(),
            price: Money::from_minor(self.price),
            standard_units: self.standard_units,
        }
    }
}

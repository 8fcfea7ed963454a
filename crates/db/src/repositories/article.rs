//! Article repository for the purchasable items.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use strequelistan_shared::types::{ArticleId, Money};

use crate::entities::articles;

/// Error types for article operations.
#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    /// Article not found.
    #[error("Article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// The price has no negation and could never be voided.
    #[error("Article price {0} is out of range")]
    PriceOutOfRange(Money),

    /// Standard units cannot be negative.
    #[error("Standard units cannot be negative, got {0}")]
    NegativeUnits(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an article.
#[derive(Debug, Clone)]
pub struct CreateArticleInput {
    /// Display name, also the streque label.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Price debited per streque. Negative prices credit the buyer.
    pub price: Money,
    /// Standard alcohol units per streque.
    pub standard_units: Decimal,
    /// Display order; higher first.
    pub weight: i32,
}

/// Article repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ArticleRepository {
    db: DatabaseConnection,
}

impl ArticleRepository {
    /// Creates a new article repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active article.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is out of range, the units are negative,
    /// or the database operation fails.
    pub async fn create_article(
        &self,
        input: CreateArticleInput,
    ) -> Result<articles::Model, ArticleError> {
        if input.price.checked_neg().is_none() {
            return Err(ArticleError::PriceOutOfRange(input.price));
        }
        if input.standard_units < Decimal::ZERO {
            return Err(ArticleError::NegativeUnits(input.standard_units));
        }

        let article = articles::ActiveModel {
            id: Set(ArticleId::new().into_inner()),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price.minor_units()),
            standard_units: Set(input.standard_units),
            weight: Set(input.weight),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        Ok(article.insert(&self.db).await?)
    }

    /// Finds an article by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ArticleId) -> Result<Option<articles::Model>, ArticleError> {
        Ok(articles::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Lists active articles, heaviest first, then by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<articles::Model>, ArticleError> {
        Ok(articles::Entity::find()
            .filter(articles::Column::IsActive.eq(true))
            .order_by_desc(articles::Column::Weight)
            .order_by_asc(articles::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Hides an article from the purchase list. Past streques keep their label.
    ///
    /// # Errors
    ///
    /// Returns `ArticleNotFound` if it does not exist.
    pub async fn deactivate(&self, id: ArticleId) -> Result<articles::Model, ArticleError> {
        let article = self
            .find_by_id(id)
            .await?
            .ok_or(ArticleError::ArticleNotFound(id))?;
        let mut active: articles::ActiveModel = article.into();
        active.is_active = Set(false);
        Ok(active.update(&self.db).await?)
    }
}

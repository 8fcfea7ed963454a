//! Account repository for member and group database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use strequelistan_core::bac::BacProfile;
use strequelistan_shared::types::{AccountId, GroupId};

use crate::entities::{account_groups, accounts, sea_orm_active_enums::BacSex};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Email already in use.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// Body mass must be a positive number of kilograms.
    #[error("Body mass must be positive, got {0}")]
    InvalidBodyMass(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone, Default)]
pub struct CreateAccountInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional nickname.
    pub nickname: Option<String>,
    /// Email, unique.
    pub email: String,
    /// Whether the member is an admin.
    pub is_admin: bool,
    /// Optional group membership.
    pub group_id: Option<GroupId>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken, the group does not exist, or
    /// the database operation fails.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let email = input.email.trim().to_lowercase();
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(&email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AccountError::DuplicateEmail(email));
        }

        if let Some(group_id) = input.group_id {
            account_groups::Entity::find_by_id(group_id.into_inner())
                .one(&self.db)
                .await?
                .ok_or(AccountError::GroupNotFound(group_id))?;
        }

        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            nickname: Set(input.nickname.filter(|n| !n.trim().is_empty())),
            email: Set(email),
            balance: Set(0),
            is_admin: Set(input.is_admin),
            active: Set(true),
            body_mass: Set(None),
            bac_sex: Set(BacSex::Unknown),
            group_id: Set(input.group_id.map(GroupId::into_inner)),
            created_at: Set(Utc::now()),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Gets an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if it does not exist.
    pub async fn get(&self, id: AccountId) -> Result<accounts::Model, AccountError> {
        self.find_by_id(id)
            .await?
            .ok_or(AccountError::AccountNotFound(id))
    }

    /// Lists active accounts ordered by first name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Active.eq(true))
            .order_by_asc(accounts::Column::FirstName)
            .order_by_asc(accounts::Column::LastName)
            .all(&self.db)
            .await?)
    }

    /// Lists every account id, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_ids(&self) -> Result<Vec<AccountId>, AccountError> {
        let accounts = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await?;
        Ok(accounts
            .into_iter()
            .map(|a| AccountId::from_uuid(a.id))
            .collect())
    }

    /// Sets the inputs of the BAC estimate.
    ///
    /// # Errors
    ///
    /// Returns an error if the body mass is not positive, the account does
    /// not exist, or the database update fails.
    pub async fn set_bac_profile(
        &self,
        id: AccountId,
        profile: BacProfile,
    ) -> Result<accounts::Model, AccountError> {
        if let Some(mass) = profile.body_mass_kg.filter(|mass| *mass <= 0) {
            return Err(AccountError::InvalidBodyMass(mass));
        }

        let account = self.get(id).await?;
        let mut active: accounts::ActiveModel = account.into();
        active.body_mass = Set(profile.body_mass_kg);
        active.bac_sex = Set(profile.sex.into());
        Ok(active.update(&self.db).await?)
    }

    /// Marks an account active or inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub async fn set_active(
        &self,
        id: AccountId,
        active: bool,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.get(id).await?;
        let mut model: accounts::ActiveModel = account.into();
        model.active = Set(active);
        Ok(model.update(&self.db).await?)
    }

    /// Creates a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_group(
        &self,
        name: &str,
        weight: i32,
    ) -> Result<account_groups::Model, AccountError> {
        let group = account_groups::ActiveModel {
            id: Set(GroupId::new().into_inner()),
            name: Set(name.trim().to_string()),
            weight: Set(weight),
            active: Set(true),
        };
        Ok(group.insert(&self.db).await?)
    }

    /// Lists active groups, heaviest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_groups(&self) -> Result<Vec<account_groups::Model>, AccountError> {
        Ok(account_groups::Entity::find()
            .filter(account_groups::Column::Active.eq(true))
            .order_by_desc(account_groups::Column::Weight)
            .all(&self.db)
            .await?)
    }
}

//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod article;
pub mod error;
pub mod ledger;
pub mod notification;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use article::{ArticleError, ArticleRepository, CreateArticleInput};
pub use error::RepositoryError;
pub use ledger::LedgerRepository;
pub use notification::NotificationRepository;

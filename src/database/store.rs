use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Expense, ExpenseCategory, NewExpense, NewExpenseCategory, NewUser, User};

/// Persistence seam used by the handlers.
///
/// Every expense and category method takes the owning `user_id`; rows owned
/// by anyone else are invisible through this trait.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    /// Fails with `UniqueViolation` when the email is taken
    async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError>;

    // Categories, ordered by `nome` ascending, ignoring case
    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<ExpenseCategory>, DatabaseError>;
    async fn find_category(&self, id: Uuid, user_id: Uuid) -> Result<Option<ExpenseCategory>, DatabaseError>;
    /// Fails with `UniqueViolation` when `nome` is already used by this user
    async fn create_category(
        &self,
        user_id: Uuid,
        new: &NewExpenseCategory,
    ) -> Result<ExpenseCategory, DatabaseError>;
    /// Rows deleted; fails with `ForeignKeyViolation` while expenses reference it
    async fn delete_category(&self, id: Uuid, user_id: Uuid) -> Result<u64, DatabaseError>;

    // Expenses, ordered by `data` descending, category joined
    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>, DatabaseError>;
    async fn find_expense(&self, id: Uuid, user_id: Uuid) -> Result<Option<Expense>, DatabaseError>;
    /// Caller has already checked that the category belongs to `user_id`
    async fn create_expense(
        &self,
        user_id: Uuid,
        new: &NewExpense,
        category: ExpenseCategory,
    ) -> Result<Expense, DatabaseError>;
    /// Rows deleted
    async fn delete_expense(&self, id: Uuid, user_id: Uuid) -> Result<u64, DatabaseError>;
}

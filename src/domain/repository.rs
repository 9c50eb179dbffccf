use crate::domain::expense::{Expense, ExpenseQuery};
use crate::domain::user::{Role, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts or replaces the record with the same id.
    async fn save_user(&self, user: User) -> Result<()>;
    /// Email lookups ignore case and surrounding whitespace.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_email_and_role(&self, email: &str, role: Role) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn delete_user(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn save_expense(&self, expense: Expense) -> Result<()>;
    async fn find_expense(&self, owner: &str, id: &str) -> Result<Option<Expense>>;
    /// Owner's expenses within the query bounds, newest date first.
    async fn list_expenses(&self, owner: &str, query: ExpenseQuery) -> Result<Vec<Expense>>;
    async fn delete_expense(&self, owner: &str, id: &str) -> Result<bool>;
}

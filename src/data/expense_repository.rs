use crate::domain::expense::{Expense, ExpenseQuery};
use crate::domain::repository::ExpenseRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct InMemoryExpenseRepository {
    storage: Arc<RwLock<HashMap<String, Expense>>>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryExpenseRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn save_expense(&self, expense: Expense) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn find_expense(&self, owner: &str, id: &str) -> Result<Option<Expense>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).filter(|e| e.owner == owner).cloned())
    }

    #[instrument(skip(self), fields(owner = owner))]
    async fn list_expenses(&self, owner: &str, query: ExpenseQuery) -> Result<Vec<Expense>> {
        let storage = self.storage.read().await;
        let mut expenses: Vec<Expense> = storage
            .values()
            .filter(|e| e.owner == owner && query.contains(e.date))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        debug!(count = expenses.len(), "Listed expenses");
        Ok(expenses)
    }

    async fn delete_expense(&self, owner: &str, id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        match storage.get(id) {
            Some(e) if e.owner == owner => {
                storage.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

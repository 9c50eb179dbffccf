use crate::application::aggregator::aggregate;
use crate::domain::error::DomainError;
use crate::domain::expense::{CreateExpense, Expense, ExpenseQuery, UpdateExpense};
use crate::domain::report::{Period, ReportAggregate};
use crate::domain::repository::ExpenseRepository;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct ExpenseService<R: ExpenseRepository> {
    repository: Arc<R>,
}

fn clean_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("Title is required".to_string()).into());
    }
    Ok(title.to_string())
}

fn check_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(DomainError::Validation("Amount must be a number".to_string()).into());
    }
    Ok(amount)
}

// Blank optional text is stored as absent.
fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<R: ExpenseRepository> ExpenseService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req), fields(owner = owner))]
    pub async fn create_expense(&self, owner: &str, req: CreateExpense) -> Result<Expense> {
        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            title: clean_title(&req.title)?,
            amount: check_amount(req.amount)?,
            category: clean_optional(req.category),
            date: req.date,
            notes: clean_optional(req.notes),
            created_at: now,
            updated_at: now,
        };
        self.repository.save_expense(expense.clone()).await?;
        info!(expense_id = %expense.id, amount = expense.amount, "Expense created");
        Ok(expense)
    }

    pub async fn list_expenses(&self, owner: &str, query: ExpenseQuery) -> Result<Vec<Expense>> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(DomainError::Validation(
                    "startDate must not be after endDate".to_string(),
                )
                .into());
            }
        }
        self.repository.list_expenses(owner, query).await
    }

    async fn owned_expense(&self, owner: &str, id: &str) -> Result<Expense> {
        self.repository
            .find_expense(owner, id)
            .await?
            .ok_or_else(|| {
                warn!(owner = owner, expense_id = id, "Expense not found for owner");
                DomainError::NotFound("Expense not found".to_string()).into()
            })
    }

    #[instrument(skip(self, req), fields(owner = owner, expense_id = id))]
    pub async fn update_expense(&self, owner: &str, id: &str, req: UpdateExpense) -> Result<Expense> {
        let mut expense = self.owned_expense(owner, id).await?;

        if let Some(title) = req.title {
            expense.title = clean_title(&title)?;
        }
        if let Some(amount) = req.amount {
            expense.amount = check_amount(amount)?;
        }
        if req.category.is_some() {
            expense.category = clean_optional(req.category);
        }
        if let Some(date) = req.date {
            expense.date = date;
        }
        if req.notes.is_some() {
            expense.notes = clean_optional(req.notes);
        }
        expense.updated_at = Utc::now();

        self.repository.save_expense(expense.clone()).await?;
        info!(expense_id = %expense.id, "Expense updated");
        Ok(expense)
    }

    #[instrument(skip(self), fields(owner = owner, expense_id = id))]
    pub async fn delete_expense(&self, owner: &str, id: &str) -> Result<()> {
        if !self.repository.delete_expense(owner, id).await? {
            return Err(DomainError::NotFound("Expense not found".to_string()).into());
        }
        info!(expense_id = id, "Expense deleted");
        Ok(())
    }

    /// Resolves the period around `reference`, fetches the owner's records in
    /// it and aggregates them. Nothing is cached.
    #[instrument(skip(self), fields(owner = owner))]
    pub async fn report(
        &self,
        owner: &str,
        period: Period,
        reference: NaiveDate,
    ) -> Result<ReportAggregate> {
        let window = period
            .resolve(reference)
            .ok_or_else(|| DomainError::Validation("Date out of range".to_string()))?;

        let query = ExpenseQuery {
            start_date: Some(window.start),
            end_date: Some(window.end),
        };
        let expenses = self.repository.list_expenses(owner, query).await?;
        let report = aggregate(&expenses, window);

        info!(
            period = %report.period.label,
            transactions = report.transaction_counts.total,
            "Report generated"
        );
        Ok(report)
    }
}

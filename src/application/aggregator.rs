//! Rolls a period's expenses up into report totals, per-category breakdowns
//! and pie chart segments. Pure and synchronous.

use crate::domain::category::{category_emoji, category_label};
use crate::domain::expense::Expense;
use crate::domain::report::{
    CategoryBreakdown, DailyTotal, PieSegment, ReportAggregate, ReportPeriod, TransactionCounts,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sorted by amount descending, ties by label.
fn sorted_totals(totals: BTreeMap<String, f64>) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = totals.into_iter().collect();
    // BTreeMap order makes the stable sort break ties by label
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
}

fn breakdown(totals: BTreeMap<String, f64>, group_total: f64) -> Vec<CategoryBreakdown> {
    if group_total <= 0.0 {
        return Vec::new();
    }

    sorted_totals(totals)
        .into_iter()
        .map(|(category, amount)| CategoryBreakdown {
            emoji: category_emoji(&category).to_string(),
            percentage: round1(amount / group_total * 100.0),
            category,
            amount,
        })
        .collect()
}

/// Proportional slices for a pie chart. The last slice absorbs whatever
/// floating-point drift accumulated so the chart always closes at 100.
pub fn pie_segments(totals: &[(String, f64)]) -> Vec<PieSegment> {
    let total: f64 = totals.iter().map(|(_, amount)| amount).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut cumulative = 0.0;
    let mut segments: Vec<PieSegment> = totals
        .iter()
        .map(|(category, amount)| {
            let percent = amount / total * 100.0;
            let start_percent = cumulative;
            cumulative += percent;
            PieSegment {
                category: category.clone(),
                amount: *amount,
                percent,
                start_percent,
                end_percent: cumulative,
            }
        })
        .collect();

    if let Some(last) = segments.last_mut() {
        last.end_percent = 100.0;
        last.percent = 100.0 - last.start_percent;
    }

    segments
}

pub fn aggregate(expenses: &[Expense], period: ReportPeriod) -> ReportAggregate {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut income_totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut expense_totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut expense_days = HashSet::new();
    let mut counts = TransactionCounts::default();
    let mut days: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
    let mut income_transactions = Vec::new();
    let mut expense_transactions = Vec::new();

    for expense in expenses.iter().filter(|e| period.contains(e.date)) {
        let amount = expense.amount.abs();
        let category = category_label(expense.category.as_deref());
        counts.total += 1;
        let cell = days.entry(expense.date).or_insert_with(|| DailyTotal {
            date: expense.date,
            income: 0.0,
            expense: 0.0,
            net: 0.0,
        });
        cell.net += expense.amount;

        if expense.is_income() {
            total_income += amount;
            *income_totals.entry(category).or_insert(0.0) += amount;
            cell.income += amount;
            counts.income += 1;
            income_transactions.push(expense.clone());
        } else {
            total_expenses += amount;
            *expense_totals.entry(category).or_insert(0.0) += amount;
            cell.expense += amount;
            expense_days.insert(expense.date);
            counts.expense += 1;
            expense_transactions.push(expense.clone());
        }
    }

    let net_savings = total_income - total_expenses;
    let savings_rate = if total_income > 0.0 {
        round1(net_savings / total_income * 100.0)
    } else {
        0.0
    };
    let daily_average_expense = if expense_days.is_empty() {
        0.0
    } else {
        total_expenses / expense_days.len() as f64
    };

    let expense_chart = pie_segments(&sorted_totals(expense_totals.clone()));

    ReportAggregate {
        period,
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
        income_breakdown: breakdown(income_totals, total_income),
        expense_breakdown: breakdown(expense_totals, total_expenses),
        expense_chart,
        daily_average_expense,
        daily_totals: days.into_values().collect(),
        transaction_counts: counts,
        income_transactions,
        expense_transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::Period;
    use chrono::{NaiveDate, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(amount: f64, category: Option<&str>, date: NaiveDate) -> Expense {
        let now = Utc::now();
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            owner: "owner".to_string(),
            title: "entry".to_string(),
            amount,
            category: category.map(str::to_string),
            date,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn may_2024() -> ReportPeriod {
        Period::Month.resolve(day(2024, 5, 15)).unwrap()
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        for period in [Period::Week, Period::Month, Period::Year] {
            let report = aggregate(&[], period.resolve(day(2024, 5, 15)).unwrap());
            assert_eq!(report.total_income, 0.0);
            assert_eq!(report.total_expenses, 0.0);
            assert_eq!(report.net_savings, 0.0);
            assert_eq!(report.savings_rate, 0.0);
            assert_eq!(report.daily_average_expense, 0.0);
            assert!(report.income_breakdown.is_empty());
            assert!(report.expense_breakdown.is_empty());
            assert!(report.expense_chart.is_empty());
            assert!(report.daily_totals.is_empty());
            assert_eq!(report.transaction_counts, TransactionCounts::default());
        }
    }

    #[test]
    fn test_week_with_food_and_salary() {
        let expenses = vec![
            entry(-50.0, Some("food"), day(2024, 5, 7)),
            entry(1000.0, Some("salary"), day(2024, 5, 9)),
        ];
        let week = Period::Week.resolve(day(2024, 5, 8)).unwrap();

        let report = aggregate(&expenses, week);

        assert_eq!(report.total_expenses, 50.0);
        assert_eq!(report.total_income, 1000.0);
        assert_eq!(report.net_savings, 950.0);
        assert_eq!(report.savings_rate, 95.0);
        assert_eq!(report.expense_breakdown.len(), 1);
        assert_eq!(report.expense_breakdown[0].category, "food");
        assert_eq!(report.expense_breakdown[0].amount, 50.0);
        assert_eq!(report.expense_breakdown[0].percentage, 100.0);
        assert_eq!(report.expense_breakdown[0].emoji, "🍽️");
        assert_eq!(report.income_breakdown[0].category, "salary");
        assert_eq!(report.daily_average_expense, 50.0);
        assert_eq!(
            report.transaction_counts,
            TransactionCounts {
                total: 2,
                income: 1,
                expense: 1
            }
        );
    }

    #[test]
    fn test_zero_amount_counts_as_income() {
        let expenses = vec![entry(0.0, Some("gift"), day(2024, 5, 2))];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.transaction_counts.income, 1);
        assert_eq!(report.transaction_counts.expense, 0);
        assert_eq!(report.total_expenses, 0.0);
        // income total is zero, so no breakdown rows
        assert!(report.income_breakdown.is_empty());
    }

    #[test]
    fn test_savings_rate_zero_without_income() {
        let expenses = vec![entry(-120.0, Some("rent"), day(2024, 5, 2))];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.savings_rate, 0.0);
        assert_eq!(report.net_savings, -120.0);
    }

    #[test]
    fn test_missing_category_grouped_as_uncategorized() {
        let expenses = vec![
            entry(-10.0, None, day(2024, 5, 2)),
            entry(-15.0, Some(""), day(2024, 5, 3)),
        ];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.expense_breakdown.len(), 1);
        assert_eq!(report.expense_breakdown[0].category, "Uncategorized");
        assert_eq!(report.expense_breakdown[0].amount, 25.0);
    }

    #[test]
    fn test_breakdown_sorted_and_sums_to_total() {
        let expenses = vec![
            entry(-10.0, Some("travel"), day(2024, 5, 1)),
            entry(-30.0, Some("food"), day(2024, 5, 1)),
            entry(-20.0, Some("health"), day(2024, 5, 4)),
            entry(-20.0, Some("food"), day(2024, 5, 6)),
            entry(-3.33, Some("utilities"), day(2024, 5, 6)),
        ];
        let report = aggregate(&expenses, may_2024());

        let names: Vec<_> = report
            .expense_breakdown
            .iter()
            .map(|b| b.category.as_str())
            .collect();
        assert_eq!(names, vec!["food", "health", "travel", "utilities"]);

        let sum: f64 = report.expense_breakdown.iter().map(|b| b.amount).sum();
        assert!((sum - report.total_expenses).abs() < 1e-9);

        let pct: f64 = report.expense_breakdown.iter().map(|b| b.percentage).sum();
        assert!((pct - 100.0).abs() <= 0.2);
    }

    #[test]
    fn test_equal_amounts_break_ties_by_label() {
        let expenses = vec![
            entry(-5.0, Some("shopping"), day(2024, 5, 1)),
            entry(-5.0, Some("education"), day(2024, 5, 1)),
        ];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.expense_breakdown[0].category, "education");
        assert_eq!(report.expense_breakdown[1].category, "shopping");
    }

    #[test]
    fn test_pie_chart_closes_at_exactly_100() {
        let expenses = vec![
            entry(-1.0, Some("a"), day(2024, 5, 1)),
            entry(-1.0, Some("b"), day(2024, 5, 1)),
            entry(-1.0, Some("c"), day(2024, 5, 1)),
        ];
        let report = aggregate(&expenses, may_2024());
        let chart = &report.expense_chart;

        assert_eq!(chart.len(), 3);
        assert_eq!(chart[0].start_percent, 0.0);
        assert_eq!(chart[2].end_percent, 100.0);
        assert_eq!(chart[2].start_percent + chart[2].percent, 100.0);
        for pair in chart.windows(2) {
            assert_eq!(pair[0].end_percent, pair[1].start_percent);
        }
        // rounded report percentages are not forced to 100
        let pct: f64 = report.expense_breakdown.iter().map(|b| b.percentage).sum();
        assert!((pct - 99.9).abs() < 1e-9);
    }

    #[test]
    fn test_pie_segments_empty_when_total_zero() {
        assert!(pie_segments(&[]).is_empty());
        assert!(pie_segments(&[("food".to_string(), 0.0)]).is_empty());
    }

    #[test]
    fn test_daily_average_uses_distinct_expense_days() {
        let expenses = vec![
            entry(-10.0, Some("food"), day(2024, 5, 1)),
            entry(-20.0, Some("food"), day(2024, 5, 1)),
            entry(-30.0, Some("food"), day(2024, 5, 2)),
            entry(500.0, Some("salary"), day(2024, 5, 3)),
        ];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.daily_average_expense, 30.0);
    }

    #[test]
    fn test_daily_totals_net_mixed_days() {
        let expenses = vec![
            entry(-30.0, Some("food"), day(2024, 5, 2)),
            entry(200.0, Some("salary"), day(2024, 5, 2)),
            entry(-12.5, Some("travel"), day(2024, 5, 2)),
            entry(-40.0, Some("rent"), day(2024, 5, 1)),
            entry(-99.0, Some("food"), day(2024, 6, 1)),
        ];
        let report = aggregate(&expenses, may_2024());
        let days = &report.daily_totals;

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, day(2024, 5, 1));
        assert_eq!(days[0].expense, 40.0);
        assert_eq!(days[0].net, -40.0);
        assert_eq!(days[1].date, day(2024, 5, 2));
        assert_eq!(days[1].income, 200.0);
        assert_eq!(days[1].expense, 42.5);
        assert_eq!(days[1].net, 157.5);

        let net: f64 = days.iter().map(|d| d.net).sum();
        assert_eq!(net, report.net_savings);
    }

    #[test]
    fn test_transactions_split_by_kind() {
        let expenses = vec![
            entry(-5.0, Some("food"), day(2024, 5, 3)),
            entry(0.0, None, day(2024, 5, 4)),
            entry(70.0, Some("gift"), day(2024, 5, 5)),
            entry(-8.0, Some("food"), day(2024, 4, 5)),
        ];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.expense_transactions.len(), 1);
        assert_eq!(report.expense_transactions[0].amount, -5.0);
        // zero counts as income
        assert_eq!(report.income_transactions.len(), 2);
        assert_eq!(
            report.income_transactions.len() + report.expense_transactions.len(),
            report.transaction_counts.total
        );
    }

    #[test]
    fn test_records_outside_period_are_ignored() {
        let expenses = vec![
            entry(-10.0, Some("food"), day(2024, 4, 30)),
            entry(-20.0, Some("food"), day(2024, 5, 1)),
            entry(-30.0, Some("food"), day(2024, 5, 31)),
            entry(-40.0, Some("food"), day(2024, 6, 1)),
        ];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.total_expenses, 50.0);
        assert_eq!(report.transaction_counts.total, 2);
    }

    #[test]
    fn test_category_case_preserved_but_emoji_case_insensitive() {
        let expenses = vec![entry(-8.0, Some("Food"), day(2024, 5, 1))];
        let report = aggregate(&expenses, may_2024());

        assert_eq!(report.expense_breakdown[0].category, "Food");
        assert_eq!(report.expense_breakdown[0].emoji, "🍽️");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(0.0), 0.0);
    }
}

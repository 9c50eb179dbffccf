use crate::domain::expense::Expense;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

/// A resolved reporting window. Both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub kind: Period,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl Period {
    /// Resolves the window containing `reference`. Weeks start on Monday.
    /// Returns `None` only at the edges of the representable calendar.
    pub fn resolve(self, reference: NaiveDate) -> Option<ReportPeriod> {
        let (start, end, label) = match self {
            Period::Week => {
                let offset = u64::from(reference.weekday().num_days_from_monday());
                let start = reference.checked_sub_days(Days::new(offset))?;
                let end = start.checked_add_days(Days::new(6))?;
                (start, end, format!("Week of {}", start.format("%Y-%m-%d")))
            }
            Period::Month => {
                let start = reference.with_day(1)?;
                let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
                (start, end, start.format("%B %Y").to_string())
            }
            Period::Year => {
                let start = NaiveDate::from_ymd_opt(reference.year(), 1, 1)?;
                let end = NaiveDate::from_ymd_opt(reference.year(), 12, 31)?;
                (start, end, reference.year().to_string())
            }
        };

        Some(ReportPeriod {
            kind: self,
            label,
            start,
            end,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub emoji: String,
    pub amount: f64,
    /// Share of the group total, rounded to one decimal.
    pub percentage: f64,
}

/// One slice of the spending pie. Unlike the breakdown percentages these are
/// unrounded and the last slice always closes at exactly 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSegment {
    pub category: String,
    pub amount: f64,
    pub percent: f64,
    pub start_percent: f64,
    pub end_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCounts {
    pub total: usize,
    pub income: usize,
    pub expense: usize,
}

/// One calendar cell: what came in and went out that day. `expense` is
/// positive; `net` is income minus expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAggregate {
    pub period: ReportPeriod,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    pub savings_rate: f64,
    pub income_breakdown: Vec<CategoryBreakdown>,
    pub expense_breakdown: Vec<CategoryBreakdown>,
    pub expense_chart: Vec<PieSegment>,
    pub daily_average_expense: f64,
    /// Only days with at least one record, oldest first.
    pub daily_totals: Vec<DailyTotal>,
    pub transaction_counts: TransactionCounts,
    pub income_transactions: Vec<Expense>,
    pub expense_transactions: Vec<Expense>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportQuery {
    pub period: Period,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-05-09 is a Thursday
        let period = Period::Week.resolve(day(2024, 5, 9)).unwrap();
        assert_eq!(period.start, day(2024, 5, 6));
        assert_eq!(period.end, day(2024, 5, 12));
        assert_eq!(period.label, "Week of 2024-05-06");
    }

    #[test]
    fn test_week_of_a_sunday_reaches_back_to_monday() {
        let period = Period::Week.resolve(day(2024, 5, 12)).unwrap();
        assert_eq!(period.start, day(2024, 5, 6));
        assert_eq!(period.end, day(2024, 5, 12));
    }

    #[test]
    fn test_week_can_span_year_boundary() {
        // 2025-01-01 is a Wednesday
        let period = Period::Week.resolve(day(2025, 1, 1)).unwrap();
        assert_eq!(period.start, day(2024, 12, 30));
        assert_eq!(period.end, day(2025, 1, 5));
    }

    #[test]
    fn test_month_covers_full_calendar_month() {
        let period = Period::Month.resolve(day(2024, 2, 17)).unwrap();
        assert_eq!(period.start, day(2024, 2, 1));
        assert_eq!(period.end, day(2024, 2, 29));
        assert_eq!(period.label, "February 2024");

        let december = Period::Month.resolve(day(2023, 12, 5)).unwrap();
        assert_eq!(december.end, day(2023, 12, 31));
    }

    #[test]
    fn test_year_covers_jan_to_dec() {
        let period = Period::Year.resolve(day(2023, 7, 4)).unwrap();
        assert_eq!(period.start, day(2023, 1, 1));
        assert_eq!(period.end, day(2023, 12, 31));
        assert_eq!(period.label, "2023");
    }

    #[test]
    fn test_period_bounds_are_inclusive() {
        let period = Period::Month.resolve(day(2024, 5, 15)).unwrap();
        assert!(period.contains(day(2024, 5, 1)));
        assert!(period.contains(day(2024, 5, 31)));
        assert!(!period.contains(day(2024, 6, 1)));
    }
}

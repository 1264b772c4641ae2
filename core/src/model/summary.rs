use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyIncomePoint {
    pub year: i32,
    pub month: u32,
    pub label: String, // "Oct 2026"
    pub total_income: i64,
    pub rental_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryIncome {
    pub category: String,
    pub total_income: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct IncomeTotals {
    pub total_income: i64,
    pub paid_income: i64,
    pub pending_income: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RentalAnalytics {
    pub average_duration_days: f64,
    pub average_daily_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub total_income: i64,
    pub paid_income: i64,
    pub pending_income: i64,
    pub monthly_series: Vec<MonthlyIncomePoint>, // oldest first, always 6 points
    pub income_by_category: Vec<CategoryIncome>,
    pub average_duration_days: f64,
    pub average_daily_rate: f64,
}

impl AggregateSummary {
    /// Income from rentals that are neither paid nor pending (cancelled).
    pub fn other_income(&self) -> i64 {
        self.total_income - self.paid_income - self.pending_income
    }
}

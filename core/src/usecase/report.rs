use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::period::{filter_by_period, ReportPeriod};
use crate::model::rental::RentalRecord;
use crate::model::summary::AggregateSummary;
use crate::repository::RentalRepository;
use crate::service::aggregator::{income_by_category, income_totals, monthly_series, rental_analytics};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountingReport {
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub summary: AggregateSummary,
    pub recent: Vec<RentalRecord>,
}

pub struct ReportUseCase<'a, R: RentalRepository> {
    repo: &'a R,
}

impl<'a, R: RentalRepository> ReportUseCase<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Builds the accounting page for `period`.
    ///
    /// Totals, categories and averages cover the period only. The six month
    /// trend always uses every rental. A store failure is returned as is.
    pub fn generate<Tz: TimeZone>(
        &self,
        period: ReportPeriod,
        recent_limit: usize,
        now: &DateTime<Tz>,
    ) -> Result<AccountingReport> {
        let rentals = self.repo.fetch_rentals().inspect_err(|e| {
            warn!(error = %e, "failed to fetch rentals");
        })?;

        let in_period = filter_by_period(&rentals, period, now);
        debug!(%period, total = rentals.len(), in_period = in_period.len(), "aggregating rentals");

        let totals = income_totals(in_period.iter().copied());
        let analytics = rental_analytics(in_period.iter().copied());
        let summary = AggregateSummary {
            total_income: totals.total_income,
            paid_income: totals.paid_income,
            pending_income: totals.pending_income,
            monthly_series: monthly_series(&rentals, now),
            income_by_category: income_by_category(in_period.iter().copied()),
            average_duration_days: analytics.average_duration_days,
            average_daily_rate: analytics.average_daily_rate,
        };

        Ok(AccountingReport {
            period,
            generated_at: now.with_timezone(&Utc),
            record_count: in_period.len(),
            recent: recent_transactions(in_period.iter().copied(), recent_limit),
            summary,
        })
    }
}

/// Newest rentals first, by creation time.
pub fn recent_transactions<'a>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    limit: usize,
) -> Vec<RentalRecord> {
    let mut sorted: Vec<&RentalRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    sorted.into_iter().take(limit).cloned().collect()
}

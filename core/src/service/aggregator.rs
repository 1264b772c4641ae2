//! Income roll-ups over rental records.
//!
//! Every function here is pure: records are borrowed, "now" is passed in, and
//! the same input always yields the same output.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, TimeZone};

use crate::model::rental::{PaymentStatus, RentalRecord};
use crate::model::summary::{AggregateSummary, CategoryIncome, IncomeTotals, MonthlyIncomePoint, RentalAnalytics};
use crate::time::{month_label, month_start_before, parse_record_date};

pub const UNKNOWN_CATEGORY: &str = "unknown";
pub const TREND_MONTHS: u32 = 6;

pub fn compute_summary<'a, I, Tz>(records: I, now: &DateTime<Tz>) -> AggregateSummary
where
    I: IntoIterator<Item = &'a RentalRecord>,
    I::IntoIter: Clone,
    Tz: TimeZone,
{
    let records = records.into_iter();
    let totals = income_totals(records.clone());
    let analytics = rental_analytics(records.clone());

    AggregateSummary {
        total_income: totals.total_income,
        paid_income: totals.paid_income,
        pending_income: totals.pending_income,
        monthly_series: monthly_series(records.clone(), now),
        income_by_category: income_by_category(records),
        average_duration_days: analytics.average_duration_days,
        average_daily_rate: analytics.average_daily_rate,
    }
}

/// Total covers every status; paid and pending are the status-filtered subsets.
pub fn income_totals<'a>(records: impl IntoIterator<Item = &'a RentalRecord>) -> IncomeTotals {
    let mut totals = IncomeTotals::default();
    for r in records {
        totals.total_income += r.payment_amount;
        match r.payment_status {
            PaymentStatus::Paid => totals.paid_income += r.payment_amount,
            PaymentStatus::Pending => totals.pending_income += r.payment_amount,
            PaymentStatus::Cancelled => {}
        }
    }
    totals
}

/// Income and rental count for the current month and the five before it,
/// oldest first. Months are calendar months in `now`'s time zone.
pub fn monthly_series<'a, Tz: TimeZone>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    now: &DateTime<Tz>,
) -> Vec<MonthlyIncomePoint> {
    let today = now.date_naive();
    let mut points: Vec<MonthlyIncomePoint> = (0..TREND_MONTHS)
        .rev()
        .filter_map(|back| month_start_before(today, back))
        .map(|first| MonthlyIncomePoint {
            year: first.year(),
            month: first.month(),
            label: month_label(first),
            total_income: 0,
            rental_count: 0,
        })
        .collect();

    let tz = now.timezone();
    for r in records {
        let created = r.created_at.with_timezone(&tz);
        if let Some(point) = points.iter_mut().find(|p| p.year == created.year() && p.month == created.month()) {
            point.total_income += r.payment_amount;
            point.rental_count += 1;
        }
    }

    points
}

/// One entry per category seen, ordered by category name.
pub fn income_by_category<'a>(records: impl IntoIterator<Item = &'a RentalRecord>) -> Vec<CategoryIncome> {
    let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();
    for r in records {
        let category = r.category().unwrap_or(UNKNOWN_CATEGORY);
        *by_category.entry(category).or_insert(0) += r.payment_amount;
    }

    by_category
        .into_iter()
        .map(|(category, total_income)| CategoryIncome {
            category: category.to_string(),
            total_income,
        })
        .collect()
}

/// Rental length counting both the first and last day. Never below 1: an end
/// before the start, or a date that does not parse, counts as a single day.
pub fn rental_duration_days(rental: &RentalRecord) -> i64 {
    match (parse_record_date(&rental.start_date), parse_record_date(&rental.end_date)) {
        (Ok(start), Ok(end)) => ((end - start).num_days() + 1).max(1),
        _ => 1,
    }
}

pub fn rental_analytics<'a>(records: impl IntoIterator<Item = &'a RentalRecord>) -> RentalAnalytics {
    let mut count = 0usize;
    let mut duration_sum = 0.0;
    let mut rate_sum = 0.0;

    for r in records {
        let days = rental_duration_days(r);
        duration_sum += days as f64;
        rate_sum += r.payment_amount as f64 / days as f64;
        count += 1;
    }

    if count == 0 {
        return RentalAnalytics::default();
    }

    RentalAnalytics {
        average_duration_days: duration_sum / count as f64,
        average_daily_rate: rate_sum / count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rental::VehicleInfo;
    use chrono::{Utc, Months};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        "2026-10-19T10:00:00Z".parse().unwrap()
    }

    fn rental(amount: i64, status: PaymentStatus, created_at: DateTime<Utc>) -> RentalRecord {
        let mut r = RentalRecord::new(
            "Budi".to_string(),
            Uuid::new_v4(),
            "2026-10-01".to_string(),
            "2026-10-03".to_string(),
            amount,
        );
        r.payment_status = status;
        r.created_at = created_at;
        r
    }

    fn with_type(mut r: RentalRecord, vehicle_type: &str) -> RentalRecord {
        r.vehicle = Some(VehicleInfo {
            vehicle_type: Some(vehicle_type.to_string()),
            ..Default::default()
        });
        r
    }

    fn with_dates(mut r: RentalRecord, start: &str, end: &str) -> RentalRecord {
        r.start_date = start.to_string();
        r.end_date = end.to_string();
        r
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<RentalRecord> = Vec::new();
        let summary = compute_summary(&records, &now());

        assert_eq!(summary.total_income, 0);
        assert_eq!(summary.paid_income, 0);
        assert_eq!(summary.pending_income, 0);
        assert_eq!(summary.monthly_series.len(), 6);
        assert!(summary.monthly_series.iter().all(|p| p.total_income == 0 && p.rental_count == 0));
        assert!(summary.income_by_category.is_empty());
        assert_eq!(summary.average_duration_days, 0.0);
        assert_eq!(summary.average_daily_rate, 0.0);
    }

    #[test]
    fn test_paid_and_pending_scenario() {
        let two_months_ago = now().checked_sub_months(Months::new(2)).unwrap();
        let records = vec![
            rental(1_000_000, PaymentStatus::Paid, now()),
            rental(500_000, PaymentStatus::Pending, two_months_ago),
        ];

        let summary = compute_summary(&records, &now());

        assert_eq!(summary.total_income, 1_500_000);
        assert_eq!(summary.paid_income, 1_000_000);
        assert_eq!(summary.pending_income, 500_000);

        let series = &summary.monthly_series;
        assert_eq!(series[5].total_income, 1_000_000);
        assert_eq!(series[5].rental_count, 1);
        assert_eq!(series[3].total_income, 500_000);
        assert_eq!(series[3].rental_count, 1);
        for i in [0, 1, 2, 4] {
            assert_eq!(series[i].total_income, 0);
            assert_eq!(series[i].rental_count, 0);
        }
    }

    #[test]
    fn test_cancelled_counts_only_toward_total() {
        let records = vec![
            rental(300, PaymentStatus::Paid, now()),
            rental(200, PaymentStatus::Pending, now()),
            rental(100, PaymentStatus::Cancelled, now()),
        ];

        let summary = compute_summary(&records, &now());
        assert_eq!(summary.total_income, 600);
        assert_eq!(summary.paid_income + summary.pending_income, 500);
        assert_eq!(summary.other_income(), 100);
    }

    #[test]
    fn test_monthly_series_order_and_labels() {
        let records: Vec<RentalRecord> = Vec::new();
        let series = monthly_series(&records, &now());
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["May 2026", "Jun 2026", "Jul 2026", "Aug 2026", "Sep 2026", "Oct 2026"]);
    }

    #[test]
    fn test_monthly_series_crosses_year_and_skips_older() {
        let now: DateTime<Utc> = "2026-02-10T00:00:00Z".parse().unwrap();
        let records = vec![
            rental(10, PaymentStatus::Paid, "2025-09-01T00:00:00Z".parse().unwrap()),
            rental(20, PaymentStatus::Paid, "2025-09-30T23:59:59Z".parse().unwrap()),
            rental(40, PaymentStatus::Paid, "2025-08-31T23:59:59Z".parse().unwrap()), // 6 months back
            rental(80, PaymentStatus::Paid, "2026-03-01T00:00:00Z".parse().unwrap()), // future month
        ];

        let series = monthly_series(&records, &now);
        assert_eq!(series[0].label, "Sep 2025");
        assert_eq!(series[0].total_income, 30);
        assert_eq!(series[0].rental_count, 2);
        assert_eq!(series[5].label, "Feb 2026");
        assert_eq!(series.iter().map(|p| p.rental_count).sum::<usize>(), 2);
    }

    #[test]
    fn test_category_grouping() {
        let records = vec![
            with_type(rental(100, PaymentStatus::Paid, now()), "bus"),
            with_type(rental(50, PaymentStatus::Pending, now()), "bus"),
            with_type(rental(70, PaymentStatus::Paid, now()), "Bus"),
            rental(30, PaymentStatus::Paid, now()),
        ];

        let categories = income_by_category(&records);
        assert_eq!(categories, vec![
            CategoryIncome { category: "Bus".to_string(), total_income: 70 },
            CategoryIncome { category: "bus".to_string(), total_income: 150 },
            CategoryIncome { category: "unknown".to_string(), total_income: 30 },
        ]);
    }

    #[test]
    fn test_category_sum_matches_total() {
        let records = vec![
            with_type(rental(120, PaymentStatus::Paid, now()), "car"),
            with_type(rental(80, PaymentStatus::Cancelled, now()), "bus"),
            with_type(rental(-5, PaymentStatus::Pending, now()), "car"),
        ];

        let summary = compute_summary(&records, &now());
        let category_sum: i64 = summary.income_by_category.iter().map(|c| c.total_income).sum();
        assert_eq!(category_sum, summary.total_income);
        assert_eq!(summary.total_income, 195);
    }

    #[test]
    fn test_duration_policy() {
        let base = rental(300, PaymentStatus::Paid, now());

        assert_eq!(rental_duration_days(&with_dates(base.clone(), "2026-10-01", "2026-10-01")), 1);
        assert_eq!(rental_duration_days(&with_dates(base.clone(), "2026-10-01", "2026-10-03")), 3);
        assert_eq!(rental_duration_days(&with_dates(base.clone(), "2026-10-05", "2026-10-01")), 1);
        assert_eq!(rental_duration_days(&with_dates(base.clone(), "garbage", "2026-10-01")), 1);
        assert_eq!(rental_duration_days(&with_dates(base, "2026-10-01T22:00:00Z", "2026-10-02 09:00:00")), 2);
    }

    #[test]
    fn test_same_day_rental_rate_equals_amount() {
        let records = vec![with_dates(rental(750_000, PaymentStatus::Paid, now()), "2026-10-10", "2026-10-10")];

        let analytics = rental_analytics(&records);
        assert_eq!(analytics.average_duration_days, 1.0);
        assert_eq!(analytics.average_daily_rate, 750_000.0);
    }

    #[test]
    fn test_averages() {
        let records = vec![
            with_dates(rental(300, PaymentStatus::Paid, now()), "2026-10-01", "2026-10-03"), // 3 days, 100/day
            with_dates(rental(500, PaymentStatus::Paid, now()), "2026-10-09", "2026-10-01"), // clamped, 500/day
        ];

        let analytics = rental_analytics(&records);
        assert_eq!(analytics.average_duration_days, 2.0);
        assert_eq!(analytics.average_daily_rate, 300.0);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let records = vec![
            with_type(rental(100, PaymentStatus::Paid, now()), "car"),
            with_type(rental(200, PaymentStatus::Pending, now()), "bus"),
            rental(300, PaymentStatus::Cancelled, now()),
        ];

        let first = compute_summary(&records, &now());
        let second = compute_summary(&records, &now());
        assert_eq!(first, second);
        assert_eq!(records.len(), 3);
    }
}

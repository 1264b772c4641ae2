use fleetrent_core::{display_category, format_amount, AccountingReport, RentalRecord};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 20;
const DESTINATION_WIDTH: usize = 16;

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Rentals")]
    rentals: usize,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Renter")]
    renter: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

pub fn show_summary(report: &AccountingReport) {
    let summary = &report.summary;

    println!(
        "\n\x1b[1;36mAccounting, {}\x1b[0m ({} rentals)",
        report.period.title(),
        report.record_count
    );

    let cards = vec![
        CardRow { metric: "Total income", value: format_amount(summary.total_income) },
        CardRow { metric: "Paid", value: format_amount(summary.paid_income) },
        CardRow { metric: "Pending", value: format_amount(summary.pending_income) },
        CardRow { metric: "Cancelled", value: format_amount(summary.other_income()) },
        CardRow { metric: "Avg duration", value: format!("{:.1} days", summary.average_duration_days) },
        CardRow { metric: "Avg daily rate", value: format_amount(summary.average_daily_rate.round() as i64) },
    ];
    println!("{}", styled(Table::new(cards)));

    println!("\n\x1b[1;36mIncome trend\x1b[0m (last 6 months, all rentals)");
    let months: Vec<MonthRow> = summary.monthly_series.iter().map(|p| MonthRow {
        month: p.label.clone(),
        income: format_amount(p.total_income),
        rentals: p.rental_count,
    }).collect();
    println!("{}", styled(Table::new(months)));

    if summary.income_by_category.is_empty() {
        println!("\nNo rentals in this period.");
        return;
    }

    println!("\n\x1b[1;36mIncome by category\x1b[0m");
    let categories: Vec<CategoryRow> = summary.income_by_category.iter().map(|c| CategoryRow {
        category: display_category(&c.category),
        income: format_amount(c.total_income),
        share: share_of(c.total_income, summary.total_income),
    }).collect();
    println!("{}", styled(Table::new(categories)));
}

pub fn show_recent(report: &AccountingReport) {
    if report.recent.is_empty() {
        println!("No rentals found for {}.", report.period.title().to_lowercase());
        return;
    }

    println!("\n\x1b[1;36mRecent transactions, {}\x1b[0m", report.period.title());
    let rows: Vec<RecentRow> = report.recent.iter().map(recent_row).collect();
    println!("{}", styled(Table::new(rows)));
}

fn recent_row(rental: &RentalRecord) -> RecentRow {
    let vehicle = rental.vehicle.as_ref()
        .and_then(|v| v.name.clone().or_else(|| v.plate_number.clone()))
        .unwrap_or_else(|| "-".to_string());

    RecentRow {
        created: rental.created_at.format("%Y-%m-%d").to_string(),
        renter: truncate(&rental.renter_name, NAME_WIDTH),
        destination: truncate(&rental.destination, DESTINATION_WIDTH),
        vehicle,
        status: rental.payment_status.to_string(),
        amount: format_amount(rental.payment_amount),
    }
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

fn share_of(part: i64, whole: i64) -> String {
    if whole == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}

/// Cuts `s` to at most `max` terminal columns, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("Budi", 10), "Budi");
        assert_eq!(truncate("Bandung Timur", 8), "Bandung…");
        // wide characters take two columns each
        assert_eq!(truncate("東京都港区", 6), "東京…");
    }

    #[test]
    fn test_share_of() {
        assert_eq!(share_of(250, 1000), "25.0%");
        assert_eq!(share_of(10, 0), "-");
    }
}

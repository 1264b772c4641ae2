use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};
use anyhow::{anyhow, Result};

/// Parses a date column as the store returns it.
///
/// Accepts plain dates (`2026-10-01`), RFC 3339 timestamps and
/// `YYYY-MM-DD HH:MM:SS`. Timestamps keep their own calendar date.
pub fn parse_record_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    Err(anyhow!("Could not parse date: {}", input))
}

/// First day of the month `months_back` months before `date`'s month.
pub fn month_start_before(date: NaiveDate, months_back: u32) -> Option<NaiveDate> {
    date.with_day(1)?.checked_sub_months(Months::new(months_back))
}

pub fn month_label(first_day: NaiveDate) -> String {
    first_day.format("%b %Y").to_string()
}

/// Resolves the shorthand accepted by `fleetrent add` (today, tom, eow, eom,
/// +3d, +2w, +1m, fri, 2:fri) or a literal date, relative to `today`.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return add_days(today, 1),
        "eow" => {
            // Sunday closes the week
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday() as i64) % 7;
            return add_days(today, days_to_sunday);
        }
        "eom" => {
            let next_month = month_start_before(today, 0)
                .and_then(|d| d.checked_add_months(Months::new(1)))
                .ok_or_else(|| anyhow!("Date out of range"))?;
            return next_month.pred_opt().ok_or_else(|| anyhow!("Date out of range"));
        }
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('+') {
        if rest.len() < 2 {
            return Err(anyhow!("Invalid relative format"));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: u32 = num_str.parse().map_err(|_| anyhow!("Invalid relative format"))?;

        return match unit {
            "d" => add_days(today, count as i64),
            "w" => add_days(today, count as i64 * 7),
            // chrono clamps to the last day of the target month (Jan 31 + 1m -> Feb 28)
            "m" => today.checked_add_months(Months::new(count)).ok_or_else(|| anyhow!("Date out of range")),
            _ => Err(anyhow!("Unknown unit in relative time: {}", unit)),
        };
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target) = parse_weekday_str(day_str) {
            let mut days_needed = target.num_days_from_sunday() as i64 - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // 1:fri is the coming Friday, 2:fri the one after
            let days_needed = count.checked_sub(1)
                .and_then(|c| c.checked_mul(7))
                .and_then(|extra| extra.checked_add(days_needed))
                .ok_or_else(|| anyhow!("Date out of range"))?;
            return add_days(today, days_needed);
        }
    }

    parse_record_date(input)
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| anyhow!("Date out of range"))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().filter(|c| *c >= 1).map(|c| (c, day)),
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}

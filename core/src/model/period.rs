use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::model::rental::RentalRecord;

/// Slice of time the accounting report covers, relative to "now".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Month,
    Quarter,
    Year,
    All,
}

impl Default for ReportPeriod {
    fn default() -> Self {
        ReportPeriod::Month
    }
}

const CYCLE: [ReportPeriod; 4] = [
    ReportPeriod::Month,
    ReportPeriod::Quarter,
    ReportPeriod::Year,
    ReportPeriod::All,
];

impl ReportPeriod {
    /// Whether an instant belongs to this period, judged in `now`'s time zone.
    pub fn contains<Tz: TimeZone>(&self, at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        let local = at.with_timezone(&now.timezone());
        match self {
            ReportPeriod::Month => local.year() == now.year() && local.month() == now.month(),
            ReportPeriod::Quarter => local.year() == now.year() && quarter_of(local.month()) == quarter_of(now.month()),
            ReportPeriod::Year => local.year() == now.year(),
            ReportPeriod::All => true,
        }
    }

    pub fn next(self) -> Self {
        let i = CYCLE.iter().position(|p| *p == self).unwrap_or(0);
        CYCLE[(i + 1) % CYCLE.len()]
    }

    pub fn previous(self) -> Self {
        let i = CYCLE.iter().position(|p| *p == self).unwrap_or(0);
        CYCLE[(i + CYCLE.len() - 1) % CYCLE.len()]
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportPeriod::Month => "This Month",
            ReportPeriod::Quarter => "This Quarter",
            ReportPeriod::Year => "This Year",
            ReportPeriod::All => "All Time",
        }
    }
}

fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportPeriod::Month => "month",
            ReportPeriod::Quarter => "quarter",
            ReportPeriod::Year => "year",
            ReportPeriod::All => "all",
        };
        f.write_str(s)
    }
}

impl FromStr for ReportPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "month" | "m" => Ok(ReportPeriod::Month),
            "quarter" | "q" => Ok(ReportPeriod::Quarter),
            "year" | "y" => Ok(ReportPeriod::Year),
            "all" | "a" => Ok(ReportPeriod::All),
            other => Err(anyhow!("Unknown report period: '{}'", other)),
        }
    }
}

pub fn filter_by_period<'a, Tz: TimeZone>(
    records: &'a [RentalRecord],
    period: ReportPeriod,
    now: &DateTime<Tz>,
) -> Vec<&'a RentalRecord> {
    records.iter()
        .filter(|r| period.contains(&r.created_at, now))
        .collect()
}

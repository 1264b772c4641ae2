use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use fleetrent_core::ReportPeriod;
use tracing::{info, warn};

pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub period: ReportPeriod,
    pub recent_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            data_dir: lookup("FLEETRENT_DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            period: try_load(&lookup, "FLEETRENT_PERIOD", "month")?,
            recent_limit: try_load(&lookup, "FLEETRENT_RECENT_LIMIT", "5")?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("Invalid {key} value '{raw}': {e}")
    })
}

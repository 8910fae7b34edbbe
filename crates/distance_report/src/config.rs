use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use nominatim::client::{
    NominatimConfig, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, NOMINATIM_API_URL,
};

pub const DEFAULT_TIMELINE_FILE: &str = "timeline.json";

/// Everything a single run of the pipeline needs besides the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Date used for the report file name.
    pub today: NaiveDate,
    /// Number of lookups kept in flight at once.
    pub concurrency: usize,
}

impl RunConfig {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_TIMELINE_FILE),
            output_dir: PathBuf::from("."),
            today,
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub run: RunConfig,
    pub nominatim: NominatimConfig,
    /// Grid (in E7 units) that cached lookups are snapped to.
    pub cache_grid_e7: i64,
}

impl Config {
    pub fn from_env(today: NaiveDate) -> Self {
        Self::from_lookup(today, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(today: NaiveDate, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let run = RunConfig {
            input_path: text("TIMELINE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TIMELINE_FILE)),
            output_dir: text("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            today,
            concurrency: number(&lookup, "GEOCODER_CONCURRENCY")
                .filter(|&concurrency: &usize| concurrency > 0)
                .unwrap_or(1),
        };

        let nominatim = NominatimConfig {
            base_url: text("NOMINATIM_URL").unwrap_or_else(|| NOMINATIM_API_URL.to_owned()),
            user_agent: text("NOMINATIM_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            timeout: number(&lookup, "NOMINATIM_TIMEOUT_SECS")
                .filter(|&seconds: &u64| seconds > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            rate_limit_per_minute: number(&lookup, "NOMINATIM_RATE_LIMIT_PER_MINUTE")
                .filter(|&limit: &u64| limit > 0),
            proxy: text("NOMINATIM_PROXY"),
        };

        Self {
            run,
            nominatim,
            cache_grid_e7: number(&lookup, "GEOCODER_CACHE_GRID_E7")
                .filter(|&grid: &i64| grid > 0)
                .unwrap_or(1),
        }
    }
}

/// Parses a numeric variable. Values that do not parse are ignored with a
/// warning so that the default applies.
fn number<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring {key}='{value}': not a valid number");
            None
        }
    }
}

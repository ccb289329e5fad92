//! # Configuration
//!
//! Settings that shape how the engine reads calendars and how the CLI renders
//! charts. Configuration lives in a JSON file; every field has a default so an
//! empty object (or no file at all) is a valid configuration.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChartError, Result};
use crate::types::Granularity;

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV: &str = "SALESCHARTS_CONFIG";

/// The time zone whose wall calendar decides which day an instant falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarZone {
    /// The zone of the machine running the aggregation.
    #[default]
    Local,
    Utc,
    /// A fixed offset east of UTC.
    Fixed { offset_minutes: i32 },
}

impl CalendarZone {
    fn fixed_offset(minutes: i32) -> Option<FixedOffset> {
        FixedOffset::east_opt(minutes.checked_mul(60)?)
    }

    /// Calendar date of `instant` on this zone's wall clock.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            CalendarZone::Local => instant.with_timezone(&Local).date_naive(),
            CalendarZone::Utc => instant.date_naive(),
            CalendarZone::Fixed { offset_minutes } => match Self::fixed_offset(*offset_minutes) {
                Some(offset) => instant.with_timezone(&offset).date_naive(),
                None => instant.date_naive(),
            },
        }
    }

    /// Resolve a wall-clock reading in this zone to an instant.
    ///
    /// Ambiguous readings (DST fall-back) resolve to the earlier instant;
    /// readings that do not exist (DST spring-forward) yield `None`.
    pub fn from_local(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            CalendarZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            CalendarZone::Utc => Some(Utc.from_utc_datetime(&naive)),
            CalendarZone::Fixed { offset_minutes } => Self::fixed_offset(*offset_minutes)?
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Midnight at the start of `date` in this zone.
    ///
    /// Zones that skip midnight on a DST change start the day an hour later.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        self.from_local(midnight)
            .or_else(|| self.from_local(midnight + Duration::hours(1)))
    }
}

/// Output size of rendered charts, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zone used to turn timestamps into calendar dates
    pub zone: CalendarZone,
    /// Granularity used when none is given on the command line
    pub default_granularity: Granularity,
    /// Number of fetched date ranges kept in memory
    pub cache_capacity: usize,
    pub plot: PlotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zone: CalendarZone::default(),
            default_granularity: Granularity::Month,
            cache_capacity: 16,
            plot: PlotConfig::default(),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/salescharts/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("salescharts").join("config.json"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` wins, then `$SALESCHARTS_CONFIG`, then the default
    /// location. Explicit files must exist; a missing default file means
    /// "use defaults".
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if let Some(path) = env::var(CONFIG_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            return Self::from_file(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ChartError::Config(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(ChartError::Config(
                "plot width and height must be positive".to_string(),
            ));
        }
        if let CalendarZone::Fixed { offset_minutes } = self.zone {
            if CalendarZone::fixed_offset(offset_minutes).is_none() {
                return Err(ChartError::Config(format!(
                    "offset of {} minutes is out of range",
                    offset_minutes
                )));
            }
        }
        Ok(())
    }
}

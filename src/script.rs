//! Gesture scripts: the TOML files `calgrid replay` runs.
//!
//! ```toml
//! [[step]]
//! action = "select"
//! start = "2025-08-06T14:00"
//! end = "2025-08-06T15:00"
//!
//! [[step]]
//! action = "save"
//! title = "Sync"
//! repeat = "weekly"
//! interval = 2
//! weekdays = ["Tue"]
//!
//! [[step]]
//! action = "drag"
//! event = "Sync"
//! by = "1day"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use calgrid_core::{FormInput, Frequency};
use chrono::{NaiveDate, Weekday};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Click on an empty day cell.
    ClickDate { date: String },
    /// Drag-select a range of cells or time slots.
    Select {
        start: String,
        end: String,
        #[serde(default)]
        all_day: bool,
    },
    /// Click an existing event (by title).
    ClickEvent { event: String },
    /// Submit the dialog. Fields left out keep what the dialog shows.
    Save(SaveFields),
    Cancel,
    /// Drag an existing event (by title). `by` is a duration like "1day" or "-30m".
    Drag { event: String, by: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SaveFields {
    pub title: Option<String>,
    pub repeat: Option<RepeatChoice>,
    pub interval: Option<i64>,
    pub weekdays: Option<Vec<Weekday>>,
    pub until: Option<NaiveDate>,
    /// Empty the end date field.
    #[serde(default)]
    pub clear_until: bool,
}

/// The dialog's "Repeat" select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatChoice {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RepeatChoice {
    fn frequency(self) -> Option<Frequency> {
        match self {
            RepeatChoice::None => None,
            RepeatChoice::Daily => Some(Frequency::Daily),
            RepeatChoice::Weekly => Some(Frequency::Weekly),
            RepeatChoice::Monthly => Some(Frequency::Monthly),
        }
    }
}

impl SaveFields {
    /// Apply the edited fields on top of what the dialog was opened with.
    pub fn merge_into(&self, shown: &FormInput) -> FormInput {
        FormInput {
            title: self.title.clone().unwrap_or_else(|| shown.title.clone()),
            repeat: self.repeat.map_or(shown.repeat, RepeatChoice::frequency),
            interval: self.interval.unwrap_or(shown.interval),
            weekdays: self.weekdays.clone().unwrap_or_else(|| shown.weekdays.clone()),
            until: if self.clear_until {
                None
            } else {
                self.until.or(shown.until)
            },
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Parse a drag distance into signed milliseconds.
pub fn parse_delta(input: &str) -> Result<i64> {
    let input = input.trim();
    let (negative, magnitude) = match input.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let duration = humantime::parse_duration(magnitude)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    let ms = i64::try_from(duration.as_millis()).context("Duration too large")?;

    Ok(if negative { -ms } else { ms })
}

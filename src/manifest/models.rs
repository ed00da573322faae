//!
//! Documentation of the manifest models module.
//! The submission, the derived record, the month window and the monthly summary.
//!

use chrono::{DateTime, Datelike, Duration, Month, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::error::ManifestError;

/// A time-of-day value as it arrives from a client.
///
/// Accepted shapes, tried in this order:
/// * an RFC 3339 moment, `"2024-05-02T08:00:00Z"`
/// * a structured time of day, `{ "hour": 14, "minute": 15 }`
/// * a wall-clock string, `"2:15 PM"` or `"14:15"`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TimeField {
    Moment(DateTime<Utc>),
    TimeOfDay { hour: u32, minute: u32 },
    Clock(String),
}

/// A distance or count that may arrive as a JSON number or as form text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField::Number(value)
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

/// The creation (and update) payload of a manifest
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestInput {
    /// The route identifier
    #[serde(default)]
    pub tor: String,
    #[serde(default)]
    pub station: String,
    /// The vehicle plate
    #[serde(default)]
    pub plate: String,

    #[serde(default)]
    pub start_time: Option<TimeField>,
    #[serde(default)]
    pub departure: Option<TimeField>,
    #[serde(default)]
    pub first_delivery: Option<TimeField>,
    #[serde(default)]
    pub last_delivery: Option<TimeField>,
    #[serde(default)]
    pub return_time: Option<TimeField>,
    #[serde(default)]
    pub end_time: Option<TimeField>,

    #[serde(default)]
    pub km_start: Option<NumericField>,
    #[serde(default)]
    pub km_end: Option<NumericField>,
    #[serde(default)]
    pub packages: Option<NumericField>,
    #[serde(default)]
    pub returned_packages: Option<NumericField>,

    /// The submitting user, becomes the record's `creator`
    #[serde(default)]
    pub user_id: String,
}

/// The mandated break for a shift, labelled the way drivers read it
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriverBreak {
    #[default]
    #[serde(rename = "30 min")]
    ThirtyMinutes,
    #[serde(rename = "45 min")]
    FortyFiveMinutes,
}

impl DriverBreak {
    pub fn label(&self) -> &'static str {
        match self {
            DriverBreak::ThirtyMinutes => "30 min",
            DriverBreak::FortyFiveMinutes => "45 min",
        }
    }

    pub fn from_label(label: &str) -> Option<DriverBreak> {
        match label.trim() {
            "30 min" => Some(DriverBreak::ThirtyMinutes),
            "45 min" => Some(DriverBreak::FortyFiveMinutes),
            _ => None,
        }
    }
}

/// A manifest as it is stored and served. Derived fields are never client supplied.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    /// Store-assigned identifier, absent until the record is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub tor: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub plate: String,

    pub start_time: DateTime<Utc>,
    pub departure: DateTime<Utc>,
    pub first_delivery: DateTime<Utc>,
    pub last_delivery: DateTime<Utc>,
    pub return_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    #[serde(default)]
    pub km_start: f64,
    #[serde(default)]
    pub km_end: f64,
    #[serde(default)]
    pub packages: i64,
    #[serde(default)]
    pub returned_packages: i64,

    #[serde(default)]
    pub total_packages: i64,
    #[serde(default)]
    pub km_total: f64,
    #[serde(default)]
    pub working_hours: f64,
    #[serde(default)]
    pub driver_break: DriverBreak,
    #[serde(default)]
    pub expenses: bool,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub creator: String,
}

/// One calendar month, the window of a monthly summary
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year: i32,
    /// 1 = January ... 12 = December
    pub month: u32,
}

impl CalendarMonth {
    /// Both the month and the one after it must be representable, so the window has an end
    pub fn new(year: i32, month: u32) -> Result<CalendarMonth, ManifestError> {
        let candidate = CalendarMonth { year, month };
        match (candidate.start(), candidate.next().start()) {
            (Some(_), Some(_)) => Ok(candidate),
            _ => Err(ManifestError::InvalidMonth { year, month }),
        }
    }

    /// The month `moment` falls in
    pub fn containing(moment: DateTime<Utc>) -> CalendarMonth {
        CalendarMonth {
            year: moment.year(),
            month: moment.month(),
        }
    }

    fn start(&self) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|midnight| Utc.from_utc_datetime(&midnight))
    }

    /// 00:00:00 UTC on the first day, clamped to the calendar's range
    pub fn first_instant(&self) -> DateTime<Utc> {
        match self.start() {
            Some(start) => start,
            None if self.year > 0 => DateTime::<Utc>::MAX_UTC,
            None => DateTime::<Utc>::MIN_UTC,
        }
    }

    /// One nanosecond before the next month begins, clamped to the calendar's range
    pub fn last_instant(&self) -> DateTime<Utc> {
        self.next().start()
            .and_then(|start| start.checked_sub_signed(Duration::nanoseconds(1)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn next(&self) -> CalendarMonth {
        match self.month {
            12 => CalendarMonth { year: self.year.saturating_add(1), month: 1 },
            month => CalendarMonth { year: self.year, month: month + 1 },
        }
    }

    pub fn contains(&self, moment: DateTime<Utc>) -> bool {
        moment >= self.first_instant() && moment <= self.last_instant()
    }

    /// English month name, "January" ... "December"
    pub fn name(&self) -> &'static str {
        match u8::try_from(self.month).ok().and_then(|m| Month::try_from(m).ok()) {
            Some(month) => month.name(),
            None => "",
        }
    }
}

/// Totals of one user's manifests inside one calendar month
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub km_total: f64,
    pub working_hours: f64,
    pub total_packages: i64,
    /// How many of the month's shifts qualify for an expense claim
    pub expenses: u32,
    pub manifest_count: usize,
    pub current_month_name: String,
    pub year: i32,
    pub month: u32,
    pub manifests: Vec<ManifestRecord>,
}

//!
//! Documentation of the deriver module.
//! Turns a raw submission into a record with every derived field filled in.
//!

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::clock::{on_day, parse_time_string_to_date};
use super::error::{ClockParseError, ManifestError};
use super::models::*;

/// Which worked-hours value the expense threshold is compared against
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseBasis {
    /// After the unpaid baseline only, before the second break
    Raw,
    /// The final, clamped worked hours
    Final,
}

pub const EXPENSE_THRESHOLD_APPLIES_TO: ExpenseBasis = ExpenseBasis::Final;

pub const UNPAID_BASELINE_HOURS: f64 = 0.5;
pub const SECOND_BREAK_THRESHOLD_HOURS: f64 = 8.5;
pub const SECOND_BREAK_HOURS: f64 = 0.25;
pub const EXPENSE_THRESHOLD_HOURS: f64 = 8.0;
pub const LONG_BREAK_THRESHOLD_HOURS: f64 = 8.5;

/// The thresholds and deductions the deriver applies
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DerivationRules {
    pub unpaid_baseline_hours: f64,
    pub second_break_threshold_hours: f64,
    pub second_break_hours: f64,
    pub expense_threshold_hours: f64,
    pub expense_basis: ExpenseBasis,
    /// Worked hours above this get the 45 minute break
    pub long_break_threshold_hours: f64,
}

impl Default for DerivationRules {
    fn default() -> Self {
        DerivationRules {
            unpaid_baseline_hours: UNPAID_BASELINE_HOURS,
            second_break_threshold_hours: SECOND_BREAK_THRESHOLD_HOURS,
            second_break_hours: SECOND_BREAK_HOURS,
            expense_threshold_hours: EXPENSE_THRESHOLD_HOURS,
            expense_basis: EXPENSE_THRESHOLD_APPLIES_TO,
            long_break_threshold_hours: LONG_BREAK_THRESHOLD_HOURS,
        }
    }
}

/// Worked hours with both values the expense rule may look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkedHours {
    /// Shift length minus the unpaid baseline, unclamped
    pub raw: f64,
    pub net: f64,
}

impl DerivationRules {
    pub fn worked_hours(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> WorkedHours {
        let shift = (end - start).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0);
        let raw = shift - self.unpaid_baseline_hours;

        let mut net = raw;
        if raw >= self.second_break_threshold_hours {
            net -= self.second_break_hours;
        }

        WorkedHours { raw, net: net.max(0.0) }
    }

    pub fn expenses(&self, hours: WorkedHours) -> bool {
        let compared = match self.expense_basis {
            ExpenseBasis::Raw => hours.raw,
            ExpenseBasis::Final => hours.net,
        };
        compared >= self.expense_threshold_hours
    }

    pub fn driver_break(&self, working_hours: f64) -> DriverBreak {
        if working_hours <= self.long_break_threshold_hours {
            DriverBreak::ThirtyMinutes
        } else {
            DriverBreak::FortyFiveMinutes
        }
    }
}

///
/// Derive a manifest record from a submission
///
/// # Arguments
///
/// * `input` - The submission, times and numbers not yet validated
/// * `now` - The creation moment; its UTC date anchors wall-clock times
/// * `rules` - Deductions and thresholds
///
/// # Output
///
/// * Ok(record) - every derived field computed, `id` unset
/// * Err(ManifestError) - names the first offending field
///
pub fn derive(input: &ManifestInput, now: DateTime<Utc>, rules: &DerivationRules) -> Result<ManifestRecord, ManifestError> {
    let today = now.date_naive();

    let start_time     = resolve_time("startTime", &input.start_time, today)?;
    let departure      = resolve_time("departure", &input.departure, today)?;
    let first_delivery = resolve_time("firstDelivery", &input.first_delivery, today)?;
    let last_delivery  = resolve_time("lastDelivery", &input.last_delivery, today)?;
    let return_time    = resolve_time("returnTime", &input.return_time, today)?;
    let end_time       = resolve_time("endTime", &input.end_time, today)?;

    let km_start = distance("kmStart", &input.km_start)?;
    let km_end   = distance("kmEnd", &input.km_end)?;
    let packages = count("packages", &input.packages)?;
    let returned_packages = count("returnedPackages", &input.returned_packages)?;

    let hours = rules.worked_hours(start_time, end_time);
    if !hours.net.is_finite() {
        return Err(ManifestError::Derivation(format!("worked hours came out as {}", hours.net)));
    }

    let mut total_packages = packages;
    if returned_packages > 0 {
        total_packages = match packages.checked_sub(returned_packages) {
            Some(total) => total,
            None => return Err(invalid_number("returnedPackages", &input.returned_packages)),
        };
    }

    let record = ManifestRecord {
        id: None,
        tor: input.tor.clone(),
        station: input.station.clone(),
        plate: input.plate.clone(),
        start_time,
        departure,
        first_delivery,
        last_delivery,
        return_time,
        end_time,
        km_start,
        km_end,
        packages,
        returned_packages,
        total_packages,
        km_total: km_end - km_start,
        working_hours: hours.net,
        driver_break: rules.driver_break(hours.net),
        expenses: rules.expenses(hours),
        upload_date: now,
        creator: input.user_id.clone(),
    };

    debug!("{}", format!("Derived manifest for {}: {:.2}h, break {}, expenses {}",
        record.creator, record.working_hours, record.driver_break.label(), record.expenses));

    Ok(record)
}

/// Resolve a time field against `today`
fn resolve_time(field: &'static str, value: &Option<TimeField>, today: NaiveDate) -> Result<DateTime<Utc>, ManifestError> {
    let value = match value {
        None => return Err(ManifestError::MissingField { field }),
        Some(value) => value,
    };

    match value {
        TimeField::Moment(moment) => Ok(*moment),
        TimeField::TimeOfDay { hour, minute } => match on_day(today, *hour, *minute) {
            Some(moment) => Ok(moment),
            None => Err(ManifestError::InvalidTime {
                field,
                source: ClockParseError::Malformed(format!("{}:{:02}", hour, minute)),
            }),
        },
        TimeField::Clock(text) => parse_time_string_to_date(text, today)
            .map_err(|source| ManifestError::InvalidTime { field, source }),
    }
}

/// A decimal distance reading
fn distance(field: &'static str, value: &Option<NumericField>) -> Result<f64, ManifestError> {
    let parsed = match value {
        None => return Err(ManifestError::MissingField { field }),
        Some(NumericField::Number(number)) => Some(*number),
        Some(NumericField::Text(text)) => text.trim().parse::<f64>().ok(),
    };

    match parsed {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(invalid_number(field, value)),
    }
}

/// 2^63, the first whole number past `i64::MAX`
const COUNT_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A whole package count
fn count(field: &'static str, value: &Option<NumericField>) -> Result<i64, ManifestError> {
    let parsed = match value {
        None => return Err(ManifestError::MissingField { field }),
        Some(NumericField::Number(number))
            if number.fract() == 0.0 && *number >= -COUNT_LIMIT && *number < COUNT_LIMIT => Some(*number as i64),
        Some(NumericField::Number(_)) => None,
        Some(NumericField::Text(text)) => text.trim().parse::<i64>().ok(),
    };

    match parsed {
        Some(number) => Ok(number),
        None => Err(invalid_number(field, value)),
    }
}

fn invalid_number(field: &'static str, value: &Option<NumericField>) -> ManifestError {
    let value = match value {
        Some(NumericField::Number(number)) => number.to_string(),
        Some(NumericField::Text(text)) => text.clone(),
        None => String::new(),
    };
    ManifestError::InvalidNumber { field, value }
}

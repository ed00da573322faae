//!
//! Documentation of the aggregator module.
//! Reduces a user's manifests to the totals of one calendar month.
//!

use log::trace;

use super::models::*;

///
/// Sum a month of manifests
///
/// # Arguments
///
/// * `records` - The user's manifests; anything uploaded outside `month` is left out
/// * `month` - The calendar month to report on
///
/// # Output
///
/// * The summary, all zeroes with the month's name when nothing falls in the window
///
pub fn aggregate_month(records: Vec<ManifestRecord>, month: CalendarMonth) -> MonthlySummary {
    let mut summary = MonthlySummary {
        km_total: 0.0,
        working_hours: 0.0,
        total_packages: 0,
        expenses: 0,
        manifest_count: 0,
        current_month_name: month.name().to_string(),
        year: month.year,
        month: month.month,
        manifests: Vec::with_capacity(records.len()),
    };

    for record in records {
        if !month.contains(record.upload_date) {
            trace!("{}", format!("Skipping manifest {:?} uploaded {}", record.id, record.upload_date));
            continue;
        }

        summary.km_total      += finite_or_zero(record.km_total);
        summary.working_hours += finite_or_zero(record.working_hours);
        summary.total_packages = summary.total_packages.saturating_add(record.total_packages);
        if record.expenses {
            summary.expenses += 1;
        }
        summary.manifests.push(record);
    }

    summary.manifest_count = summary.manifests.len();
    summary
}

/// NaN and infinities count as nothing
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn may() -> CalendarMonth {
        CalendarMonth::new(2024, 5).unwrap()
    }

    fn uploaded(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 18, 0, 0).unwrap()
    }

    fn record(upload_date: DateTime<Utc>, km_total: f64, working_hours: f64, total_packages: i64, expenses: bool) -> ManifestRecord {
        ManifestRecord {
            id: Some(format!("m-{}", upload_date.timestamp())),
            tor: "TOR-7".to_string(),
            station: "DXB3".to_string(),
            plate: "AB-123-CD".to_string(),
            start_time: upload_date,
            departure: upload_date,
            first_delivery: upload_date,
            last_delivery: upload_date,
            return_time: upload_date,
            end_time: upload_date,
            km_start: 0.0,
            km_end: km_total,
            packages: total_packages,
            returned_packages: 0,
            total_packages,
            km_total,
            working_hours,
            driver_break: DriverBreak::ThirtyMinutes,
            expenses,
            upload_date,
            creator: "driver-1".to_string(),
        }
    }

    #[test]
    fn empty_month() {
        let summary = aggregate_month(vec![], may());
        assert_eq!(summary.manifest_count, 0);
        assert_eq!(summary.km_total, 0.0);
        assert_eq!(summary.working_hours, 0.0);
        assert_eq!(summary.total_packages, 0);
        assert_eq!(summary.expenses, 0);
        assert_eq!(summary.current_month_name, "May");
        assert!(summary.manifests.is_empty());
    }

    #[test]
    fn three_shifts() {
        let records = vec![
            record(uploaded(2), 10.0, 8.0, 4, true),
            record(uploaded(3), 20.0, 7.5, 6, false),
            record(uploaded(6), 5.0, 9.0, 2, true),
        ];
        let summary = aggregate_month(records, may());

        assert_eq!(summary.km_total, 35.0);
        assert_eq!(summary.working_hours, 24.5);
        assert_eq!(summary.total_packages, 12);
        assert_eq!(summary.expenses, 2);
        assert_eq!(summary.manifest_count, 3);
        assert_eq!(summary.manifests.len(), 3);
    }

    #[test]
    fn records_outside_the_month_are_left_out() {
        let records = vec![
            record(Utc.with_ymd_and_hms(2024, 4, 30, 23, 59, 59).unwrap(), 100.0, 9.0, 50, true),
            record(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(), 10.0, 8.0, 4, true),
            record(Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap(), 20.0, 7.5, 6, false),
            record(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(), 100.0, 9.0, 50, true),
        ];
        let summary = aggregate_month(records, may());

        assert_eq!(summary.manifest_count, 2);
        assert_eq!(summary.km_total, 30.0);
        assert_eq!(summary.total_packages, 10);
        assert_eq!(summary.expenses, 1);
    }

    #[test]
    fn package_totals_saturate() {
        let records = vec![
            record(uploaded(2), 0.0, 8.0, i64::MAX, false),
            record(uploaded(3), 0.0, 8.0, 5, false),
        ];
        assert_eq!(aggregate_month(records, may()).total_packages, i64::MAX);

        let records = vec![
            record(uploaded(2), 0.0, 8.0, i64::MIN, false),
            record(uploaded(3), 0.0, 8.0, -5, false),
        ];
        assert_eq!(aggregate_month(records, may()).total_packages, i64::MIN);
    }

    #[test]
    fn unusable_numbers_count_as_zero() {
        let records = vec![
            record(uploaded(2), f64::NAN, 8.0, 4, false),
            record(uploaded(3), 20.0, f64::INFINITY, 6, false),
        ];
        let summary = aggregate_month(records, may());

        assert_eq!(summary.km_total, 20.0);
        assert_eq!(summary.working_hours, 8.0);
        assert_eq!(summary.manifest_count, 2);
    }
}

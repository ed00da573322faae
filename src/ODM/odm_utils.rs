//!
//! Documentation of the Database Utilities module.
//! Conversions between records and documents, and query building.
//!

use super::*;
use models::*;
use store::{ManifestQuery, StoreError};
use manifest::models::{DriverBreak, ManifestRecord};
use bson::{doc, Document, Bson, DateTime, oid::ObjectId};
use mongodb::options::FindOptions;

/// Converts a ManifestDocument to ManifestRecord, missing numbers read as 0
pub fn doc_to_manifest(document: &ManifestDocument) -> ManifestRecord {
    let driver_break = document
        .driver_break
        .as_deref()
        .and_then(DriverBreak::from_label)
        .unwrap_or_default();

    // transform ObjectId to String
    ManifestRecord {
        id:      document._id.map(|id| id.to_hex()),
        tor:     document.tor.clone(),
        station: document.station.clone(),
        plate:   document.plate.clone(),

        start_time:     document.start_time.to_chrono(),
        departure:      document.departure.to_chrono(),
        first_delivery: document.first_delivery.to_chrono(),
        last_delivery:  document.last_delivery.to_chrono(),
        return_time:    document.return_time.to_chrono(),
        end_time:       document.end_time.to_chrono(),

        km_start:          document.km_start.unwrap_or(0.0),
        km_end:            document.km_end.unwrap_or(0.0),
        packages:          document.packages.unwrap_or(0),
        returned_packages: document.returned_packages.unwrap_or(0),

        total_packages: document.total_packages.unwrap_or(0),
        km_total:       document.km_total.unwrap_or(0.0),
        working_hours:  document.working_hours.unwrap_or(0.0),
        driver_break,
        expenses:       document.expenses.unwrap_or(0) != 0,
        upload_date:    document.upload_date.to_chrono(),
        creator:        document.creator.clone(),
    }
}

/// Converts a ManifestRecord to the document stored for it
pub fn manifest_to_doc(record: &ManifestRecord, _id: Option<ObjectId>) -> ManifestDocument {
    ManifestDocument {
        _id,
        tor:     record.tor.clone(),
        station: record.station.clone(),
        plate:   record.plate.clone(),

        start_time:     DateTime::from_chrono(record.start_time),
        departure:      DateTime::from_chrono(record.departure),
        first_delivery: DateTime::from_chrono(record.first_delivery),
        last_delivery:  DateTime::from_chrono(record.last_delivery),
        return_time:    DateTime::from_chrono(record.return_time),
        end_time:       DateTime::from_chrono(record.end_time),

        km_start:          Some(record.km_start),
        km_end:            Some(record.km_end),
        packages:          Some(record.packages),
        returned_packages: Some(record.returned_packages),

        total_packages: Some(record.total_packages),
        km_total:       Some(record.km_total),
        working_hours:  Some(record.working_hours),
        driver_break:   Some(record.driver_break.label().to_string()),
        expenses:       Some(if record.expenses { 1 } else { 0 }),
        upload_date:    DateTime::from_chrono(record.upload_date),
        creator:        record.creator.clone(),
    }
}

/// Parses a manifest id into the ObjectId it is stored under
pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    match ObjectId::parse_str(id) {
        Ok(value) => Ok(value),
        Err(_) => Err(StoreError::InvalidId(id.to_string())),
    }
}

/// Gets the filter document of a query
pub fn query_to_filter(query: &ManifestQuery) -> Document {
    let mut filter = Document::new();

    if let Some(creator) = &query.creator {
        filter.insert("creator", creator.clone());
    }

    let mut range = Document::new();
    if let Some(from) = query.uploaded_from {
        range.insert("$gte", DateTime::from_chrono(from));
    }
    if let Some(to) = query.uploaded_to {
        range.insert("$lte", DateTime::from_chrono(to));
    }
    if !range.is_empty() {
        filter.insert("uploadDate", range);
    }

    if let Some(text) = &query.search {
        let pattern = regex::escape(text);
        let fields: Vec<Bson> = ["tor", "station", "plate"]
            .iter()
            .map(|field| {
                let mut clause = Document::new();
                clause.insert(*field, doc! { "$regex": pattern.clone(), "$options": "i" });
                Bson::Document(clause)
            })
            .collect();
        filter.insert("$or", fields);
    }

    filter
}

/// Gets the find options (order, limit) of a query
pub fn query_to_options(query: &ManifestQuery) -> FindOptions {
    let mut options = FindOptions::default();
    if query.newest_first {
        options.sort = Some(doc! { "uploadDate": -1, "_id": -1 });
    }
    options.limit = query.limit;
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifest::models::CalendarMonth;
    use chrono::{TimeZone, Utc};

    fn document() -> ManifestDocument {
        let moment = DateTime::from_chrono(Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap());
        ManifestDocument {
            _id: Some(ObjectId::new()),
            tor: "TOR-114".to_string(),
            station: "DXB3".to_string(),
            plate: "AB-123-CD".to_string(),
            start_time: moment,
            departure: moment,
            first_delivery: moment,
            last_delivery: moment,
            return_time: moment,
            end_time: moment,
            km_start: Some(100.0),
            km_end: Some(250.0),
            packages: Some(20),
            returned_packages: Some(2),
            total_packages: Some(18),
            km_total: Some(150.0),
            working_hours: Some(8.25),
            driver_break: Some("30 min".to_string()),
            expenses: Some(1),
            upload_date: moment,
            creator: "driver-1".to_string(),
        }
    }

    #[test]
    fn document_and_record_carry_the_same_values() {
        let original = document();
        let record = doc_to_manifest(&original);

        assert_eq!(record.id, original._id.map(|id| id.to_hex()));
        assert_eq!(record.working_hours, 8.25);
        assert!(record.expenses);
        assert_eq!(manifest_to_doc(&record, original._id), original);
    }

    #[test]
    fn missing_derived_fields_read_as_zero() {
        let mut sparse = document();
        sparse.total_packages = None;
        sparse.km_total = None;
        sparse.working_hours = None;
        sparse.driver_break = None;
        sparse.expenses = None;

        let record = doc_to_manifest(&sparse);
        assert_eq!(record.total_packages, 0);
        assert_eq!(record.km_total, 0.0);
        assert_eq!(record.working_hours, 0.0);
        assert_eq!(record.driver_break, DriverBreak::ThirtyMinutes);
        assert!(!record.expenses);
    }

    #[test]
    fn month_filter_is_an_inclusive_range_on_upload_date() {
        let may = CalendarMonth::new(2024, 5).unwrap();
        let filter = query_to_filter(&ManifestQuery::all().created_by("driver-1").within(may));

        assert_eq!(
            filter,
            doc! {
                "creator": "driver-1",
                "uploadDate": {
                    "$gte": DateTime::from_chrono(may.first_instant()),
                    "$lte": DateTime::from_chrono(may.last_instant()),
                },
            }
        );
    }

    #[test]
    fn search_text_is_escaped() {
        let filter = query_to_filter(&ManifestQuery::all().matching("A.B"));
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(
            clauses[0],
            Bson::Document(doc! { "tor": { "$regex": "A\\.B", "$options": "i" } })
        );
    }

    #[test]
    fn latest_sorts_descending_with_limit() {
        let options = query_to_options(&ManifestQuery::latest(7));
        assert_eq!(options.sort, Some(doc! { "uploadDate": -1, "_id": -1 }));
        assert_eq!(options.limit, Some(7));

        let unordered = query_to_options(&ManifestQuery::default());
        assert_eq!(unordered.sort, None);
        assert_eq!(unordered.limit, None);
    }

    #[test]
    fn ids_must_be_object_ids() {
        assert!(parse_id("not-an-id").is_err());
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);
    }
}

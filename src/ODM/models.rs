//!
//! Documentation of the Models module.
//! Contains the document shapes stored in MongoDB.
//!

use serde::{Serialize, Deserialize};
use bson::{oid::ObjectId, DateTime};

/*
Models for the MongoDB operations
*/
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    /// The ID of the model.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    /// The route identifier
    #[serde(default)]
    pub tor: String,
    #[serde(default)]
    pub station: String,
    /// The vehicle's plate
    #[serde(default)]
    pub plate: String,

    pub start_time: DateTime,
    pub departure: DateTime,
    pub first_delivery: DateTime,
    pub last_delivery: DateTime,
    pub return_time: DateTime,
    pub end_time: DateTime,

    #[serde(default)]
    pub km_start: Option<f64>,
    #[serde(default)]
    pub km_end: Option<f64>,
    #[serde(default)]
    pub packages: Option<i64>,
    #[serde(default)]
    pub returned_packages: Option<i64>,

    // Derived, older documents may lack any of them
    #[serde(default)]
    pub total_packages: Option<i64>,
    #[serde(default)]
    pub km_total: Option<f64>,
    #[serde(default)]
    pub working_hours: Option<f64>,
    #[serde(default)]
    pub driver_break: Option<String>,
    /// 1 when the shift qualifies for an expense claim, 0 otherwise
    #[serde(default)]
    pub expenses: Option<i32>,
    pub upload_date: DateTime,
    /// The user that submitted the manifest
    #[serde(default)]
    pub creator: String,
}

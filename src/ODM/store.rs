//!
//! Documentation of the store module.
//! The document store the application talks to, as a trait the caller owns a handle of.
//!

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::manifest::models::{CalendarMonth, ManifestRecord};

/// Store failures, passed up unchanged
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("manifest {0} not found")]
    NotFound(String),

    #[error("'{0}' is not a manifest id")]
    InvalidId(String),

    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

/// What to list: filters, order and size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestQuery {
    /// Equality on `creator`
    pub creator: Option<String>,
    /// `uploadDate >= uploaded_from`
    pub uploaded_from: Option<DateTime<Utc>>,
    /// `uploadDate <= uploaded_to`
    pub uploaded_to: Option<DateTime<Utc>>,
    /// Case-insensitive text on tor, station and plate
    pub search: Option<String>,
    /// Order by `uploadDate`, newest first
    pub newest_first: bool,
    pub limit: Option<i64>,
}

impl ManifestQuery {
    /// Everything, newest first
    pub fn all() -> ManifestQuery {
        ManifestQuery {
            newest_first: true,
            ..ManifestQuery::default()
        }
    }

    pub fn latest(limit: i64) -> ManifestQuery {
        ManifestQuery {
            limit: Some(limit),
            ..ManifestQuery::all()
        }
    }

    pub fn created_by(mut self, creator: &str) -> ManifestQuery {
        self.creator = Some(creator.to_string());
        self
    }

    /// Restricts to uploads inside `month`, both ends inclusive
    pub fn within(mut self, month: CalendarMonth) -> ManifestQuery {
        self.uploaded_from = Some(month.first_instant());
        self.uploaded_to = Some(month.last_instant());
        self
    }

    pub fn matching(mut self, text: &str) -> ManifestQuery {
        self.search = Some(text.to_string());
        self
    }

    /// Whether `record` passes the filters (order and limit aside)
    pub fn matches(&self, record: &ManifestRecord) -> bool {
        if let Some(creator) = &self.creator {
            if &record.creator != creator {
                return false;
            }
        }
        if let Some(from) = self.uploaded_from {
            if record.upload_date < from {
                return false;
            }
        }
        if let Some(to) = self.uploaded_to {
            if record.upload_date > to {
                return false;
            }
        }
        if let Some(text) = &self.search {
            let needle = text.to_lowercase();
            let found = [&record.tor, &record.station, &record.plate]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        true
    }
}

/// A manifest collection in some document database.
///
/// Handles are built once by the binary and passed down; nothing here is global.
#[rocket::async_trait]
pub trait ManifestStore: Send + Sync {
    /// Stores a new record, returns it with its assigned id
    async fn create(&self, record: ManifestRecord) -> Result<ManifestRecord, StoreError>;

    async fn list(&self, query: &ManifestQuery) -> Result<Vec<ManifestRecord>, StoreError>;

    async fn get(&self, id: &str) -> Result<ManifestRecord, StoreError>;

    /// Replaces the record stored under `id`, returns the stored result
    async fn update(&self, id: &str, record: ManifestRecord) -> Result<ManifestRecord, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

//!
//! Documentation of the memory store module.
//! An in-process manifest collection, for local runs without MongoDB and for tests.
//!

use std::collections::HashMap;

use bson::oid::ObjectId;
use log::info;
use rocket::tokio::sync::RwLock;

use super::manifest::models::ManifestRecord;
use super::store::*;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, ManifestRecord>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        info!("Using the in-memory manifest store, nothing will be persisted");
        MemoryStore::default()
    }
}

#[rocket::async_trait]
impl ManifestStore for MemoryStore {
    async fn create(&self, mut record: ManifestRecord) -> Result<ManifestRecord, StoreError> {
        let id = ObjectId::new().to_hex();
        record.id = Some(id.clone());

        self.records.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn list(&self, query: &ManifestQuery) -> Result<Vec<ManifestRecord>, StoreError> {
        let records = self.records.read().await;

        let mut found: Vec<ManifestRecord> = records
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();

        // ids are ObjectIds, so they break upload ties in creation order
        found.sort_by(|a, b| (a.upload_date, &a.id).cmp(&(b.upload_date, &b.id)));
        if query.newest_first {
            found.reverse();
        }
        if let Some(limit) = query.limit {
            found.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<ManifestRecord, StoreError> {
        match self.records.read().await.get(id) {
            Some(record) => Ok(record.clone()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn update(&self, id: &str, mut record: ManifestRecord) -> Result<ManifestRecord, StoreError> {
        let mut records = self.records.write().await;

        match records.get_mut(id) {
            None => Err(StoreError::NotFound(id.to_string())),
            Some(stored) => {
                record.id = Some(id.to_string());
                *stored = record.clone();
                Ok(record)
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self.records.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

//!
//! Documentation of the service module.
//! The application operations: derive, then hand over to the store the caller passes in.
//!

use chrono::{DateTime, Utc};
use log::{error, info};

use crate::ODM::store::{ManifestQuery, ManifestStore, StoreError};
use super::aggregator::aggregate_month;
use super::deriver::{derive, DerivationRules};
use super::error::ServiceError;
use super::models::*;

/// Derives and stores a new manifest
pub async fn create_manifest(
    store: &dyn ManifestStore,
    rules: &DerivationRules,
    input: &ManifestInput,
    now: DateTime<Utc>,
) -> Result<ManifestRecord, ServiceError> {
    let record = derive(input, now, rules)?;
    let created = logged(store.create(record).await, "create")?;

    info!("{}", format!("Manifest {:?} created for {}", created.id, created.creator));
    Ok(created)
}

///
/// Re-derives a manifest from a full submission
///
/// The record keeps its id and its original upload date; wall-clock times
/// are placed on the day it was uploaded.
///
pub async fn update_manifest(
    store: &dyn ManifestStore,
    rules: &DerivationRules,
    id: &str,
    input: &ManifestInput,
) -> Result<ManifestRecord, ServiceError> {
    let existing = logged(store.get(id).await, "update")?;

    let record = derive(input, existing.upload_date, rules)?;
    let updated = logged(store.update(id, record).await, "update")?;

    info!("{}", format!("Manifest {} updated", id));
    Ok(updated)
}

pub async fn get_manifest(store: &dyn ManifestStore, id: &str) -> Result<ManifestRecord, ServiceError> {
    Ok(logged(store.get(id).await, "get")?)
}

pub async fn delete_manifest(store: &dyn ManifestStore, id: &str) -> Result<(), ServiceError> {
    logged(store.delete(id).await, "delete")?;
    info!("{}", format!("Manifest {} deleted", id));
    Ok(())
}

/// Every manifest, newest first
pub async fn all_manifests(store: &dyn ManifestStore) -> Result<Vec<ManifestRecord>, ServiceError> {
    Ok(logged(store.list(&ManifestQuery::all()).await, "list")?)
}

/// The `limit` most recent manifests
pub async fn latest_manifests(store: &dyn ManifestStore, limit: i64) -> Result<Vec<ManifestRecord>, ServiceError> {
    Ok(logged(store.list(&ManifestQuery::latest(limit)).await, "latest")?)
}

pub async fn user_manifests(store: &dyn ManifestStore, user_id: &str) -> Result<Vec<ManifestRecord>, ServiceError> {
    Ok(logged(store.list(&ManifestQuery::all().created_by(user_id)).await, "list user")?)
}

pub async fn search_manifests(store: &dyn ManifestStore, text: &str) -> Result<Vec<ManifestRecord>, ServiceError> {
    Ok(logged(store.list(&ManifestQuery::all().matching(text)).await, "search")?)
}

///
/// Monthly totals of one user
///
/// # Arguments
///
/// * `store` - The manifest store
/// * `user_id` - The creator to report on
/// * `month` - The calendar month
///
pub async fn monthly_summary(
    store: &dyn ManifestStore,
    user_id: &str,
    month: CalendarMonth,
) -> Result<MonthlySummary, ServiceError> {
    let query = ManifestQuery::all().created_by(user_id).within(month);
    let records = logged(store.list(&query).await, "summary")?;

    Ok(aggregate_month(records, month))
}

/// Logs a store failure before passing it on untouched
fn logged<T>(result: Result<T, StoreError>, action: &str) -> Result<T, StoreError> {
    if let Err(value) = &result {
        match value {
            StoreError::Database(_) => error!("{}", format!("Database failed while running {}: {}", action, value)),
            _ => info!("{}", format!("Store refused {}: {}", action, value)),
        }
    }
    result
}

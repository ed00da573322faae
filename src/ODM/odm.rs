//!
//! Documentation of the odm module.
//! Used to connect to the manifest database.
//!

use super::*;
use models::*;
use odm_utils::*;
use store::*;
use memory::MemoryStore;
use config::config::{ConfyConfig, StorageBackend};
use manifest::models::ManifestRecord;
use std::time::Duration;

use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, FindOneAndReplaceOptions, ListDatabasesOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use log::{debug, error, info};

///
/// Open the store the configuration asks for
///
/// # Arguments
///
/// * `config` - A config object containing 'storage', 'database' and 'database_ip'
///
/// # Log
///
/// * `info` - "Database Connected!", indicating success
/// * `error` - "Could not connect to MongoDB {error}", indicating error
///
pub async fn init(config: &ConfyConfig) -> mongodb::error::Result<Box<dyn ManifestStore>> {
    match config.storage {
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StorageBackend::Mongodb => {
            let database = connect(config).await?;
            Ok(Box::new(MongoStore::new(database, &config.manifest_collection)))
        }
    }
}

/// basic connection, isn't available out of the "odm.rs" module
async fn connect(config: &ConfyConfig) -> mongodb::error::Result<Database> {

    let mut client_options = ClientOptions::parse(&config.database_ip).await?;
    client_options.connect_timeout = Some(Duration::from_secs(config.timeout));
    client_options.heartbeat_freq = Some(Duration::from_secs(config.timeout));
    client_options.server_selection_timeout = Some(Duration::from_secs(config.timeout));
    let client = Client::with_options(client_options)?;

    match client.list_database_names(Document::new(), ListDatabasesOptions::builder().build()).await {
        Ok(_) => {
            info!("Database Connected!");
        },
        Err(value) => {
            error!("{}", format!("Could not connect to MongoDB {}", value));
            return Err(value);
        },
    }

    Ok(client.database(&config.database[..]))
}

/// The manifests collection of a MongoDB database
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
    collection: String,
}

impl MongoStore {
    pub fn new(db: Database, collection: &str) -> MongoStore {
        MongoStore { db, collection: collection.to_string() }
    }

    fn manifests(&self) -> Collection<ManifestDocument> {
        self.db.collection::<ManifestDocument>(&self.collection)
    }
}

#[rocket::async_trait]
impl ManifestStore for MongoStore {
    /// Inserts a new manifest, the database assigns the id
    async fn create(&self, record: ManifestRecord) -> Result<ManifestRecord, StoreError> {
        let document = manifest_to_doc(&record, None);
        let insert_one_result = self.manifests().insert_one(document, None).await?;

        let mut created = record;
        created.id = insert_one_result.inserted_id.as_object_id().map(|id| id.to_hex());
        debug!("{}", format!("Inserted manifest {:?} for {}", created.id, created.creator));
        Ok(created)
    }

    ///
    /// List manifests
    ///
    /// # Arguments
    ///
    /// * `query` - Filters, order and limit; see `query_to_filter`
    ///
    /// # Output
    ///
    /// * Err(_) - indicates DB error
    /// * Ok(vec) - the matching manifests, possibly empty
    ///
    async fn list(&self, query: &ManifestQuery) -> Result<Vec<ManifestRecord>, StoreError> {
        let mut cursor = self
            .manifests()
            .find(query_to_filter(query), query_to_options(query))
            .await?;

        let mut manifests: Vec<ManifestRecord> = vec![];
        while let Some(result) = cursor.try_next().await? {
            manifests.push(doc_to_manifest(&result));
        }

        Ok(manifests)
    }

    async fn get(&self, id: &str) -> Result<ManifestRecord, StoreError> {
        let object_id = parse_id(id)?;

        match self.manifests().find_one(doc! {"_id": object_id }, None).await? {
            None => Err(StoreError::NotFound(id.to_string())),
            Some(document) => Ok(doc_to_manifest(&document)),
        }
    }

    /// Replaces the whole document, derived fields included
    async fn update(&self, id: &str, record: ManifestRecord) -> Result<ManifestRecord, StoreError> {
        let object_id = parse_id(id)?;
        let find_one_and_replace_options = FindOneAndReplaceOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let replaced = self
            .manifests()
            .find_one_and_replace(
                doc! {"_id": object_id },
                manifest_to_doc(&record, Some(object_id)),
                find_one_and_replace_options,
            )
            .await?;

        match replaced {
            None => Err(StoreError::NotFound(id.to_string())),
            Some(document) => Ok(doc_to_manifest(&document)),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let object_id = parse_id(id)?;

        let delete_result = self.manifests().delete_one(doc! {"_id": object_id }, None).await?;
        if delete_result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

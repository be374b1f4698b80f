//! MongoDB storage backend.
//!
//! Each package is a collection in the configured database; documents keep
//! the toggle id in `_id` so lookups by id use the default index.

use super::{DateFilter, StorageError, ToggleStore};
use crate::feature_toggle::FeatureToggle;
use async_trait::async_trait;
use bson::{doc, DateTime, Document};
use chrono::NaiveDateTime;
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

/// Stored shape of a toggle. Timestamps are BSON dates so range queries
/// compare chronologically.
#[derive(Debug, Serialize, Deserialize)]
struct ToggleDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    description: String,
    beginning_date: DateTime,
    expiration_date: DateTime,
    created_at: DateTime,
    updated_at: DateTime,
}

fn to_bson_date(value: NaiveDateTime) -> DateTime {
    DateTime::from_chrono(value.and_utc())
}

fn from_bson_date(value: DateTime) -> NaiveDateTime {
    value.to_chrono().naive_utc()
}

impl From<&FeatureToggle> for ToggleDocument {
    fn from(toggle: &FeatureToggle) -> Self {
        Self {
            id: toggle.id.clone(),
            name: toggle.name.clone(),
            description: toggle.description.clone(),
            beginning_date: to_bson_date(toggle.beginning_date),
            expiration_date: to_bson_date(toggle.expiration_date),
            created_at: to_bson_date(toggle.created_at),
            updated_at: to_bson_date(toggle.updated_at),
        }
    }
}

impl From<ToggleDocument> for FeatureToggle {
    fn from(document: ToggleDocument) -> Self {
        Self {
            id: document.id,
            name: document.name,
            description: document.description,
            beginning_date: from_bson_date(document.beginning_date),
            expiration_date: from_bson_date(document.expiration_date),
            created_at: from_bson_date(document.created_at),
            updated_at: from_bson_date(document.updated_at),
        }
    }
}

/// Query document selecting toggles that satisfy `filter`.
fn filter_document(filter: DateFilter) -> Document {
    match filter {
        DateFilter::ActiveAt(t) => doc! {
            "expiration_date": { "$gt": to_bson_date(t) },
            "beginning_date": { "$lt": to_bson_date(t) },
        },
        DateFilter::CoversDate(t) => doc! {
            "expiration_date": { "$gte": to_bson_date(t) },
            "beginning_date": { "$lte": to_bson_date(t) },
        },
    }
}

/// MongoDB storage backend.
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect with the Stable API v1 and ping the server before returning.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StorageError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        log::info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self::new(client.database(db_name)))
    }

    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self, package: &str) -> Collection<ToggleDocument> {
        self.database.collection(package)
    }

    async fn find_where(
        &self,
        package: &str,
        filter: Document,
    ) -> Result<Vec<FeatureToggle>, StorageError> {
        let documents: Vec<ToggleDocument> = self
            .collection(package)
            .find(filter)
            .await?
            .try_collect()
            .await?;
        Ok(documents.into_iter().map(FeatureToggle::from).collect())
    }
}

#[async_trait]
impl ToggleStore for MongoStore {
    async fn insert(&self, package: &str, toggle: &FeatureToggle) -> Result<(), StorageError> {
        log::debug!("MongoStore: insert {} into {}", toggle.id, package);
        self.collection(package)
            .insert_one(ToggleDocument::from(toggle))
            .await?;
        Ok(())
    }

    async fn find_all(&self, package: &str) -> Result<Vec<FeatureToggle>, StorageError> {
        self.find_where(package, doc! {}).await
    }

    async fn find_by_id(
        &self,
        package: &str,
        id: &str,
    ) -> Result<Option<FeatureToggle>, StorageError> {
        let document = self
            .collection(package)
            .find_one(doc! { "_id": id })
            .await?;
        Ok(document.map(FeatureToggle::from))
    }

    async fn find_matching(
        &self,
        package: &str,
        filter: DateFilter,
    ) -> Result<Vec<FeatureToggle>, StorageError> {
        self.find_where(package, filter_document(filter)).await
    }

    async fn replace(&self, package: &str, toggle: &FeatureToggle) -> Result<bool, StorageError> {
        let result = self
            .collection(package)
            .replace_one(doc! { "_id": toggle.id.as_str() }, ToggleDocument::from(toggle))
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_all(&self, package: &str) -> Result<u64, StorageError> {
        let result = self.collection(package).delete_many(doc! {}).await?;
        log::debug!(
            "MongoStore: removed {} toggles from {}",
            result.deleted_count,
            package
        );
        Ok(result.deleted_count)
    }

    async fn packages(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.database.list_collection_names().await?)
    }
}

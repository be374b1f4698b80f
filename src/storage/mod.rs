//! Storage backend abstraction for feature toggles.
//!
//! Toggles are grouped by package; every backend keeps one collection per
//! package name, created on first write. Supports multiple backends:
//! - `memory`: process-local maps, for tests and database-less runs
//! - `mongo`: MongoDB, one collection per package

pub mod memory;
pub mod mongo;

use crate::feature_toggle::FeatureToggle;
use async_trait::async_trait;
use chrono::NaiveDateTime;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Storage operation errors.
#[derive(Debug)]
pub enum StorageError {
    /// Driver or server failure
    Backend(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<mongodb::error::Error> for StorageError {
    fn from(e: mongodb::error::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// Date window a toggle must cover to be returned by [`ToggleStore::find_matching`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// `beginning_date < t < expiration_date`, both bounds exclusive.
    ActiveAt(NaiveDateTime),
    /// `beginning_date <= t <= expiration_date`, both bounds inclusive.
    CoversDate(NaiveDateTime),
}

impl DateFilter {
    pub fn matches(&self, toggle: &FeatureToggle) -> bool {
        match *self {
            DateFilter::ActiveAt(t) => toggle.expiration_date > t && toggle.beginning_date < t,
            DateFilter::CoversDate(t) => {
                toggle.expiration_date >= t && toggle.beginning_date <= t
            }
        }
    }
}

/// Trait for storage backends.
///
/// All operations are keyed by package name. A package that was never
/// written to behaves exactly like an empty one.
#[async_trait]
pub trait ToggleStore: Send + Sync {
    /// Store a new toggle in the package's collection.
    async fn insert(&self, package: &str, toggle: &FeatureToggle) -> Result<(), StorageError>;

    /// Every toggle of a package, in storage order.
    async fn find_all(&self, package: &str) -> Result<Vec<FeatureToggle>, StorageError>;

    /// Point lookup by id.
    async fn find_by_id(
        &self,
        package: &str,
        id: &str,
    ) -> Result<Option<FeatureToggle>, StorageError>;

    /// Toggles of a package whose dates satisfy `filter`.
    async fn find_matching(
        &self,
        package: &str,
        filter: DateFilter,
    ) -> Result<Vec<FeatureToggle>, StorageError>;

    /// Replace the stored document with the same id. Returns false if none existed.
    async fn replace(&self, package: &str, toggle: &FeatureToggle) -> Result<bool, StorageError>;

    /// Remove every toggle of a package, returning how many were removed.
    async fn delete_all(&self, package: &str) -> Result<u64, StorageError>;

    /// Names of every package known to the store.
    async fn packages(&self) -> Result<Vec<String>, StorageError>;
}

//! Persistence gateway.
//!
//! Hands out the shared [`ToggleStore`] to request handlers, connecting
//! lazily on first use. A failed connection attempt is logged and leaves the
//! gateway empty; the next request tries again.

use crate::storage::{MongoStore, StorageError, ToggleStore};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// Opens a connection to a storage backend.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ToggleStore>, StorageError>;
}

/// Connects to MongoDB using a full connection URI.
pub struct MongoConnector {
    uri: String,
    db_name: String,
}

impl MongoConnector {
    pub fn new(uri: String, db_name: String) -> Self {
        Self { uri, db_name }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(&self) -> Result<Arc<dyn ToggleStore>, StorageError> {
        let store = MongoStore::connect(&self.uri, &self.db_name).await?;
        Ok(Arc::new(store))
    }
}

/// Hands back an existing store; used for pre-initialised gateways.
struct ReadyConnector(Arc<dyn ToggleStore>);

#[async_trait]
impl Connector for ReadyConnector {
    async fn connect(&self) -> Result<Arc<dyn ToggleStore>, StorageError> {
        Ok(self.0.clone())
    }
}

pub struct Gateway {
    connector: Box<dyn Connector>,
    handle: RwLock<Option<Arc<dyn ToggleStore>>>,
}

impl Gateway {
    /// Create a gateway that connects on first use.
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            handle: RwLock::new(None),
        }
    }

    /// Create a gateway that already holds a store.
    pub fn ready(store: Arc<dyn ToggleStore>) -> Self {
        Self {
            connector: Box::new(ReadyConnector(store.clone())),
            handle: RwLock::new(Some(store)),
        }
    }

    /// Returns the store, connecting first if no connection is held.
    ///
    /// `None` means the connection attempt failed; the cause has been logged.
    pub async fn get_handle(&self) -> Option<Arc<dyn ToggleStore>> {
        if let Some(store) = self.current() {
            return Some(store);
        }

        match self.connector.connect().await {
            Ok(store) => {
                let mut handle = self.handle.write().unwrap_or_else(|poisoned| {
                    log::warn!("Gateway handle lock was poisoned; recovering");
                    PoisonError::into_inner(poisoned)
                });
                // Another request may have connected while we were waiting.
                Some(handle.get_or_insert(store).clone())
            }
            Err(e) => {
                log::error!("Database connection failed: {}", e);
                None
            }
        }
    }

    /// Whether a connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<Arc<dyn ToggleStore>> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

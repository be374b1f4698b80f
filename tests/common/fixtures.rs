//! Test fixtures for building gateways and toggle payloads
#![allow(dead_code)]

use actix_web::web::Data;
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use fitcheck::app_config::AppConfig;
use fitcheck::dates::format_date_time;
use fitcheck::db::{Connector, Gateway};
use fitcheck::storage::{MemoryStore, StorageError, ToggleStore};
use serde_json::{json, Value};
use std::sync::Arc;

/// Connector standing in for an unreachable database
pub struct UnreachableConnector;

#[async_trait]
impl Connector for UnreachableConnector {
    async fn connect(&self) -> Result<Arc<dyn ToggleStore>, StorageError> {
        Err(StorageError::Backend("connection refused".to_string()))
    }
}

/// Gateway over a fresh in-memory store, plus the store for direct inspection
pub fn memory_gateway() -> (Arc<MemoryStore>, Data<Gateway>) {
    let store = Arc::new(MemoryStore::new());
    let gateway = Data::new(Gateway::ready(store.clone()));
    (store, gateway)
}

/// Gateway whose every connection attempt fails
pub fn unreachable_gateway() -> Data<Gateway> {
    Data::new(Gateway::new(UnreachableConnector))
}

pub fn app_config() -> Data<AppConfig> {
    Data::new(AppConfig::default())
}

/// Body for `POST /feature-toggle`
pub fn toggle_body(package: &str, name: &str, beginning: &str, expiration: &str) -> Value {
    json!({
        "package_name": package,
        "name": name,
        "description": format!("{} toggle", name),
        "beginning_date": beginning,
        "expiration_date": expiration,
    })
}

/// Current time shifted by `hours`, in request format
pub fn hours_from_now(hours: i64) -> String {
    let at: NaiveDateTime = Utc::now().naive_utc() + Duration::hours(hours);
    format_date_time(&at)
}

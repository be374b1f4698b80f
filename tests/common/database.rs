//! Live MongoDB setup for storage tests
#![allow(dead_code)]

use fitcheck::storage::{MongoStore, ToggleStore};
use std::env;

/// Connect to the database named by TEST_MONGODB_URI.
///
/// Returns `None` when the variable is unset so the suite can run without a
/// database server.
pub async fn setup_test_store() -> Option<MongoStore> {
    let uri = env::var("TEST_MONGODB_URI").ok()?;
    let db_name =
        env::var("TEST_MONGODB_DATABASE").unwrap_or_else(|_| "fitcheck_test".to_string());

    Some(
        MongoStore::connect(&uri, &db_name)
            .await
            .expect("Failed to connect to test database"),
    )
}

/// Empty every package collection in the test database.
pub async fn cleanup_test_data(store: &MongoStore) {
    for package in store.packages().await.expect("Failed to list packages") {
        store
            .delete_all(&package)
            .await
            .expect("Failed to clean package");
    }
}

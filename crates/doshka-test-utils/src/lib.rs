// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters and fixtures for Doshka tests.

pub mod mock_gateway;

pub use mock_gateway::MockGateway;

use std::sync::Arc;

use doshka_config::model::StorageConfig;
use doshka_core::DoshkaError;
use doshka_storage::SqliteListingStore;

/// Opens a listing store on a fresh temp-directory database.
///
/// The returned `TempDir` must be kept alive for the store's lifetime.
pub async fn temp_store() -> Result<(Arc<SqliteListingStore>, tempfile::TempDir), DoshkaError> {
    let dir = tempfile::TempDir::new().map_err(|e| DoshkaError::Store {
        source: Box::new(e),
    })?;
    let db_path = dir.path().join("test.db");
    let config = StorageConfig {
        database_path: db_path.to_string_lossy().to_string(),
        wal_mode: true,
    };
    let store = SqliteListingStore::open(&config).await?;
    Ok((Arc::new(store), dir))
}

// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`ListingStore`] trait.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use doshka_config::model::StorageConfig;
use doshka_core::types::{Listing, ListingFilter, UserId};
use doshka_core::{DoshkaError, ListingStore};
use tracing::debug;

use crate::database::Database;
use crate::queries;

/// SQLite-backed listing store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules.
pub struct SqliteListingStore {
    db: Database,
}

impl SqliteListingStore {
    /// Opens the database at the configured path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, DoshkaError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "listing store initialized");
        Ok(Self { db })
    }

    /// Checkpoints and flushes before shutdown.
    pub async fn close(&self) -> Result<(), DoshkaError> {
        self.db.close().await
    }
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn next_id(&self, sequence: &str) -> Result<i64, DoshkaError> {
        queries::counters::next_value(&self.db, sequence).await
    }

    async fn insert(&self, listing: &Listing) -> Result<(), DoshkaError> {
        queries::listings::insert(&self.db, listing).await
    }

    async fn find_page(
        &self,
        filter: &ListingFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Listing>, u64), DoshkaError> {
        queries::listings::find_page(&self.db, filter, offset, limit).await
    }

    async fn find_one(&self, id: i64, owner: UserId) -> Result<Option<Listing>, DoshkaError> {
        queries::listings::find_one(&self.db, id, owner).await
    }

    async fn update_description(
        &self,
        id: i64,
        owner: UserId,
        description: &str,
    ) -> Result<bool, DoshkaError> {
        queries::listings::update_description(&self.db, id, owner, description).await
    }

    async fn delete(&self, id: i64, owner: UserId) -> Result<bool, DoshkaError> {
        queries::listings::delete(&self.db, id, owner).await
    }

    async fn purge_expired(&self, retention: Duration) -> Result<u64, DoshkaError> {
        queries::listings::purge_created_before(&self.db, Utc::now() - retention).await
    }
}

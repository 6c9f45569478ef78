// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing store trait for the persistence backend.

use async_trait::async_trait;
use chrono::Duration;

use crate::error::DoshkaError;
use crate::types::{Listing, ListingFilter, UserId};

/// Persistence and querying of listings and monotonic id sequences.
///
/// All mutations are scoped by `(id, owner)` so cross-user interference is
/// structurally impossible. Scoped operations report whether a row matched
/// rather than failing, because a listing may vanish (expiry, concurrent
/// delete) between being listed and being acted on.
#[async_trait]
pub trait ListingStore {
    /// Atomically increments and returns the named counter's new value,
    /// creating the counter at 1 when absent.
    async fn next_id(&self, sequence: &str) -> Result<i64, DoshkaError>;

    /// Persists a new listing.
    async fn insert(&self, listing: &Listing) -> Result<(), DoshkaError>;

    /// Returns up to `limit` listings matching `filter`, newest first,
    /// starting at `offset`, plus the total count of matches.
    ///
    /// The count and the page are not a snapshot; callers must tolerate
    /// slight disagreement between the two.
    async fn find_page(
        &self,
        filter: &ListingFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Listing>, u64), DoshkaError>;

    /// Owner-scoped point lookup, used for edit/delete authorization.
    async fn find_one(&self, id: i64, owner: UserId) -> Result<Option<Listing>, DoshkaError>;

    /// Owner-scoped description update; returns whether a row matched.
    async fn update_description(
        &self,
        id: i64,
        owner: UserId,
        description: &str,
    ) -> Result<bool, DoshkaError>;

    /// Owner-scoped delete; returns whether a row was removed.
    async fn delete(&self, id: i64, owner: UserId) -> Result<bool, DoshkaError>;

    /// Removes listings older than `retention`; returns how many.
    ///
    /// Run periodically by the host process; queries do not filter by age,
    /// so consumers must re-verify existence before acting on a listing.
    async fn purge_expired(&self, retention: Duration) -> Result<u64, DoshkaError>;
}

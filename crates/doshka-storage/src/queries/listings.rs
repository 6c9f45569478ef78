// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing CRUD and page queries.
//!
//! Timestamps are stored as RFC 3339 text produced by `DateTime::to_rfc3339`,
//! so lexicographic comparison equals chronological comparison.

use chrono::{DateTime, Utc};
use doshka_core::types::{Listing, ListingFilter, UserId};
use doshka_core::DoshkaError;
use rusqlite::types::ToSql;
use rusqlite::params;

use crate::database::Database;

const LISTING_COLUMNS: &str =
    "id, owner_id, owner_display, kind, category, description, contact, created_at";

fn row_to_listing(row: &rusqlite::Row<'_>) -> rusqlite::Result<Listing> {
    let kind_text: String = row.get(3)?;
    let kind = kind_text.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_text: String = row.get(7)?;
    let created_at = DateTime::parse_from_rfc3339(&created_text)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);
    Ok(Listing {
        id: row.get(0)?,
        owner_id: UserId(row.get(1)?),
        owner_display: row.get(2)?,
        kind,
        category: row.get(4)?,
        description: row.get(5)?,
        contact: row.get(6)?,
        created_at,
    })
}

/// Persists a new listing. An id collision is a store error, never silent.
pub async fn insert(db: &Database, listing: &Listing) -> Result<(), DoshkaError> {
    let listing = listing.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO listings
                     (id, owner_id, owner_display, kind, category, description, contact, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    listing.id,
                    listing.owner_id.0,
                    listing.owner_display,
                    listing.kind.to_string(),
                    listing.category,
                    listing.description,
                    listing.contact,
                    listing.created_at.to_rfc3339(),
                ],
            )?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Returns one page of matches, newest first, plus the total match count.
///
/// Count and page run in the same connection call; they are still two
/// reads and callers must tolerate slight disagreement under concurrency.
pub async fn find_page(
    db: &Database,
    filter: &ListingFilter,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Listing>, u64), DoshkaError> {
    let filter = filter.clone();
    db.connection()
        .call(move |conn| {
            let kind_text = filter.kind.map(|k| k.to_string());
            let owner_id = filter.owner.map(|o| o.0);

            let mut clauses: Vec<&str> = Vec::new();
            let mut args: Vec<&dyn ToSql> = Vec::new();
            if let Some(ref category) = filter.category {
                clauses.push("category = ?");
                args.push(category);
            }
            if let Some(ref kind) = kind_text {
                clauses.push("kind = ?");
                args.push(kind);
            }
            if let Some(ref owner) = owner_id {
                clauses.push("owner_id = ?");
                args.push(owner);
            }
            let where_sql = if clauses.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", clauses.join(" AND "))
            };

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM listings{where_sql}"),
                &args[..],
                |row| row.get(0),
            )?;

            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let mut page_args = args;
            page_args.push(&limit);
            page_args.push(&offset);

            let mut stmt = conn.prepare(&format!(
                "SELECT {LISTING_COLUMNS} FROM listings{where_sql}
                 ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
            ))?;
            let rows = stmt.query_map(&page_args[..], row_to_listing)?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }

            Ok::<_, rusqlite::Error>((items, total.max(0) as u64))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Owner-scoped point lookup.
pub async fn find_one(
    db: &Database,
    id: i64,
    owner: UserId,
) -> Result<Option<Listing>, DoshkaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1 AND owner_id = ?2"
            ))?;
            let result = stmt.query_row(params![id, owner.0], row_to_listing);
            match result {
                Ok(listing) => Ok(Some(listing)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Owner-scoped conditional description update.
pub async fn update_description(
    db: &Database,
    id: i64,
    owner: UserId,
    description: &str,
) -> Result<bool, DoshkaError> {
    let description = description.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE listings SET description = ?1 WHERE id = ?2 AND owner_id = ?3",
                params![description, id, owner.0],
            )?;
            Ok::<_, rusqlite::Error>(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Owner-scoped delete.
pub async fn delete(db: &Database, id: i64, owner: UserId) -> Result<bool, DoshkaError> {
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM listings WHERE id = ?1 AND owner_id = ?2",
                params![id, owner.0],
            )?;
            Ok::<_, rusqlite::Error>(removed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Removes every listing created at or before `cutoff`; returns how many.
pub async fn purge_created_before(
    db: &Database,
    cutoff: DateTime<Utc>,
) -> Result<u64, DoshkaError> {
    let cutoff = cutoff.to_rfc3339();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM listings WHERE created_at <= ?1",
                params![cutoff],
            )?;
            Ok::<_, rusqlite::Error>(removed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use doshka_core::types::ListingKind;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("listings.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_listing(id: i64, owner: i64, category: &str, age_minutes: i64) -> Listing {
        Listing {
            id,
            owner_id: UserId(owner),
            owner_display: Some(format!("user{owner}")),
            kind: if id % 2 == 0 {
                ListingKind::Service
            } else {
                ListingKind::Job
            },
            category: category.to_string(),
            description: format!("listing {id}"),
            contact: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn insert_and_find_one_round_trips() {
        let (db, _dir) = setup_db().await;
        let listing = make_listing(1, 10, "Other", 0);
        insert(&db, &listing).await.unwrap();

        let found = find_one(&db, 1, UserId(10)).await.unwrap().unwrap();
        assert_eq!(found.description, "listing 1");
        assert_eq!(found.kind, ListingKind::Job);
        assert_eq!(found.owner_display.as_deref(), Some("user10"));
        // Timestamps survive the text round trip to the second.
        assert_eq!(
            found.created_at.timestamp_millis(),
            listing.created_at.timestamp_millis()
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_id_is_a_store_error() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_listing(1, 10, "Other", 0)).await.unwrap();
        let result = insert(&db, &make_listing(1, 11, "Other", 0)).await;
        assert!(matches!(result, Err(DoshkaError::Store { .. })));
    }

    #[tokio::test]
    async fn find_one_is_owner_scoped() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_listing(1, 10, "Other", 0)).await.unwrap();
        assert!(find_one(&db, 1, UserId(99)).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_page_orders_newest_first_with_total() {
        let (db, _dir) = setup_db().await;
        for i in 1..=7 {
            // Older listings get higher ages.
            insert(&db, &make_listing(i, 10, "Other", 100 - i)).await.unwrap();
        }

        let (page, total) = find_page(&db, &ListingFilter::default(), 0, 3).await.unwrap();
        assert_eq!(total, 7);
        assert_eq!(page.len(), 3);
        // Listing 7 is the newest (smallest age).
        assert_eq!(page[0].id, 7);
        assert_eq!(page[1].id, 6);

        let (page2, _) = find_page(&db, &ListingFilter::default(), 6, 3).await.unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].id, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_page_applies_conjunctive_filter() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_listing(1, 10, "Transport", 3)).await.unwrap(); // job
        insert(&db, &make_listing(2, 10, "Transport", 2)).await.unwrap(); // service
        insert(&db, &make_listing(3, 11, "Transport", 1)).await.unwrap(); // job
        insert(&db, &make_listing(4, 11, "Other", 0)).await.unwrap(); // service

        let filter = ListingFilter::browse("Transport", Some(ListingKind::Job));
        let (page, total) = find_page(&db, &filter, 0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.iter().map(|l| l.id).collect::<Vec<_>>(), vec![3, 1]);

        let mine = ListingFilter::owned_by(UserId(11));
        let (page, total) = find_page(&db, &mine, 0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.iter().map(|l| l.id).collect::<Vec<_>>(), vec![4, 3]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_page_past_the_end_is_empty_not_an_error() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_listing(1, 10, "Other", 0)).await.unwrap();
        let (page, total) = find_page(&db, &ListingFilter::default(), 50, 5).await.unwrap();
        assert_eq!(total, 1);
        assert!(page.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_description_is_owner_scoped() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_listing(1, 10, "Other", 0)).await.unwrap();

        assert!(!update_description(&db, 1, UserId(99), "hijack").await.unwrap());
        assert!(update_description(&db, 1, UserId(10), "updated").await.unwrap());

        let found = find_one(&db, 1, UserId(10)).await.unwrap().unwrap();
        assert_eq!(found.description, "updated");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_is_owner_scoped() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_listing(1, 10, "Other", 0)).await.unwrap();

        assert!(!delete(&db, 1, UserId(99)).await.unwrap());
        assert!(find_one(&db, 1, UserId(10)).await.unwrap().is_some());

        assert!(delete(&db, 1, UserId(10)).await.unwrap());
        assert!(find_one(&db, 1, UserId(10)).await.unwrap().is_none());
        assert!(!delete(&db, 1, UserId(10)).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn purge_removes_only_old_listings() {
        let (db, _dir) = setup_db().await;
        insert(&db, &make_listing(1, 10, "Other", 60 * 24 * 31)).await.unwrap();
        insert(&db, &make_listing(2, 10, "Other", 60 * 24 * 29)).await.unwrap();
        insert(&db, &make_listing(3, 10, "Other", 0)).await.unwrap();

        let cutoff = Utc::now() - Duration::days(30);
        let removed = purge_created_before(&db, cutoff).await.unwrap();
        assert_eq!(removed, 1);

        let (_, total) = find_page(&db, &ListingFilter::default(), 0, 10).await.unwrap();
        assert_eq!(total, 2);
        db.close().await.unwrap();
    }
}

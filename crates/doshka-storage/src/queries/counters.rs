// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monotonic id sequence allocation.

use doshka_core::DoshkaError;
use rusqlite::params;

use crate::database::Database;

/// Atomically increments and returns the named counter's new value.
///
/// The upsert-with-RETURNING form is a single statement on the single
/// writer thread, so two concurrent callers can never observe the same
/// value. A missing counter starts at 1.
pub async fn next_value(db: &Database, sequence: &str) -> Result<i64, DoshkaError> {
    let sequence = sequence.to_string();
    db.connection()
        .call(move |conn| {
            let value = conn.query_row(
                "INSERT INTO counters (name, value) VALUES (?1, 1)
                 ON CONFLICT(name) DO UPDATE SET value = value + 1
                 RETURNING value",
                params![sequence],
                |row| row.get(0),
            )?;
            Ok::<_, rusqlite::Error>(value)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

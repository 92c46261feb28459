//! Transaction and statement helpers shared by repositories.
//!
//! # Responsibility
//! - Draw one transaction boundary around a logical repository operation.
//! - Bind fixed-point values and read back mapped rows and generated ids.
//!
//! # Invariants
//! - Work that returns `Err` is rolled back before the error is returned.
//! - A failed commit is rolled back by `Transaction`'s drop.

use crate::repo::extract::extract;
use crate::repo::project_repo::RepoResult;
use log::{debug, warn};
use rusqlite::{Connection, Params, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::time::Instant;

/// Runs `work` inside one transaction and commits it on success.
///
/// Use `TransactionBehavior::Immediate` for writes so the write lock is taken
/// up front, `Deferred` for reads.
pub(crate) fn in_transaction<T>(
    conn: &mut Connection,
    operation: &'static str,
    behavior: TransactionBehavior,
    work: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let started_at = Instant::now();
    let tx = conn.transaction_with_behavior(behavior)?;

    match work(&tx) {
        Ok(value) => {
            tx.commit()?;
            debug!(
                "event=tx module=repo status=ok operation={operation} outcome=commit duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=tx module=repo status=error operation={operation} outcome=rollback_failed error={rollback_err}"
                );
            }
            warn!(
                "event=tx module=repo status=error operation={operation} outcome=rollback duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

/// Runs a parameterized query and maps every row into `T`.
pub(crate) fn query_all<T: DeserializeOwned>(
    tx: &Transaction<'_>,
    sql: &str,
    params: impl Params,
) -> RepoResult<Vec<T>> {
    let mut stmt = tx.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(extract(row)?);
    }
    Ok(items)
}

/// Runs a parameterized query and maps the first row, if any, into `T`.
pub(crate) fn query_optional<T: DeserializeOwned>(
    tx: &Transaction<'_>,
    sql: &str,
    params: impl Params,
) -> RepoResult<Option<T>> {
    let mut stmt = tx.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(extract(row)?)),
        None => Ok(None),
    }
}

/// Identity generated by the last successful insert on this transaction.
pub(crate) fn last_insert_id(tx: &Transaction<'_>) -> i64 {
    tx.last_insert_rowid()
}

/// Decimals are bound as text so SQLite never rounds them through REAL.
pub(crate) fn decimal_param(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn exists(tx: &Transaction<'_>, sql: &str, params: impl Params) -> RepoResult<bool> {
    let found: i64 = tx.query_row(sql, params, |row| row.get(0))?;
    Ok(found == 1)
}

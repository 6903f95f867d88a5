//! Versioned schema scripts for the item store.
//!
//! # Invariants
//! - Script versions start at 1 and increase by one.
//! - `PRAGMA user_version` equals the last script applied.
//! - Pending scripts run in one transaction; a failing script applies none.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaScript {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_SCRIPTS: &[SchemaScript] = &[SchemaScript {
    version: 1,
    name: "0001_item",
    sql: include_str!("0001_item.sql"),
}];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_SCRIPTS.last().map_or(0, |script| script.version)
}

/// Brings the item schema up to `latest_version` and returns how many
/// scripts ran. Zero means the schema was already current.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaScript> = SCHEMA_SCRIPTS
        .iter()
        .filter(|script| script.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for script in &pending {
        tx.execute_batch(script.sql)?;
        tx.pragma_update(None, "user_version", script.version)?;
        info!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            script.version, script.name
        );
    }
    tx.commit()?;

    let applied = pending.len() as u32;
    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={latest} applied={applied}"
    );
    Ok(applied)
}

/// Schema version recorded in the database file.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

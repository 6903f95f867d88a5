//! Item repository contract and error model.
//!
//! # Invariants
//! - `save` always assigns a fresh id; any id already on the input is ignored.
//! - `find_by_id` reports a missing row as `Ok(None)`, never as an error.

use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateDto};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage transport or engine failure.
    Db(DbError),
    /// No row exists for the requested id.
    NotFound(ItemId),
    /// Value rejected by the storage schema (length, NOT NULL, ...).
    ConstraintViolation(String),
    /// Persisted row cannot be mapped to an `Item`.
    InvalidData(String),
    /// In-process store lock was poisoned by a panicking writer.
    LockPoisoned,
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::LockPoisoned => write!(f, "item store lock poisoned"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
            return Self::ConstraintViolation(value.to_string());
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    /// Persists `item` under a newly generated id and returns it with the id set.
    fn save(&self, item: Item) -> RepoResult<Item>;
    /// Overwrites name/price/quantity of the row identified by `id`.
    fn update(&self, id: ItemId, update: &ItemUpdateDto) -> RepoResult<()>;
    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Returns matching items in storage (ascending id) order.
    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>>;
}

impl<R: ItemRepository + ?Sized> ItemRepository for Box<R> {
    fn save(&self, item: Item) -> RepoResult<Item> {
        (**self).save(item)
    }

    fn update(&self, id: ItemId, update: &ItemUpdateDto) -> RepoResult<()> {
        (**self).update(id, update)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        (**self).find_all(cond)
    }
}

impl<R: ItemRepository + ?Sized> ItemRepository for &R {
    fn save(&self, item: Item) -> RepoResult<Item> {
        (**self).save(item)
    }

    fn update(&self, id: ItemId, update: &ItemUpdateDto) -> RepoResult<()> {
        (**self).update(id, update)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        (**self).find_all(cond)
    }
}

//! SQLite item repository using positional binds and direct statements.
//!
//! # Responsibility
//! - Provide the item contract over the `item` table with one statement per
//!   operation.
//! - Own the row mapping and connection checks shared by SQLite backends.
//!
//! # Invariants
//! - Rows are mapped field by field; column names are never inferred.
//! - `update` reports zero changed rows as `NotFound`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateDto};
use crate::repo::filter::{BindStyle, ItemFilter};
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, params_from_iter, Connection, Row};

pub(crate) const ITEM_SELECT_SQL: &str = "SELECT
    id,
    item_name,
    price,
    quantity
FROM item";

const ITEM_COLUMNS: [&str; 4] = ["id", "item_name", "price", "quantity"];

/// SQLite-backed item repository with positional placeholders.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn save(&self, mut item: Item) -> RepoResult<Item> {
        self.conn.execute(
            "INSERT INTO item (item_name, price, quantity) VALUES (?1, ?2, ?3);",
            params![item.item_name.as_str(), item.price, item.quantity],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=item_save module=repo backend=sqlite status=ok id={id}");
        item.id = Some(id);
        Ok(item)
    }

    fn update(&self, id: ItemId, update: &ItemUpdateDto) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE item
             SET
                item_name = ?1,
                price = ?2,
                quantity = ?3
             WHERE id = ?4;",
            params![update.item_name.as_str(), update.price, update.quantity, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=item_update module=repo backend=sqlite status=ok id={id}");
        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        find_item(self.conn, id)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let filter = ItemFilter::from_cond(cond);
        let filter_sql = filter.to_sql(BindStyle::Positional);
        let sql = format!("{ITEM_SELECT_SQL}{} ORDER BY id ASC;", filter_sql.clause);
        debug!(
            "event=item_find_all module=repo backend=sqlite unfiltered={} sql={sql:?}",
            filter.is_unfiltered()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(filter_sql.values()))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }
}

/// Point lookup shared by SQLite backends; `conn` may be a transaction.
pub(crate) fn find_item(conn: &Connection, id: ItemId) -> RepoResult<Option<Item>> {
    let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_item_row(row)?));
    }

    Ok(None)
}

pub(crate) fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;
    let item_name: String = row.get("item_name")?;

    let price = row.get::<_, i64>("price")?;
    let price = i32::try_from(price).map_err(|_| {
        RepoError::InvalidData(format!("price `{price}` out of range in item.price (id={id})"))
    })?;

    let quantity = row.get::<_, i64>("quantity")?;
    let quantity = i32::try_from(quantity).map_err(|_| {
        RepoError::InvalidData(format!(
            "quantity `{quantity}` out of range in item.quantity (id={id})"
        ))
    })?;

    Ok(Item {
        id: Some(id),
        item_name,
        price,
        quantity,
    })
}

/// Rejects connections that were not opened through `db::open_db*`.
pub(crate) fn ensure_item_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "item")? {
        return Err(RepoError::MissingRequiredTable("item"));
    }

    for column in ITEM_COLUMNS {
        if !table_has_column(conn, "item", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "item",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

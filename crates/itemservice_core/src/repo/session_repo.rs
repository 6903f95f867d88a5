//! SQLite item repository with entity-session write semantics.
//!
//! # Responsibility
//! - Run every write inside an explicit scoped transaction.
//! - Implement `update` as load, mutate in memory, flush.
//!
//! # Invariants
//! - A transaction that is not committed rolls back when dropped, so every
//!   `?` exit path leaves the table unchanged.
//! - Statements use named binds only.
//! - No version column is checked: concurrent logical updates to one id are
//!   last-write-wins.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateDto};
use crate::repo::filter::{BindStyle, ItemFilter};
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult};
use crate::repo::sqlite_repo::{
    ensure_item_connection_ready, find_item, parse_item_row, ITEM_SELECT_SQL,
};
use log::debug;
use rusqlite::{named_params, Connection, Transaction, TransactionBehavior};

/// SQLite-backed item repository with transactional read-modify-write updates.
pub struct SqliteSessionItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl ItemRepository for SqliteSessionItemRepository<'_> {
    fn save(&self, mut item: Item) -> RepoResult<Item> {
        let tx = self.begin()?;
        tx.execute(
            "INSERT INTO item (item_name, price, quantity)
             VALUES (:item_name, :price, :quantity);",
            named_params! {
                ":item_name": item.item_name.as_str(),
                ":price": item.price,
                ":quantity": item.quantity,
            },
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!("event=item_save module=repo backend=sqlite_session status=ok id={id}");
        item.id = Some(id);
        Ok(item)
    }

    fn update(&self, id: ItemId, update: &ItemUpdateDto) -> RepoResult<()> {
        let tx = self.begin()?;
        let mut item = find_item(&tx, id)?.ok_or(RepoError::NotFound(id))?;

        item.apply_update(update);
        flush(&tx, id, &item)?;
        tx.commit()?;

        debug!("event=item_update module=repo backend=sqlite_session status=ok id={id}");
        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        find_item(self.conn, id)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let filter = ItemFilter::from_cond(cond);
        let filter_sql = filter.to_sql(BindStyle::Named);
        let sql = format!("{ITEM_SELECT_SQL}{} ORDER BY id ASC;", filter_sql.clause);
        debug!(
            "event=item_find_all module=repo backend=sqlite_session unfiltered={} sql={sql:?}",
            filter.is_unfiltered()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(filter_sql.named_params().as_slice())?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }
}

fn flush(tx: &Transaction<'_>, id: ItemId, item: &Item) -> RepoResult<()> {
    let changed = tx.execute(
        "UPDATE item
         SET
            item_name = :item_name,
            price = :price,
            quantity = :quantity
         WHERE id = :id;",
        named_params! {
            ":item_name": item.item_name.as_str(),
            ":price": item.price,
            ":quantity": item.quantity,
            ":id": id,
        },
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }

    Ok(())
}

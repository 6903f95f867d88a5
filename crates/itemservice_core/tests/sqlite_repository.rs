use itemservice_core::db::migrations::latest_version;
use itemservice_core::db::{open_db, open_db_in_memory};
use itemservice_core::{
    Item, ItemRepository, ItemSearchCond, ItemUpdateDto, RepoError, SqliteItemRepository,
    SqliteSessionItemRepository,
};
use rusqlite::Connection;

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteItemRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }

    assert!(matches!(
        SqliteSessionItemRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
}

#[test]
fn repository_rejects_connection_without_item_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("item"))));
}

#[test]
fn repository_rejects_connection_missing_item_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_name TEXT NOT NULL,
            price INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteSessionItemRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "item",
            column: "quantity"
        })
    ));
}

#[test]
fn both_sqlite_backends_share_one_id_sequence() {
    let conn = open_db_in_memory().unwrap();
    let direct = SqliteItemRepository::try_new(&conn).unwrap();
    let session = SqliteSessionItemRepository::try_new(&conn).unwrap();

    let first = direct.save(Item::new("first", 1, 1)).unwrap();
    let second = session.save(Item::new("second", 2, 2)).unwrap();

    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));
    assert_eq!(session.find_by_id(1).unwrap(), Some(first));
    assert_eq!(direct.find_by_id(2).unwrap(), Some(second));
}

#[test]
fn session_update_failure_rolls_back_and_releases_the_transaction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSessionItemRepository::try_new(&conn).unwrap();
    let saved = repo.save(Item::new("apple", 50, 3)).unwrap();
    let id = saved.id.unwrap();

    let err = repo
        .update(id, &ItemUpdateDto::new("much-too-long", 60, 4))
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert!(conn.is_autocommit());
    assert_eq!(repo.find_by_id(id).unwrap(), Some(saved));

    repo.update(id, &ItemUpdateDto::new("pear", 60, 4)).unwrap();
    let updated = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(updated.item_name, "pear");
}

#[test]
fn session_update_of_missing_id_leaves_no_open_transaction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSessionItemRepository::try_new(&conn).unwrap();

    let err = repo.update(7, &ItemUpdateDto::new("x", 1, 1)).unwrap_err();

    assert!(matches!(err, RepoError::NotFound(7)));
    assert!(conn.is_autocommit());
}

#[test]
fn items_persist_across_reopen_of_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.db");

    let conn = open_db(&path).unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let saved = repo.save(Item::new("apple", 50, 3)).unwrap();
    drop(repo);
    drop(conn);

    let conn = open_db(&path).unwrap();
    let repo = SqliteSessionItemRepository::try_new(&conn).unwrap();
    assert_eq!(repo.find_by_id(saved.id.unwrap()).unwrap(), Some(saved));

    let next = repo.save(Item::new("banana", 150, 1)).unwrap();
    assert_eq!(next.id, Some(2));
}

#[test]
fn out_of_range_price_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO item (item_name, price, quantity) VALUES ('huge', ?1, 1);",
        [i64::from(i32::MAX) + 1],
    )
    .unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let err = repo.find_all(&ItemSearchCond::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

use itemservice_core::db::open_db_in_memory;
use itemservice_core::{
    Item, ItemRepository, ItemSearchCond, ItemUpdateDto, MemoryItemRepository, RepoError,
    SqliteItemRepository, SqliteSessionItemRepository,
};
use std::collections::HashSet;

const CATALOGUE: &[(&str, i32, i32)] = &[
    ("itemA-1", 10_000, 10),
    ("itemA-2", 20_000, 20),
    ("itemB-1", 30_000, 30),
];

fn with_each_backend(check: impl Fn(&str, &dyn ItemRepository)) {
    check("memory", &MemoryItemRepository::new());

    let conn = open_db_in_memory().unwrap();
    check("sqlite", &SqliteItemRepository::try_new(&conn).unwrap());

    let conn = open_db_in_memory().unwrap();
    check(
        "sqlite_session",
        &SqliteSessionItemRepository::try_new(&conn).unwrap(),
    );
}

fn seed(repo: &dyn ItemRepository, items: &[(&str, i32, i32)]) -> Vec<Item> {
    items
        .iter()
        .map(|&(name, price, quantity)| repo.save(Item::new(name, price, quantity)).unwrap())
        .collect()
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.item_name.as_str()).collect()
}

#[test]
fn save_assigns_unique_ids_and_find_by_id_returns_equal_item() {
    with_each_backend(|backend, repo| {
        let saved = seed(
            repo,
            &[("itemA", 10_000, 10), ("itemB", 20_000, 20), ("itemA", 1, 1)],
        );

        let ids: HashSet<_> = saved.iter().map(|item| item.id.unwrap()).collect();
        assert_eq!(ids.len(), 3, "{backend}: ids must be unique");

        for item in &saved {
            let found = repo.find_by_id(item.id.unwrap()).unwrap();
            assert_eq!(found.as_ref(), Some(item), "{backend}");
        }
    });
}

#[test]
fn ids_increase_monotonically() {
    with_each_backend(|backend, repo| {
        let saved = seed(repo, &[("a", 1, 1), ("b", 1, 1), ("c", 1, 1)]);
        let ids: Vec<_> = saved.iter().map(|item| item.id.unwrap()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "{backend}: {ids:?}");
    });
}

#[test]
fn find_by_id_on_unknown_id_returns_none() {
    with_each_backend(|backend, repo| {
        seed(repo, &[("apple", 50, 3)]);
        assert!(repo.find_by_id(999).unwrap().is_none(), "{backend}");
    });
}

#[test]
fn update_then_find_reflects_new_fields_and_keeps_id() {
    with_each_backend(|backend, repo| {
        let saved = seed(repo, &[("item1", 10_000, 10), ("item2", 500, 1)]);
        let id = saved[0].id.unwrap();

        repo.update(id, &ItemUpdateDto::new("item3", 20_000, 30)).unwrap();

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.id, Some(id), "{backend}");
        assert_eq!(found.item_name, "item3", "{backend}");
        assert_eq!(found.price, 20_000, "{backend}");
        assert_eq!(found.quantity, 30, "{backend}");

        let untouched = repo.find_by_id(saved[1].id.unwrap()).unwrap().unwrap();
        assert_eq!(untouched, saved[1], "{backend}");
    });
}

#[test]
fn update_unknown_id_returns_not_found() {
    with_each_backend(|backend, repo| {
        let err = repo
            .update(404, &ItemUpdateDto::new("ghost", 1, 1))
            .unwrap_err();
        assert!(
            matches!(err, RepoError::NotFound(404)),
            "{backend}: unexpected error {err}"
        );

        let err = repo
            .update(404, &ItemUpdateDto::new("way-too-long-name", 1, 1))
            .unwrap_err();
        assert!(
            matches!(err, RepoError::NotFound(404)),
            "{backend}: missing id must win over name length, got {err}"
        );
    });
}

#[test]
fn find_all_without_filters_returns_everything_in_storage_order() {
    with_each_backend(|backend, repo| {
        let saved = seed(repo, CATALOGUE);

        let all = repo.find_all(&ItemSearchCond::default()).unwrap();
        assert_eq!(all, saved, "{backend}");
    });
}

#[test]
fn find_all_by_name_matches_substring_ignoring_ascii_case() {
    with_each_backend(|backend, repo| {
        seed(repo, CATALOGUE);

        let found = repo.find_all(&ItemSearchCond::by_name("itemA")).unwrap();
        assert_eq!(names(&found), vec!["itemA-1", "itemA-2"], "{backend}");

        let found = repo.find_all(&ItemSearchCond::by_name("-1")).unwrap();
        assert_eq!(names(&found), vec!["itemA-1", "itemB-1"], "{backend}");

        let found = repo.find_all(&ItemSearchCond::by_name("ITEMb")).unwrap();
        assert_eq!(names(&found), vec!["itemB-1"], "{backend}");
    });
}

#[test]
fn find_all_by_max_price_is_inclusive() {
    with_each_backend(|backend, repo| {
        seed(repo, CATALOGUE);

        let found = repo.find_all(&ItemSearchCond::by_max_price(10_000)).unwrap();
        assert_eq!(names(&found), vec!["itemA-1"], "{backend}");

        let found = repo.find_all(&ItemSearchCond::by_max_price(9_999)).unwrap();
        assert!(found.is_empty(), "{backend}");
    });
}

#[test]
fn find_all_combines_filters_with_and() {
    with_each_backend(|backend, repo| {
        seed(repo, CATALOGUE);

        let cond = ItemSearchCond::new(Some("itemA".to_string()), Some(10_000));
        let found = repo.find_all(&cond).unwrap();
        assert_eq!(names(&found), vec!["itemA-1"], "{backend}");

        let cond = ItemSearchCond::new(Some("itemB".to_string()), Some(10_000));
        assert!(repo.find_all(&cond).unwrap().is_empty(), "{backend}");
    });
}

#[test]
fn blank_name_filter_behaves_like_absent_filter() {
    with_each_backend(|backend, repo| {
        let saved = seed(repo, &[("apple", 50, 3), ("banana", 150, 1)]);

        for blank in ["", " ", "\t ", "\u{a0}"] {
            let found = repo.find_all(&ItemSearchCond::by_name(blank)).unwrap();
            assert_eq!(found, saved, "{backend}: blank {blank:?}");
        }

        let cond = ItemSearchCond::new(Some("   ".to_string()), Some(100));
        let found = repo.find_all(&cond).unwrap();
        assert_eq!(names(&found), vec!["apple"], "{backend}");
    });
}

#[test]
fn apple_banana_walkthrough() {
    with_each_backend(|backend, repo| {
        let apple = repo.save(Item::new("apple", 50, 3)).unwrap();
        let banana = repo.save(Item::new("banana", 150, 1)).unwrap();
        assert_eq!(apple.id, Some(1), "{backend}");
        assert_eq!(banana.id, Some(2), "{backend}");

        let cheap = repo.find_all(&ItemSearchCond::by_max_price(100)).unwrap();
        assert_eq!(cheap, vec![apple.clone()], "{backend}");

        let with_an = repo.find_all(&ItemSearchCond::by_name("an")).unwrap();
        assert_eq!(with_an, vec![banana.clone()], "{backend}");

        let all = repo.find_all(&ItemSearchCond::default()).unwrap();
        assert_eq!(all, vec![apple, banana], "{backend}");
    });
}

#[test]
fn name_longer_than_ten_chars_is_a_constraint_violation() {
    with_each_backend(|backend, repo| {
        let err = repo.save(Item::new("eleven-char", 1, 1)).unwrap_err();
        assert!(
            matches!(err, RepoError::ConstraintViolation(_)),
            "{backend}: unexpected error {err}"
        );
        let all = repo.find_all(&ItemSearchCond::default()).unwrap();
        assert!(all.is_empty(), "{backend}");

        let saved = repo.save(Item::new("ten-chars!", 1, 1)).unwrap();
        let id = saved.id.unwrap();
        let err = repo
            .update(id, &ItemUpdateDto::new("way-too-long-name", 2, 2))
            .unwrap_err();
        assert!(
            matches!(err, RepoError::ConstraintViolation(_)),
            "{backend}: unexpected error {err}"
        );
        assert_eq!(repo.find_by_id(id).unwrap(), Some(saved), "{backend}");
    });
}

#[test]
fn name_limit_counts_characters_not_bytes() {
    with_each_backend(|backend, repo| {
        let saved = repo.save(Item::new("가나다라마바사아자차", 1, 1)).unwrap();
        let found = repo.find_by_id(saved.id.unwrap()).unwrap().unwrap();
        assert_eq!(found.item_name, "가나다라마바사아자차", "{backend}");
    });
}

#[test]
fn like_metacharacters_in_name_filter_match_literally() {
    with_each_backend(|backend, repo| {
        seed(
            repo,
            &[("50%off", 1, 1), ("500ff", 1, 1), ("a_b", 1, 1), ("axb", 1, 1)],
        );

        let found = repo.find_all(&ItemSearchCond::by_name("%")).unwrap();
        assert_eq!(names(&found), vec!["50%off"], "{backend}");

        let found = repo.find_all(&ItemSearchCond::by_name("_")).unwrap();
        assert_eq!(names(&found), vec!["a_b"], "{backend}");
    });
}

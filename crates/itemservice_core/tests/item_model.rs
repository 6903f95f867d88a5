use itemservice_core::{Item, ItemSearchCond, ItemUpdateDto};
use serde_json::json;

#[test]
fn item_serializes_with_external_field_names() {
    let mut item = Item::new("apple", 50, 3);
    item.id = Some(1);

    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(
        value,
        json!({ "id": 1, "itemName": "apple", "price": 50, "quantity": 3 })
    );
}

#[test]
fn unsaved_item_serializes_null_id() {
    let value = serde_json::to_value(Item::new("pear", 1, 1)).unwrap();
    assert_eq!(value["id"], serde_json::Value::Null);
}

#[test]
fn search_cond_and_update_dto_deserialize_from_camel_case() {
    let cond: ItemSearchCond =
        serde_json::from_value(json!({ "itemName": "an", "maxPrice": 100 })).unwrap();
    assert_eq!(cond, ItemSearchCond::new(Some("an".to_string()), Some(100)));

    let empty: ItemSearchCond = serde_json::from_value(json!({})).unwrap();
    assert_eq!(empty, ItemSearchCond::default());

    let update: ItemUpdateDto =
        serde_json::from_value(json!({ "itemName": "kiwi", "price": 7, "quantity": 2 }))
            .unwrap();
    assert_eq!(update, ItemUpdateDto::new("kiwi", 7, 2));
}

//! Proptest generators for property-based testing.

use proptest::prelude::*;

use stockroom_core::{Category, ItemDetails, NewItem, FIELD_SEPARATOR};

/// Generate a Category.
pub fn category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Equipment), Just(Category::Component)]
}

/// Generate a text field: non-empty, already trimmed, no separator.
pub fn field_text() -> impl Strategy<Value = String> {
    "[A-Za-zА-Яа-я0-9][A-Za-zА-Яа-я0-9 .-]{0,14}[A-Za-zА-Яа-я0-9]".prop_map(String::from)
}

/// Generate a stock quantity.
pub fn quantity() -> impl Strategy<Value = i64> {
    0i64..10_000
}

/// Generate a signed quantity change, small enough to hit zero often.
pub fn delta() -> impl Strategy<Value = i64> {
    -50i64..=50
}

/// Generate a sequence of quantity changes.
pub fn deltas(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(delta(), 0..=max_len)
}

/// Generate a valid item of the given category.
pub fn new_item_in(category: Category) -> BoxedStrategy<NewItem> {
    match category {
        Category::Equipment => (field_text(), field_text(), quantity())
            .prop_map(|(name, kind, qty)| NewItem::equipment(name, kind, qty))
            .boxed(),
        Category::Component => (field_text(), quantity(), field_text(), field_text())
            .prop_map(|(name, qty, size, kind)| NewItem::component(name, qty, size, kind))
            .boxed(),
    }
}

/// Generate a valid item of either category.
pub fn new_item() -> impl Strategy<Value = NewItem> {
    category().prop_flat_map(new_item_in)
}

/// Render an item as the line an operator would type to register it.
pub fn registration_line(item: &NewItem) -> String {
    let sep = format!(" {FIELD_SEPARATOR} ");
    match &item.details {
        ItemDetails::Equipment { equipment_type } => {
            [item.name.clone(), equipment_type.clone(), item.quantity.to_string()].join(&sep)
        }
        ItemDetails::Component { size, component_type } => [
            item.name.clone(),
            item.quantity.to_string(),
            size.clone(),
            component_type.clone(),
        ]
        .join(&sep),
    }
}

//! User-facing item formatting.
//!
//! [`format_item`] is shared by id lookups and adjustment confirmations, so
//! both show an item byte-for-byte the same way.

use crate::item::{Item, ItemDetails};

/// Multi-line item card: category, id, name, quantity, then the
/// category-specific fields.
pub fn format_item(item: &Item) -> String {
    let base = format!(
        "Category: {}\nID: {}\nName: {}\nQuantity: {}",
        item.category(),
        item.id,
        item.name,
        item.quantity
    );

    match &item.details {
        ItemDetails::Equipment { equipment_type } => {
            format!("{base}\nEquipment type: {equipment_type}")
        }
        ItemDetails::Component {
            size,
            component_type,
        } => format!("{base}\nSize: {size}\nComponent type: {component_type}"),
    }
}

/// One-line summary used in name-search results.
pub fn format_search_hit(item: &Item) -> String {
    format!(
        "{} ID{}: {} ({} pcs)",
        item.category(),
        item.id,
        item.name,
        item.quantity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use crate::types::ItemId;

    #[test]
    fn test_format_equipment() {
        let item = NewItem::equipment("Lathe", "Metalwork", 5).with_id(ItemId(3));
        assert_eq!(
            format_item(&item),
            "Category: Equipment\nID: 3\nName: Lathe\nQuantity: 5\nEquipment type: Metalwork"
        );
    }

    #[test]
    fn test_format_component() {
        let item = NewItem::component("Bolt M12", 100, "12x50", "Fastener").with_id(ItemId(7));
        assert_eq!(
            format_item(&item),
            "Category: Component\nID: 7\nName: Bolt M12\nQuantity: 100\nSize: 12x50\nComponent type: Fastener"
        );
    }

    #[test]
    fn test_format_search_hit() {
        let item = NewItem::component("Bolt M12", 100, "12x50", "Fastener").with_id(ItemId(7));
        assert_eq!(format_search_hit(&item), "Component ID7: Bolt M12 (100 pcs)");
    }
}

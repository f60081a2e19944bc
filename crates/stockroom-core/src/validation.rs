//! Registration input parsing.
//!
//! Registration collects an item as one `|`-separated line:
//!
//! - Equipment: `name | equipment type | quantity`
//! - Component: `name | quantity | size | component type`
//!
//! Fields are trimmed. Quantity must be a non-negative integer and the text
//! fields must not be empty.

use crate::error::ValidationError;
use crate::item::NewItem;
use crate::types::Category;

/// Field separator for registration input.
pub const FIELD_SEPARATOR: char = '|';

/// Parse a registration line for the given category.
pub fn parse_registration_fields(category: Category, input: &str) -> Result<NewItem, ValidationError> {
    let parts: Vec<&str> = input.split(FIELD_SEPARATOR).map(str::trim).collect();

    if parts.len() != category.field_count() {
        return Err(ValidationError::FieldCount {
            expected: category.field_count(),
            got: parts.len(),
        });
    }

    match category {
        Category::Equipment => {
            let name = non_empty("name", parts[0])?;
            let equipment_type = non_empty("equipment type", parts[1])?;
            let quantity = parse_quantity(parts[2])?;
            Ok(NewItem::equipment(name, equipment_type, quantity))
        }
        Category::Component => {
            let name = non_empty("name", parts[0])?;
            let quantity = parse_quantity(parts[1])?;
            let size = non_empty("size", parts[2])?;
            let component_type = non_empty("component type", parts[3])?;
            Ok(NewItem::component(name, quantity, size, component_type))
        }
    }
}

/// Parse a stock quantity: a non-negative integer.
pub fn parse_quantity(raw: &str) -> Result<i64, ValidationError> {
    match raw.parse::<i64>() {
        Ok(q) if q >= 0 => Ok(q),
        _ => Err(ValidationError::InvalidQuantity(raw.to_string())),
    }
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value)
    }
}

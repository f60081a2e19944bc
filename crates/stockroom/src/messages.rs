//! Chat-facing message types and reply texts.
//!
//! The transport turns whatever the chat platform delivers into an
//! [`Inbound`] and renders the [`Reply`] it gets back, including the
//! optional choice buttons.

use stockroom_core::Category;

/// One message from an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Free text, including commands.
    Text(String),
    /// A pressed choice button, carrying its selector value.
    Choice(String),
}

impl Inbound {
    pub fn text(s: impl Into<String>) -> Self {
        Inbound::Text(s.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        Inbound::Choice(value.into())
    }
}

/// A button offered with a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    /// Sent back as [`Inbound::Choice`] when pressed.
    pub value: String,
}

/// One message back to the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub choices: Vec<Choice>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// The two-option category chooser.
    pub fn category_chooser() -> Self {
        Self {
            text: CHOOSE_CATEGORY.to_string(),
            choices: Category::ALL
                .iter()
                .map(|c| Choice {
                    label: c.label().to_string(),
                    value: c.selector().to_string(),
                })
                .collect(),
        }
    }
}

pub const HELP: &str = "Stockroom inventory\n\n\
Commands:\n\
/search <category> <ID or name> - find an item\n\
/add <category> <ID> <qty> - add stock\n\
/give <category> <ID> <qty> - take stock\n\
/add_new - register a new item\n\
/cancel - cancel the current action\n\n\
Categories: Equipment, Component";

pub const CANCELLED: &str = "Action cancelled";

pub const SEARCH_USAGE: &str = "Specify a category and a name or ID to search for\n\
Example:\n\
/search Equipment 12";

pub const ADJUST_USAGE: &str = "Invalid command format\n\
Examples:\n\
/add Equipment 123 10\n\
/give Component 456 5";

pub const NOT_FOUND: &str = "Item not found";
pub const NO_RESULTS: &str = "Nothing found";
pub const SEARCH_RESULTS: &str = "Search results:";

pub const UPDATED: &str = "Updated successfully!";
pub const UPDATE_FAILED: &str = "Update failed";

pub const CHOOSE_CATEGORY: &str = "Choose the type of the new item:";

pub const EQUIPMENT_PROMPT: &str = "Enter the equipment details separated by a vertical bar (|):\n\
Name | Type | Quantity\n\n\
Example:\n\
Lathe | Metalwork | 5";

pub const COMPONENT_PROMPT: &str = "Enter the component details separated by a vertical bar (|):\n\
Name | Quantity | Size | Type\n\n\
Example:\n\
Bolt M12 | 100 | 12x50 mm | Fastener";

pub const INTERNAL_ERROR: &str = "Something went wrong, please try again later";

/// Prompt shown after a category is chosen.
pub fn fields_prompt(category: Category) -> &'static str {
    match category {
        Category::Equipment => EQUIPMENT_PROMPT,
        Category::Component => COMPONENT_PROMPT,
    }
}

/// Re-prompt after rejected registration input.
pub fn retry(reason: impl std::fmt::Display) -> String {
    format!("Error: {reason}\nPlease try again")
}

/// Confirmation after a registration commits.
pub fn registered(category: Category, id: stockroom_core::ItemId) -> String {
    format!("{category} added!\nID: {id}")
}

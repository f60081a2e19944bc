//! Command interpreter: raw chat text to typed intents.
//!
//! Categories, ids and quantities are parsed here, once. Nothing that fails
//! to parse reaches the store.
//!
//! Command names are case-sensitive and may carry a `@botname` suffix. Text
//! that is not a known command is [`Intent::Unrecognized`]; whether that is
//! registration input or noise is decided by the caller.

use stockroom_core::{Category, ItemId, ValidationError};
use thiserror::Error;

use crate::messages;

/// What a message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Cancel,
    Search {
        category: Category,
        term: SearchTerm,
    },
    Adjust(Adjustment),
    BeginRegistration,
    Unrecognized,
}

/// How a search term is interpreted.
///
/// An all-digit term is always an id, so an item literally named "42" can
/// only be found by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    Id(ItemId),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Add,
    Give,
}

/// A parsed `/add` or `/give`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub direction: Direction,
    pub category: Category,
    pub id: ItemId,
    pub magnitude: i64,
}

impl Adjustment {
    /// The signed delta handed to the store.
    ///
    /// `/give` always withdraws, whatever sign the user typed. `/add` passes
    /// the magnitude through unchanged.
    pub fn delta(&self) -> i64 {
        match self.direction {
            Direction::Add => self.magnitude,
            Direction::Give => -self.magnitude.saturating_abs(),
        }
    }
}

/// Why a command's arguments were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("expected {expected} arguments, got {got}")]
    Count { expected: usize, got: usize },

    #[error("not an integer: '{0}'")]
    NotAnInteger(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A malformed known command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("malformed /search: {0}")]
    Search(ArgumentError),

    #[error("malformed /{command}: {cause}")]
    Adjust {
        command: &'static str,
        cause: ArgumentError,
    },
}

impl CommandError {
    /// Usage text shown to the user.
    pub fn usage(&self) -> &'static str {
        match self {
            CommandError::Search(_) => messages::SEARCH_USAGE,
            CommandError::Adjust { .. } => messages::ADJUST_USAGE,
        }
    }
}

/// Interpret one message.
pub fn interpret(text: &str) -> Result<Intent, CommandError> {
    let Some((head, rest)) = split_head(text) else {
        return Ok(Intent::Unrecognized);
    };

    let Some(name) = command_name(head) else {
        return Ok(Intent::Unrecognized);
    };

    match name {
        "start" => Ok(Intent::Start),
        "cancel" => Ok(Intent::Cancel),
        "add_new" => Ok(Intent::BeginRegistration),
        "search" => parse_search(rest).map_err(CommandError::Search),
        "add" => parse_adjust(Direction::Add, rest).map_err(|cause| CommandError::Adjust {
            command: "add",
            cause,
        }),
        "give" => parse_adjust(Direction::Give, rest).map_err(|cause| CommandError::Adjust {
            command: "give",
            cause,
        }),
        _ => Ok(Intent::Unrecognized),
    }
}

/// `/search <category> <term>`; the term is the rest of the line.
fn parse_search(args: &str) -> Result<Intent, ArgumentError> {
    let Some((category, term)) = split_head(args) else {
        return Err(ArgumentError::Count { expected: 2, got: 0 });
    };

    let term = term.trim();
    if term.is_empty() {
        return Err(ArgumentError::Count { expected: 2, got: 1 });
    }

    let category = Category::from_token(category)?;

    let term = if term.chars().all(|c| c.is_ascii_digit()) {
        let id = term
            .parse::<i64>()
            .map_err(|_| ArgumentError::NotAnInteger(term.to_string()))?;
        SearchTerm::Id(ItemId(id))
    } else {
        SearchTerm::Name(term.to_string())
    };

    Ok(Intent::Search { category, term })
}

/// `/add|/give <category> <id> <qty>`, exactly three arguments.
fn parse_adjust(direction: Direction, args: &str) -> Result<Intent, ArgumentError> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(ArgumentError::Count {
            expected: 3,
            got: tokens.len(),
        });
    }

    let category = Category::from_token(tokens[0])?;
    let id = parse_int(tokens[1])?;
    let magnitude = parse_int(tokens[2])?;

    Ok(Intent::Adjust(Adjustment {
        direction,
        category,
        id: ItemId(id),
        magnitude,
    }))
}

fn parse_int(token: &str) -> Result<i64, ArgumentError> {
    token
        .parse()
        .map_err(|_| ArgumentError::NotAnInteger(token.to_string()))
}

/// `/name` or `/name@bot` to `name`.
fn command_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix('/')?;
    let name = name.split_once('@').map_or(name, |(name, _bot)| name);
    (!name.is_empty()).then_some(name)
}

/// Split off the first whitespace-delimited token.
fn split_head(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], s[i..].trim_start())),
        None => Some((s, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(interpret("/start").unwrap(), Intent::Start);
        assert_eq!(interpret("/cancel").unwrap(), Intent::Cancel);
        assert_eq!(interpret("/add_new").unwrap(), Intent::BeginRegistration);
        assert_eq!(interpret("/start@stock_bot").unwrap(), Intent::Start);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(interpret("hello").unwrap(), Intent::Unrecognized);
        assert_eq!(interpret("").unwrap(), Intent::Unrecognized);
        assert_eq!(interpret("/unknown x").unwrap(), Intent::Unrecognized);
        assert_eq!(interpret("/Start").unwrap(), Intent::Unrecognized);
        assert_eq!(interpret("Bolt | 5 | M12 | Fastener").unwrap(), Intent::Unrecognized);
    }

    #[test]
    fn test_search_by_id() {
        assert_eq!(
            interpret("/search Equipment 5").unwrap(),
            Intent::Search {
                category: Category::Equipment,
                term: SearchTerm::Id(ItemId(5)),
            }
        );
    }

    #[test]
    fn test_search_by_name_keeps_spaces() {
        assert_eq!(
            interpret("/search Component  Bolt M12 ").unwrap(),
            Intent::Search {
                category: Category::Component,
                term: SearchTerm::Name("Bolt M12".into()),
            }
        );
    }

    #[test]
    fn test_search_mixed_term_is_name() {
        let intent = interpret("/search Equipment 12a").unwrap();
        assert!(matches!(intent, Intent::Search { term: SearchTerm::Name(n), .. } if n == "12a"));
    }

    #[test]
    fn test_search_missing_args() {
        let err = interpret("/search").unwrap_err();
        assert_eq!(err, CommandError::Search(ArgumentError::Count { expected: 2, got: 0 }));
        assert_eq!(err.usage(), messages::SEARCH_USAGE);

        let err = interpret("/search Equipment").unwrap_err();
        assert_eq!(err, CommandError::Search(ArgumentError::Count { expected: 2, got: 1 }));
    }

    #[test]
    fn test_search_unknown_category() {
        let err = interpret("/search Tools 5").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Search(ArgumentError::Invalid(ValidationError::UnknownCategory(_)))
        ));
    }

    #[test]
    fn test_search_id_overflow() {
        let err = interpret("/search Equipment 99999999999999999999").unwrap_err();
        assert!(matches!(err, CommandError::Search(ArgumentError::NotAnInteger(_))));
    }

    #[test]
    fn test_adjust() {
        let Intent::Adjust(adj) = interpret("/add Equipment 123 10").unwrap() else {
            panic!("expected adjust");
        };
        assert_eq!(adj.direction, Direction::Add);
        assert_eq!(adj.category, Category::Equipment);
        assert_eq!(adj.id, ItemId(123));
        assert_eq!(adj.delta(), 10);
    }

    #[test]
    fn test_give_negates() {
        let Intent::Adjust(adj) = interpret("/give Компоненты 456 5").unwrap() else {
            panic!("expected adjust");
        };
        assert_eq!(adj.category, Category::Component);
        assert_eq!(adj.delta(), -5);

        let Intent::Adjust(adj) = interpret("/give Component 456 -5").unwrap() else {
            panic!("expected adjust");
        };
        assert_eq!(adj.delta(), -5);
    }

    #[test]
    fn test_give_extreme_magnitude_does_not_overflow() {
        let Intent::Adjust(adj) = interpret(&format!("/give Component 1 {}", i64::MIN)).unwrap() else {
            panic!("expected adjust");
        };
        assert_eq!(adj.delta(), -i64::MAX);
    }

    #[test]
    fn test_adjust_malformed() {
        let cases = [
            "/add Equipment 123",
            "/add Equipment 123 10 extra",
            "/add Equipment abc 10",
            "/give Equipment 1 ten",
            "/give Tools 1 10",
        ];
        for case in cases {
            let err = interpret(case).unwrap_err();
            assert!(matches!(err, CommandError::Adjust { .. }), "{case}");
            assert_eq!(err.usage(), messages::ADJUST_USAGE);
        }
    }

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("/search@bot"), Some("search"));
        assert_eq!(command_name("/"), None);
        assert_eq!(command_name("search"), None);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn interpret_never_panics(text in "\\PC{0,64}") {
                let _ = interpret(&text);
            }

            #[test]
            fn give_never_adds(magnitude in any::<i64>(), id in 0i64..1_000_000) {
                let text = format!("/give Equipment {id} {magnitude}");
                let Ok(Intent::Adjust(adj)) = interpret(&text) else {
                    panic!("expected adjust for {text}");
                };
                prop_assert!(adj.delta() <= 0);
                prop_assert_eq!(adj.id, ItemId(id));
            }

            #[test]
            fn digit_terms_are_ids(id in 0i64..=i64::MAX) {
                let intent = interpret(&format!("/search Equipment {id}")).unwrap();
                prop_assert_eq!(
                    intent,
                    Intent::Search { category: Category::Equipment, term: SearchTerm::Id(ItemId(id)) }
                );
            }
        }
    }
}

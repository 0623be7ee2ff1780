//! Raw field options as authored in a schema declaration
//!
//! A field is declared with one of three shapes:
//!
//! ```text
//! name:   "string|searchable|infix:false"            pipe-delimited tokens
//! email:  ["string", "searchable:true", "locale:ja"]  list of tokens / keyed entries
//! legacy: false                                      single flag
//! ```
//!
//! [`tokens::parse_option`] turns any of them into a [`tokens::Normalized`] map.

pub mod chars;
pub mod tokens;

pub use chars::chars_to_array;
pub use tokens::{parse_option, Normalized, OptionKey, OptionMap};

use crate::record::Record;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Produces a field value from the whole record (`valueFrom`).
pub type ValueFromFn = Arc<dyn Fn(&dyn Record) -> Value + Send + Sync>;

/// Rewrites a resolved field value before casting (`transformTo`).
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A single option value.
#[derive(Clone)]
pub enum OptionValue {
    Str(String),
    Bool(bool),
    List(Vec<OptionValue>),
    ValueFrom(ValueFromFn),
    Transform(TransformFn),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, OptionValue::ValueFrom(_) | OptionValue::Transform(_))
    }

    /// Short human readable rendering used in error messages.
    pub fn describe(&self) -> String {
        match self {
            OptionValue::Str(s) => s.clone(),
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::List(items) => format!(
                "[{}]",
                items.iter().map(OptionValue::describe).collect::<Vec<_>>().join(", ")
            ),
            OptionValue::ValueFrom(_) => "<valueFrom callback>".to_string(),
            OptionValue::Transform(_) => "<transformTo callback>".to_string(),
        }
    }

    /// Literal value for `valueFrom` overrides that are not callbacks.
    pub fn to_value(&self) -> Value {
        match self {
            OptionValue::Str(s) => Value::String(s.clone()),
            OptionValue::Bool(b) => Value::Bool(*b),
            OptionValue::List(items) => Value::Array(items.iter().map(OptionValue::to_value).collect()),
            OptionValue::ValueFrom(_) | OptionValue::Transform(_) => Value::Null,
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            OptionValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            OptionValue::List(items) => f.debug_tuple("List").field(items).finish(),
            OptionValue::ValueFrom(_) => f.write_str("ValueFrom(<callback>)"),
            OptionValue::Transform(_) => f.write_str("Transform(<callback>)"),
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionValue::Str(a), OptionValue::Str(b)) => a == b,
            (OptionValue::Bool(a), OptionValue::Bool(b)) => a == b,
            (OptionValue::List(a), OptionValue::List(b)) => a == b,
            (OptionValue::ValueFrom(a), OptionValue::ValueFrom(b)) => Arc::ptr_eq(a, b),
            (OptionValue::Transform(a), OptionValue::Transform(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl<T: Into<OptionValue>> From<Vec<T>> for OptionValue {
    fn from(items: Vec<T>) -> Self {
        OptionValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// One entry of a list-shaped field option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionEntry {
    Positional(OptionValue),
    Keyed(String, OptionValue),
}

/// A field option exactly as declared.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOption {
    Tokens(String),
    List(Vec<OptionEntry>),
    Flag(bool),
}

impl FieldOption {
    /// Empty list-shaped option, extended with the builder methods below.
    pub fn list() -> Self {
        FieldOption::List(Vec::new())
    }

    /// Appends a positional entry.
    pub fn token(self, value: impl Into<OptionValue>) -> Self {
        self.push(OptionEntry::Positional(value.into()))
    }

    /// Appends a keyed entry.
    pub fn set(self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.push(OptionEntry::Keyed(key.into(), value.into()))
    }

    pub fn value_from<F>(self, f: F) -> Self
    where
        F: Fn(&dyn Record) -> Value + Send + Sync + 'static,
    {
        self.set_callback("valueFrom", OptionValue::ValueFrom(Arc::new(f)))
    }

    pub fn transform_to<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.set_callback("transformTo", OptionValue::Transform(Arc::new(f)))
    }

    fn set_callback(self, key: &str, value: OptionValue) -> Self {
        self.push(OptionEntry::Keyed(key.to_string(), value))
    }

    fn push(self, entry: OptionEntry) -> Self {
        let mut entries = self.into_entries();
        entries.push(entry);
        FieldOption::List(entries)
    }

    fn into_entries(self) -> Vec<OptionEntry> {
        match self {
            FieldOption::List(entries) => entries,
            FieldOption::Tokens(s) => s
                .split('|')
                .map(|t| OptionEntry::Positional(OptionValue::Str(t.to_string())))
                .collect(),
            FieldOption::Flag(b) => vec![OptionEntry::Positional(OptionValue::Bool(b))],
        }
    }
}

impl From<&str> for FieldOption {
    fn from(s: &str) -> Self {
        FieldOption::Tokens(s.to_string())
    }
}

impl From<String> for FieldOption {
    fn from(s: String) -> Self {
        FieldOption::Tokens(s)
    }
}

impl From<bool> for FieldOption {
    fn from(b: bool) -> Self {
        FieldOption::Flag(b)
    }
}

impl<const N: usize> From<[&str; N]> for FieldOption {
    fn from(tokens: [&str; N]) -> Self {
        FieldOption::List(
            tokens
                .into_iter()
                .map(|t| OptionEntry::Positional(OptionValue::from(t)))
                .collect(),
        )
    }
}

impl From<Vec<&str>> for FieldOption {
    fn from(tokens: Vec<&str>) -> Self {
        FieldOption::List(
            tokens
                .into_iter()
                .map(|t| OptionEntry::Positional(OptionValue::from(t)))
                .collect(),
        )
    }
}

impl From<Vec<OptionEntry>> for FieldOption {
    fn from(entries: Vec<OptionEntry>) -> Self {
        FieldOption::List(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_extends_tokens() {
        let option = FieldOption::from("string|searchable").set("name", "title");
        assert_eq!(
            option,
            FieldOption::List(vec![
                OptionEntry::Positional(OptionValue::from("string")),
                OptionEntry::Positional(OptionValue::from("searchable")),
                OptionEntry::Keyed("name".to_string(), OptionValue::from("title")),
            ])
        );
    }

    #[test]
    fn test_callbacks_compare_by_identity() {
        let option = FieldOption::list().transform_to(|v| v);
        let FieldOption::List(entries) = &option else {
            panic!("expected list");
        };
        let OptionEntry::Keyed(key, value) = &entries[0] else {
            panic!("expected keyed entry");
        };
        assert_eq!(key, "transformTo");
        assert!(value.is_callback());
        assert_eq!(value, &value.clone());
        assert_ne!(value, &OptionValue::Transform(Arc::new(|v: Value| v)));
    }

    #[test]
    fn test_describe() {
        let value = OptionValue::from(vec!["a", "b"]);
        assert_eq!(value.describe(), "[a, b]");
        assert_eq!(OptionValue::Bool(false).describe(), "false");
    }
}

//! Validation attached to vocabulary identities

use super::{FieldParameter, FieldType, SchemaParameter};
use crate::options::{chars_to_array, Normalized, OptionValue};
use crate::{Error, Result};
use serde::Serialize;

/// Strict boolean parsing.
///
/// Accepts booleans and the case-insensitive, trimmed strings
/// `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`. Anything else is `None`.
pub fn parse_bool(value: &OptionValue) -> Option<bool> {
    match value {
        OptionValue::Bool(b) => Some(*b),
        OptionValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl FieldType {
    pub fn can_be_queried(&self, record: &str, field: &str) -> Result<()> {
        if self.is_queryable() {
            Ok(())
        } else {
            Err(Error::TypeCannotBeQueried {
                record: record.to_string(),
                field: field.to_string(),
                field_type: *self,
            })
        }
    }

    pub fn can_be_sorted(&self, record: &str, field: &str) -> Result<()> {
        if self.is_sortable() {
            Ok(())
        } else {
            Err(Error::SortingFieldNotSortable {
                record: record.to_string(),
                field: field.to_string(),
                field_type: *self,
            })
        }
    }
}

impl FieldParameter {
    pub fn parse(&self, value: &OptionValue, record: &str, field: &str) -> Result<bool> {
        parse_bool(value).ok_or_else(|| Error::ParameterMustBeBoolean {
            record: record.to_string(),
            field: field.to_string(),
            parameter: *self,
            value: value.describe(),
        })
    }
}

/// A resolved collection-level setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaSetting {
    Chars(Vec<String>),
    Field(String),
    Bool(bool),
}

impl SchemaParameter {
    /// Validates a collection setting.
    ///
    /// `lookup` maps a declared field name to its resolved type; it is only
    /// consulted for `default_sorting_field`, which keeps the declared name.
    pub fn parse<F>(&self, value: &Normalized, record: &str, lookup: F) -> Result<SchemaSetting>
    where
        F: FnOnce(&str) -> Option<FieldType>,
    {
        let values = setting_values(value);
        match self {
            SchemaParameter::TokenSeparators | SchemaParameter::SymbolsToIndex => {
                chars_to_array(&OptionValue::List(values.clone()))
                    .map(SchemaSetting::Chars)
                    .ok_or_else(|| self.invalid(record, "a string or a list of characters", &values))
            }
            SchemaParameter::DefaultSortingField => {
                let field = only_one_field(&values, record)?;
                let field_type = lookup(&field).ok_or_else(|| Error::SortingFieldNotInSchema {
                    record: record.to_string(),
                    field: field.clone(),
                })?;
                field_type.can_be_sorted(record, &field)?;
                Ok(SchemaSetting::Field(field))
            }
            SchemaParameter::EnableNestedFields => match values.as_slice() {
                [single] => parse_bool(single)
                    .map(SchemaSetting::Bool)
                    .ok_or_else(|| self.invalid(record, "a boolean", &values)),
                _ => Err(self.invalid(record, "a boolean", &values)),
            },
        }
    }

    fn invalid(&self, record: &str, expected: &'static str, values: &[OptionValue]) -> Error {
        Error::SchemaParameterInvalid {
            record: record.to_string(),
            parameter: *self,
            expected,
            value: OptionValue::List(values.to_vec()).describe(),
        }
    }
}

fn setting_values(value: &Normalized) -> Vec<OptionValue> {
    match value {
        Normalized::Flag(b) => vec![OptionValue::Bool(*b)],
        Normalized::Options(map) => map.values().cloned().collect(),
    }
}

fn only_one_field(values: &[OptionValue], record: &str) -> Result<String> {
    let too_many = || Error::SortingOnlyOneField {
        record: record.to_string(),
    };

    let [single] = values else {
        return Err(too_many());
    };
    let name = match single {
        OptionValue::Str(s) => s.trim(),
        OptionValue::List(items) if items.len() == 1 => items[0].as_str().unwrap_or_default().trim(),
        _ => return Err(too_many()),
    };
    if name.is_empty() || name.contains(',') {
        return Err(too_many());
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{parse_option, FieldOption};

    fn normalized(option: impl Into<FieldOption>) -> Normalized {
        parse_option(&option.into())
    }

    fn created_at(name: &str) -> Option<FieldType> {
        (name == "created_at").then_some(FieldType::Int32)
    }

    #[test]
    fn test_parse_bool_accepted_forms() {
        for s in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_bool(&OptionValue::from(s)), Some(true), "{s}");
        }
        for s in ["0", "false", "No", "off"] {
            assert_eq!(parse_bool(&OptionValue::from(s)), Some(false), "{s}");
        }
        assert_eq!(parse_bool(&OptionValue::Bool(true)), Some(true));
    }

    #[test]
    fn test_parse_bool_rejects_everything_else() {
        for s in ["", "string", "2", "truthy"] {
            assert_eq!(parse_bool(&OptionValue::from(s)), None, "{s:?}");
        }
        assert_eq!(parse_bool(&OptionValue::from(vec!["true"])), None);
    }

    #[test]
    fn test_field_parameter_parse() {
        assert!(FieldParameter::Infix.parse(&OptionValue::from("true"), "User", "name").unwrap());
        let err = FieldParameter::Infix
            .parse(&OptionValue::from("sometimes"), "User", "name")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ParameterMustBeBoolean {
                parameter: FieldParameter::Infix,
                ..
            }
        ));
    }

    #[test]
    fn test_can_be_queried_and_sorted() {
        assert!(FieldType::StringArray.can_be_queried("User", "tags").is_ok());
        assert!(matches!(
            FieldType::Int32.can_be_queried("User", "age"),
            Err(Error::TypeCannotBeQueried { .. })
        ));
        assert!(FieldType::Float.can_be_sorted("User", "score").is_ok());
        assert!(matches!(
            FieldType::String.can_be_sorted("User", "name"),
            Err(Error::SortingFieldNotSortable { .. })
        ));
    }

    #[test]
    fn test_separator_settings() {
        let setting = SchemaParameter::TokenSeparators
            .parse(&normalized("@#"), "User", |_| None)
            .unwrap();
        assert_eq!(setting, SchemaSetting::Chars(vec!["@".to_string(), "#".to_string()]));

        let setting = SchemaParameter::SymbolsToIndex
            .parse(&normalized(vec!["%", "&"]), "User", |_| None)
            .unwrap();
        assert_eq!(setting, SchemaSetting::Chars(vec!["%".to_string(), "&".to_string()]));
    }

    #[test]
    fn test_default_sorting_field() {
        let setting = SchemaParameter::DefaultSortingField
            .parse(&normalized("created_at"), "User", created_at)
            .unwrap();
        assert_eq!(setting, SchemaSetting::Field("created_at".to_string()));
    }

    #[test]
    fn test_default_sorting_field_only_one() {
        for option in [normalized("name,email"), normalized(vec!["name", "email"])] {
            let err = SchemaParameter::DefaultSortingField
                .parse(&option, "User", created_at)
                .unwrap_err();
            assert!(matches!(err, Error::SortingOnlyOneField { .. }));
        }
    }

    #[test]
    fn test_default_sorting_field_not_in_schema() {
        let err = SchemaParameter::DefaultSortingField
            .parse(&normalized("updated_at"), "User", created_at)
            .unwrap_err();
        assert!(matches!(err, Error::SortingFieldNotInSchema { .. }));
    }

    #[test]
    fn test_default_sorting_field_not_sortable() {
        let err = SchemaParameter::DefaultSortingField
            .parse(&normalized("name"), "User", |_| Some(FieldType::String))
            .unwrap_err();
        assert!(matches!(err, Error::SortingFieldNotSortable { .. }));
    }

    #[test]
    fn test_enable_nested_fields() {
        let setting = SchemaParameter::EnableNestedFields
            .parse(&normalized(false), "User", |_| None)
            .unwrap();
        assert_eq!(setting, SchemaSetting::Bool(false));

        let setting = SchemaParameter::EnableNestedFields
            .parse(&normalized("true"), "User", |_| None)
            .unwrap();
        assert_eq!(setting, SchemaSetting::Bool(true));

        let err = SchemaParameter::EnableNestedFields
            .parse(&normalized("string"), "User", |_| None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaParameterInvalid {
                parameter: SchemaParameter::EnableNestedFields,
                ..
            }
        ));
    }
}

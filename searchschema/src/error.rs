use thiserror::Error;

use crate::vocabulary::{FieldModifier, FieldParameter, FieldType, SchemaParameter};

#[derive(Error, Debug)]
pub enum Error {
    #[error("{record}: schema declaration must be defined and return a mapping of fields")]
    SchemaNotDefined { record: String },

    #[error("{record}: schema declaration must be a mapping of field names to options (got {found})")]
    SchemaNotAMapping { record: String, found: String },

    #[error("{record}: `{field}` - unsupported option value: {reason}")]
    InvalidOption {
        record: String,
        field: String,
        reason: String,
    },

    #[error("{record}: `{field}` - must have exactly one field type (found {found})")]
    ExactlyOneType {
        record: String,
        field: String,
        found: usize,
    },

    #[error("{record}: `{field}` - field type `{field_type}` cannot be used to query")]
    TypeCannotBeQueried {
        record: String,
        field: String,
        field_type: FieldType,
    },

    #[error("{record}: `{field}` - `{parameter}` must be a boolean (got `{value}`)\nExamples:\n\t- {parameter}\n\t- {parameter}:true\n\t- {parameter}:false")]
    ParameterMustBeBoolean {
        record: String,
        field: String,
        parameter: FieldParameter,
        value: String,
    },

    #[error("{record}: `{field}` - `{parameter}` is declared more than once")]
    ParameterDuplicated {
        record: String,
        field: String,
        parameter: FieldParameter,
    },

    #[error("{record}: `{field}` - field modifier `{modifier}` must not be repeated")]
    ModifierDuplicated {
        record: String,
        field: String,
        modifier: FieldModifier,
    },

    #[error("{record}: `{field}` - `{modifier}` must be a {expected} callback")]
    ModifierMustBeCallback {
        record: String,
        field: String,
        modifier: FieldModifier,
        expected: &'static str,
    },

    #[error("{record}: `{field}` - `{modifier}` must be {expected}")]
    ModifierInvalidValue {
        record: String,
        field: String,
        modifier: FieldModifier,
        expected: &'static str,
    },

    #[error("{record}: `{parameter}` must be {expected} (got `{value}`)")]
    SchemaParameterInvalid {
        record: String,
        parameter: SchemaParameter,
        expected: &'static str,
        value: String,
    },

    #[error("{record}: only one field can be used for default sorting")]
    SortingOnlyOneField { record: String },

    #[error("{record}: `{field}` - default sorting field must be defined in the schema")]
    SortingFieldNotInSchema { record: String, field: String },

    #[error("{record}: `{field}` - default sorting field must be int32 or float (got `{field_type}`)")]
    SortingFieldNotSortable {
        record: String,
        field: String,
        field_type: FieldType,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Record type the error was raised for, if it belongs to one.
    pub fn record(&self) -> Option<&str> {
        match self {
            Error::SchemaNotDefined { record }
            | Error::SchemaNotAMapping { record, .. }
            | Error::InvalidOption { record, .. }
            | Error::ExactlyOneType { record, .. }
            | Error::TypeCannotBeQueried { record, .. }
            | Error::ParameterMustBeBoolean { record, .. }
            | Error::ParameterDuplicated { record, .. }
            | Error::ModifierDuplicated { record, .. }
            | Error::ModifierMustBeCallback { record, .. }
            | Error::ModifierInvalidValue { record, .. }
            | Error::SchemaParameterInvalid { record, .. }
            | Error::SortingOnlyOneField { record }
            | Error::SortingFieldNotInSchema { record, .. }
            | Error::SortingFieldNotSortable { record, .. } => Some(record),
            Error::Io(_)
            | Error::Yaml(_)
            | Error::Json(_)
            | Error::Config(_)
            | Error::InvalidRecord(_) => None,
        }
    }

    /// Declared field name the error points at, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::InvalidOption { field, .. }
            | Error::ExactlyOneType { field, .. }
            | Error::TypeCannotBeQueried { field, .. }
            | Error::ParameterMustBeBoolean { field, .. }
            | Error::ParameterDuplicated { field, .. }
            | Error::ModifierDuplicated { field, .. }
            | Error::ModifierMustBeCallback { field, .. }
            | Error::ModifierInvalidValue { field, .. }
            | Error::SortingFieldNotInSchema { field, .. }
            | Error::SortingFieldNotSortable { field, .. } => Some(field),
            _ => None,
        }
    }

    /// True for errors caused by the schema declaration itself rather than IO or parsing.
    pub fn is_declaration_error(&self) -> bool {
        self.record().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ExactlyOneType {
            record: "User".to_string(),
            field: "email".to_string(),
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "User: `email` - must have exactly one field type (found 2)"
        );
    }

    #[test]
    fn test_error_accessors() {
        let err = Error::SortingFieldNotSortable {
            record: "User".to_string(),
            field: "name".to_string(),
            field_type: FieldType::String,
        };
        assert_eq!(err.record(), Some("User"));
        assert_eq!(err.field(), Some("name"));
        assert!(err.is_declaration_error());

        let err = Error::Config("bad".to_string());
        assert_eq!(err.record(), None);
        assert!(!err.is_declaration_error());
    }
}

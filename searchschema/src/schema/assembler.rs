//! Whole-declaration assembly into a collection schema

use super::resolver::{resolve_field, FieldDescriptor, ResolvedField};
use crate::options::{parse_option, FieldOption, Normalized};
use crate::record::RecordType;
use crate::value::Value;
use crate::vocabulary::validate::SchemaSetting;
use crate::vocabulary::SchemaParameter;
use crate::Result;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Output name of the synthesized soft-delete field.
pub const SOFT_DELETED_FIELD: &str = "__soft_deleted";

/// Resolved form of one record type's declaration. Immutable once built.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    record: String,
    normalized: Vec<(String, Normalized)>,
    fields: Vec<Arc<ResolvedField>>,
    settings: Vec<(SchemaParameter, SchemaSetting)>,
}

impl ResolvedSchema {
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Token-parsed declaration, synthesized entries included.
    pub fn normalized(&self) -> &[(String, Normalized)] {
        &self.normalized
    }

    /// Genuine fields in declaration order.
    pub fn fields(&self) -> &[Arc<ResolvedField>] {
        &self.fields
    }

    /// Looks a field up by its declared name.
    pub fn field(&self, declared_name: &str) -> Option<&ResolvedField> {
        self.fields
            .iter()
            .find(|f| f.declared_name == declared_name)
            .map(Arc::as_ref)
    }

    pub fn settings(&self) -> &[(SchemaParameter, SchemaSetting)] {
        &self.settings
    }

    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(|f| f.descriptor()).collect()
    }

    pub fn collection_schema(&self) -> CollectionSchema {
        CollectionSchema {
            fields: self.descriptors(),
            settings: self.settings.clone(),
        }
    }
}

/// The collection schema document sent to the search engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub fields: Vec<FieldDescriptor>,
    pub settings: Vec<(SchemaParameter, SchemaSetting)>,
}

impl CollectionSchema {
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing string keys, bools and string lists into a Value never fails
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for CollectionSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.settings.len()))?;
        map.serialize_entry("fields", &self.fields)?;
        for (parameter, setting) in &self.settings {
            map.serialize_entry(parameter.as_str(), setting)?;
        }
        map.end()
    }
}

/// Assembles a record type's schema, resolving every field from scratch.
pub fn assemble(record_type: &dyn RecordType) -> Result<ResolvedSchema> {
    assemble_with(record_type, |field, options| {
        resolve_field(record_type.name(), field, options).map(Arc::new)
    })
}

/// Assembles a record type's schema, delegating per-field resolution to
/// `resolve`, which lets the registry serve fields from its cache.
pub fn assemble_with<F>(record_type: &dyn RecordType, mut resolve: F) -> Result<ResolvedSchema>
where
    F: FnMut(&str, &Normalized) -> Result<Arc<ResolvedField>>,
{
    let record = record_type.name();
    let mut declaration = record_type.declared_schema()?;

    let primary_key = record_type.primary_key_name();
    if !declaration.contains(primary_key) {
        declaration.insert(primary_key, primary_key_option());
    }

    if record_type.supports_soft_delete() {
        let deleted_at = record_type.deleted_at_attribute();
        if !declaration.contains(deleted_at) {
            declaration.insert(deleted_at, soft_delete_option());
        }
    }

    let normalized: Vec<(String, Normalized)> = declaration
        .iter()
        .map(|(name, option)| (name.to_string(), parse_option(option)))
        .collect();

    let mut fields = Vec::new();
    let mut declared_settings = Vec::new();
    for (name, options) in &normalized {
        match SchemaParameter::from_name(name) {
            Some(parameter) => declared_settings.push((parameter, options)),
            None => fields.push(resolve(name.as_str(), options)?),
        }
    }

    let mut settings = Vec::with_capacity(declared_settings.len());
    for (parameter, options) in declared_settings {
        let setting = parameter.parse(options, record, |name| {
            fields
                .iter()
                .find(|f| f.declared_name == name)
                .map(|f| f.field_type)
        })?;
        settings.push((parameter, setting));
    }

    tracing::debug!(
        "Assembled schema for {}: {} fields, {} settings",
        record,
        fields.len(),
        settings.len()
    );

    Ok(ResolvedSchema {
        record: record.to_string(),
        normalized,
        fields,
        settings,
    })
}

fn primary_key_option() -> FieldOption {
    FieldOption::list()
        .token("string")
        .value_from(|record| record.primary_key_value())
}

fn soft_delete_option() -> FieldOption {
    FieldOption::list()
        .token("int32")
        .set("name", SOFT_DELETED_FIELD)
        .token("optional")
        .transform_to(|value| match value {
            Value::Timestamp(ts) => Value::Int(ts.timestamp()),
            other => other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaDeclaration;
    use crate::vocabulary::{FieldParameter, FieldType};
    use crate::Error;
    use serde_json::json;

    struct Declared {
        name: &'static str,
        schema: Option<SchemaDeclaration>,
        soft_delete: bool,
    }

    impl Declared {
        fn new(schema: SchemaDeclaration) -> Self {
            Self {
                name: "Post",
                schema: Some(schema),
                soft_delete: false,
            }
        }
    }

    impl RecordType for Declared {
        fn name(&self) -> &str {
            self.name
        }

        fn declared_schema(&self) -> Result<SchemaDeclaration> {
            self.schema.clone().ok_or_else(|| Error::SchemaNotDefined {
                record: self.name.to_string(),
            })
        }

        fn supports_soft_delete(&self) -> bool {
            self.soft_delete
        }
    }

    #[test]
    fn test_primary_key_is_synthesized_last() {
        let schema = assemble(&Declared::new(SchemaDeclaration::new().field("title", "string"))).unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.declared_name.as_str()).collect();
        assert_eq!(names, vec!["title", "id"]);
        assert_eq!(schema.field("id").unwrap().field_type, FieldType::String);
    }

    #[test]
    fn test_declared_primary_key_is_kept() {
        let declaration = SchemaDeclaration::new().field("id", "int64").field("title", "string");
        let schema = assemble(&Declared::new(declaration)).unwrap();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.field("id").unwrap().field_type, FieldType::Int64);
    }

    #[test]
    fn test_soft_delete_field() {
        let mut record_type = Declared::new(SchemaDeclaration::new().field("title", "string"));
        record_type.soft_delete = true;
        let schema = assemble(&record_type).unwrap();

        let field = schema.field("deleted_at").unwrap();
        assert_eq!(field.output_name(), SOFT_DELETED_FIELD);
        assert_eq!(field.field_type, FieldType::Int32);
        assert_eq!(field.parameter(FieldParameter::Optional), Some(true));
        assert_eq!(
            serde_json::to_value(field.descriptor()).unwrap(),
            json!({"name": "__soft_deleted", "type": "int32", "optional": true})
        );
    }

    #[test]
    fn test_settings_are_not_fields() {
        let declaration = SchemaDeclaration::new()
            .field("rank", "int32")
            .field("enable_nested_fields", true)
            .field("default_sorting_field", "rank");
        let schema = assemble(&Declared::new(declaration)).unwrap();

        assert!(schema.field("enable_nested_fields").is_none());
        assert_eq!(
            schema.collection_schema().to_json(),
            json!({
                "fields": [
                    {"name": "rank", "type": "int32"},
                    {"name": "id", "type": "string"},
                ],
                "enable_nested_fields": true,
                "default_sorting_field": "rank",
            })
        );
    }

    #[test]
    fn test_sorting_field_keeps_declared_name() {
        let declaration = SchemaDeclaration::new()
            .field("rank", "float|name:score")
            .field("default_sorting_field", "rank");
        let schema = assemble(&Declared::new(declaration)).unwrap();
        assert_eq!(
            schema.settings(),
            &[(
                SchemaParameter::DefaultSortingField,
                SchemaSetting::Field("rank".to_string())
            )]
        );
    }

    #[test]
    fn test_missing_declaration() {
        let record_type = Declared {
            name: "Ghost",
            schema: None,
            soft_delete: false,
        };
        assert!(matches!(
            assemble(&record_type),
            Err(Error::SchemaNotDefined { .. })
        ));
    }

    #[test]
    fn test_field_errors_propagate() {
        let declaration = SchemaDeclaration::new().field("title", "string|float");
        let err = assemble(&Declared::new(declaration)).unwrap_err();
        assert_eq!(err.record(), Some("Post"));
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn test_assemble_with_uses_resolver() {
        let declaration = SchemaDeclaration::new().field("title", "string");
        let mut calls = Vec::new();
        assemble_with(&Declared::new(declaration), |field, options| {
            calls.push(field.to_string());
            resolve_field("Post", field, options).map(Arc::new)
        })
        .unwrap();
        assert_eq!(calls, vec!["title", "id"]);
    }
}

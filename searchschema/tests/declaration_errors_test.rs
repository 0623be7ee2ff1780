//! Declaration errors surfaced through the registry.

use searchschema::schema::SchemaDeclaration;
use searchschema::{Error, FieldModifier, FieldOption, RecordType, Result, SchemaRegistry};

struct Declared(SchemaDeclaration);

impl RecordType for Declared {
    fn name(&self) -> &str {
        "Product"
    }

    fn declared_schema(&self) -> Result<SchemaDeclaration> {
        Ok(self.0.clone())
    }
}

fn resolve(declaration: SchemaDeclaration) -> Result<()> {
    SchemaRegistry::new().warm(&Declared(declaration))
}

#[test]
fn test_two_types() {
    let err = resolve(SchemaDeclaration::new().field("price", "string|int32")).unwrap_err();
    assert!(matches!(err, Error::ExactlyOneType { found: 2, .. }));
    assert_eq!(
        err.to_string(),
        "Product: `price` - must have exactly one field type (found 2)"
    );
}

#[test]
fn test_duplicate_name_modifier() {
    let option = FieldOption::from("string|name:a").set("name", "b");
    let err = resolve(SchemaDeclaration::new().field("title", option)).unwrap_err();
    assert!(matches!(
        err,
        Error::ModifierDuplicated {
            modifier: FieldModifier::Name,
            ..
        }
    ));
}

#[test]
fn test_unsortable_default_sorting_field() {
    let declaration = SchemaDeclaration::new()
        .field("title", "string")
        .field("default_sorting_field", "title");
    let err = resolve(declaration).unwrap_err();
    assert!(matches!(err, Error::SortingFieldNotSortable { .. }));
}

#[test]
fn test_default_sorting_field_must_be_declared() {
    let declaration = SchemaDeclaration::new()
        .field("title", "string")
        .field("default_sorting_field", "rank");
    let err = resolve(declaration).unwrap_err();
    assert!(matches!(err, Error::SortingFieldNotInSchema { ref field, .. } if field == "rank"));
}

#[test]
fn test_multiple_default_sorting_fields() {
    let declaration = SchemaDeclaration::new()
        .field("rank", "int32")
        .field("score", "float")
        .field("default_sorting_field", "rank,score");
    let err = resolve(declaration).unwrap_err();
    assert!(matches!(err, Error::SortingOnlyOneField { .. }));
}

#[test]
fn test_enable_nested_fields_must_be_boolean() {
    let declaration = SchemaDeclaration::new()
        .field("title", "string")
        .field("enable_nested_fields", "sometimes");
    let err = resolve(declaration).unwrap_err();
    assert!(matches!(err, Error::SchemaParameterInvalid { .. }));
}

#[test]
fn test_searchable_number_cannot_be_queried() {
    let declaration = SchemaDeclaration::new().field("stock", "int32|searchable");
    let err = resolve(declaration).unwrap_err();
    assert!(matches!(err, Error::TypeCannotBeQueried { .. }));
}

#[test]
fn test_unknown_tokens_are_ignored() {
    let declaration = SchemaDeclaration::new().field("title", "string|searchable|fancy|mode:loud");
    assert!(resolve(declaration).is_ok());
}

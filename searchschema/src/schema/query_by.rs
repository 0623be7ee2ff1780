use super::ResolvedSchema;
use crate::Result;

/// Default `query_by` list: searchable fields by declared name, comma-joined.
///
/// Fails on the first searchable field whose type cannot be queried.
pub fn query_by(schema: &ResolvedSchema) -> Result<String> {
    let mut names = Vec::new();
    for field in schema.fields().iter().filter(|f| f.is_searchable()) {
        field.field_type.can_be_queried(schema.record(), &field.declared_name)?;
        names.push(field.declared_name.as_str());
    }
    Ok(names.join(","))
}

use super::load_declarations;
use anyhow::{bail, Context, Result};
use searchschema::{Config, JsonRecord, RecordType, SchemaRegistry};
use std::fs;
use std::path::Path;

/// Converts the JSON records in `record_path` into searchable documents.
///
/// A single record object yields a single document, an array yields an array.
pub fn run_document(
    config: &Config,
    path: &Path,
    collection: Option<&str>,
    record_path: &Path,
) -> Result<serde_json::Value> {
    let declarations = load_declarations(config, Some(path), collection)?;
    if declarations.len() > 1 {
        bail!(
            "{} declarations found in {:?}, pick one with --collection",
            declarations.len(),
            path
        );
    }
    let Some(record_type) = declarations.values().next() else {
        bail!("No declarations found in {:?}", path);
    };

    let content = fs::read_to_string(record_path)
        .with_context(|| format!("Failed to read records from {:?}", record_path))?;
    let input: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Records in {:?} are not valid JSON", record_path))?;

    let registry = SchemaRegistry::new();
    let convert = |value: serde_json::Value| -> Result<serde_json::Value> {
        let record = JsonRecord::from_json(
            value,
            record_type.primary_key_name(),
            record_type.timestamps(),
        )?;
        let document = registry.to_searchable_document(record_type, &record)?;
        Ok(serde_json::Value::Object(document))
    };

    let output = match input {
        serde_json::Value::Array(records) => serde_json::Value::Array(
            records
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>>>()?,
        ),
        record => convert(record)?,
    };

    tracing::info!("Built searchable documents for '{}'", record_type.name());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_documents_from_array() -> Result<()> {
        let temp = TempDir::new()?;
        let schema = temp.path().join("users.yaml");
        fs::write(
            &schema,
            "collection: users\nsoft_delete: true\ntimestamps: [created_at, deleted_at]\nschema:\n  name: string\n  created_at: int64\n",
        )?;
        let records = temp.path().join("users.json");
        fs::write(
            &records,
            r#"[{"id": 1, "name": "Ada", "created_at": "2024-05-01T12:00:00Z", "deleted_at": null, "role": "admin"}]"#,
        )?;

        let output = run_document(&Config::default(), &schema, None, &records)?;
        assert_eq!(
            output,
            json!([{
                "id": "1",
                "name": "Ada",
                "created_at": 1714564800,
                "__soft_deleted": null,
                "role": "admin",
            }])
        );
        Ok(())
    }

    #[test]
    fn test_invalid_record() -> Result<()> {
        let temp = TempDir::new()?;
        let schema = temp.path().join("users.yaml");
        fs::write(&schema, "collection: users\nschema:\n  name: string\n")?;
        let records = temp.path().join("users.json");
        fs::write(&records, "42")?;

        assert!(run_document(&Config::default(), &schema, None, &records).is_err());
        Ok(())
    }
}

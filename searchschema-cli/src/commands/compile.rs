use super::load_declarations;
use anyhow::{Context, Result};
use searchschema::{Config, SchemaRegistry};
use std::path::Path;

/// Compiles declarations into collection schemas, keyed by collection name.
pub fn run_compile(
    config: &Config,
    path: Option<&Path>,
    collection: Option<&str>,
) -> Result<serde_json::Value> {
    let declarations = load_declarations(config, path, collection)?;
    let registry = SchemaRegistry::new();

    let mut output = serde_json::Map::new();
    for (name, record_type) in &declarations {
        let schema = registry
            .collection_schema(record_type)
            .with_context(|| format!("Failed to compile collection '{}'", name))?;
        output.insert(name.clone(), schema.to_json());
    }

    tracing::info!("Compiled {} collection schema(s)", output.len());
    Ok(serde_json::Value::Object(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_compile_directory() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(
            temp.path().join("posts.yaml"),
            "collection: posts\nschema:\n  title: string|searchable\n  views: int32\n  default_sorting_field: views\n",
        )?;

        let output = run_compile(&Config::default(), Some(temp.path()), None)?;
        assert_eq!(
            output,
            serde_json::json!({
                "posts": {
                    "fields": [
                        {"name": "title", "type": "string"},
                        {"name": "views", "type": "int32"},
                        {"name": "id", "type": "string"},
                    ],
                    "default_sorting_field": "views",
                }
            })
        );
        Ok(())
    }

    #[test]
    fn test_compile_unknown_collection() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("posts.yaml"), "collection: posts\nschema:\n  title: string\n")?;

        let err = run_compile(&Config::default(), Some(temp.path()), Some("users")).unwrap_err();
        assert!(err.to_string().contains("'users'"));
        Ok(())
    }
}

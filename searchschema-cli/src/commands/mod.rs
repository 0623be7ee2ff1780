pub mod compile;
pub mod document;
pub mod lint;
pub mod query_by;

pub use compile::run_compile;
pub use document::run_document;
pub use lint::run_lint;
pub use query_by::run_query_by;

use anyhow::{Context, Result};
use searchschema::schema::{DeclaredRecordType, SchemaLoader};
use searchschema::Config;
use std::collections::BTreeMap;
use std::path::Path;

/// Loads declarations from `path`, or from the configured schemas directory.
/// With `collection` set, only that declaration is kept.
pub fn load_declarations(
    config: &Config,
    path: Option<&Path>,
    collection: Option<&str>,
) -> Result<BTreeMap<String, DeclaredRecordType>> {
    let loader = SchemaLoader::from_config(config);
    let path = path.unwrap_or_else(|| loader.schemas_dir());

    let mut declarations = loader
        .load_path(path)
        .with_context(|| format!("Failed to load declarations from {:?}", path))?;

    if let Some(name) = collection {
        let declaration = declarations
            .remove(name)
            .with_context(|| format!("Collection '{}' is not declared in {:?}", name, path))?;
        declarations = BTreeMap::from([(name.to_string(), declaration)]);
    }

    tracing::debug!("Loaded {} declaration(s)", declarations.len());
    Ok(declarations)
}

pub fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

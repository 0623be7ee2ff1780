use super::load_declarations;
use anyhow::{Context, Result};
use searchschema::{Config, SchemaRegistry};
use std::path::Path;

/// Default query_by list of each declaration, in collection name order.
pub fn run_query_by(
    config: &Config,
    path: Option<&Path>,
    collection: Option<&str>,
) -> Result<Vec<(String, String)>> {
    let declarations = load_declarations(config, path, collection)?;
    let registry = SchemaRegistry::new();

    declarations
        .iter()
        .map(|(name, record_type)| {
            registry
                .query_by(record_type)
                .map(|query_by| (name.clone(), query_by))
                .with_context(|| format!("Failed to build query_by for '{}'", name))
        })
        .collect()
}

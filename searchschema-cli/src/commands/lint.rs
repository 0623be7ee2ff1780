use super::load_declarations;
use anyhow::Result;
use searchschema::schema::SchemaLoader;
use searchschema::{Config, SchemaRegistry};
use std::collections::BTreeMap;
use std::path::Path;

/// Lints declarations, returning collection -> problems for the invalid ones.
pub fn run_lint(config: &Config, path: Option<&Path>) -> Result<BTreeMap<String, Vec<String>>> {
    let declarations = load_declarations(config, path, None)?;
    let registry = SchemaRegistry::new();

    let issues = SchemaLoader::lint_all(&registry, &declarations);
    for (name, problems) in &issues {
        tracing::warn!("{} has {} problem(s)", name, problems.len());
    }
    tracing::info!(
        "Linted {} declaration(s), {} valid",
        declarations.len(),
        declarations.len() - issues.len()
    );
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lint_directory() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("ok.yaml"), "collection: ok\nschema:\n  title: string\n")?;
        fs::write(
            temp.path().join("dupe.yaml"),
            "collection: dupe\nschema:\n  title: [string, \"name:a\", {name: b}]\n",
        )?;

        let issues = run_lint(&Config::default(), Some(temp.path()))?;
        assert_eq!(issues.len(), 1);
        assert!(issues["dupe"][0].contains("must not be repeated"));
        Ok(())
    }
}

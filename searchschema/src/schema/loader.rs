//! Record type declarations stored as YAML files
//!
//! ```yaml
//! collection: users
//! primary_key: id
//! soft_delete: true
//! timestamps: [created_at]
//! schema:
//!   name: "string|searchable|infix:false"
//!   email: [string, "searchable:true", "locale:ja"]
//!   nickname: [string, {name: custom_name}, {token_separators: "@#"}]
//!   token_separators: "@#"
//! ```

use super::SchemaDeclaration;
use crate::cache::SchemaRegistry;
use crate::config::Config;
use crate::options::{FieldOption, OptionEntry, OptionValue};
use crate::record::{RecordType, DEFAULT_DELETED_AT, DEFAULT_PRIMARY_KEY};
use crate::{Error, Result};
use serde::Deserialize;
use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One declaration file as written on disk
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationFile {
    pub collection: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub soft_delete: bool,
    #[serde(default)]
    pub deleted_at: Option<String>,
    /// Record attributes read as timestamps from JSON records
    #[serde(default)]
    pub timestamps: Vec<String>,
    #[serde(default)]
    pub schema: Option<Yaml>,
}

/// A record type whose declaration comes from a YAML file
#[derive(Debug, Clone)]
pub struct DeclaredRecordType {
    name: String,
    primary_key: String,
    soft_delete: bool,
    deleted_at: String,
    timestamps: Vec<String>,
    schema: Option<Yaml>,
    source: Option<PathBuf>,
}

impl DeclaredRecordType {
    pub fn from_file(file: DeclarationFile, primary_key: &str, deleted_at: &str) -> Self {
        Self {
            name: file.collection,
            primary_key: file.primary_key.unwrap_or_else(|| primary_key.to_string()),
            soft_delete: file.soft_delete,
            deleted_at: file.deleted_at.unwrap_or_else(|| deleted_at.to_string()),
            timestamps: file.timestamps,
            schema: file.schema,
            source: None,
        }
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    /// File the declaration was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl RecordType for DeclaredRecordType {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_schema(&self) -> Result<SchemaDeclaration> {
        let schema = match &self.schema {
            None | Some(Yaml::Null) => {
                return Err(Error::SchemaNotDefined {
                    record: self.name.clone(),
                })
            }
            Some(Yaml::Mapping(mapping)) => mapping,
            Some(other) => {
                return Err(Error::SchemaNotAMapping {
                    record: self.name.clone(),
                    found: yaml_kind(other).to_string(),
                })
            }
        };

        let mut declaration = SchemaDeclaration::new();
        for (key, value) in schema {
            let field = scalar_text(key).ok_or_else(|| Error::SchemaNotAMapping {
                record: self.name.clone(),
                found: format!("a {} key", yaml_kind(key)),
            })?;
            let option = field_option(value).map_err(|reason| Error::InvalidOption {
                record: self.name.clone(),
                field: field.clone(),
                reason,
            })?;
            declaration.insert(field, option);
        }
        Ok(declaration)
    }

    fn primary_key_name(&self) -> &str {
        &self.primary_key
    }

    fn supports_soft_delete(&self) -> bool {
        self.soft_delete
    }

    fn deleted_at_attribute(&self) -> &str {
        &self.deleted_at
    }
}

fn field_option(value: &Yaml) -> std::result::Result<FieldOption, String> {
    match value {
        Yaml::Bool(b) => Ok(FieldOption::Flag(*b)),
        Yaml::String(_) | Yaml::Number(_) => Ok(FieldOption::Tokens(scalar_text(value).unwrap_or_default())),
        Yaml::Sequence(items) => {
            let mut entries = Vec::new();
            for item in items {
                match item {
                    Yaml::Mapping(mapping) => {
                        for (key, value) in mapping {
                            let key = scalar_text(key)
                                .ok_or_else(|| format!("option keys must be scalars, got {}", yaml_kind(key)))?;
                            entries.push(OptionEntry::Keyed(key, option_value(value)?));
                        }
                    }
                    other => entries.push(OptionEntry::Positional(option_value(other)?)),
                }
            }
            Ok(FieldOption::List(entries))
        }
        Yaml::Mapping(mapping) => {
            let mut entries = Vec::new();
            for (key, value) in mapping {
                let key = scalar_text(key)
                    .ok_or_else(|| format!("option keys must be scalars, got {}", yaml_kind(key)))?;
                entries.push(OptionEntry::Keyed(key, option_value(value)?));
            }
            Ok(FieldOption::List(entries))
        }
        other => Err(format!("expected a string, list or boolean, got {}", yaml_kind(other))),
    }
}

fn option_value(value: &Yaml) -> std::result::Result<OptionValue, String> {
    match value {
        Yaml::Bool(b) => Ok(OptionValue::Bool(*b)),
        Yaml::String(_) | Yaml::Number(_) => Ok(OptionValue::Str(scalar_text(value).unwrap_or_default())),
        Yaml::Sequence(items) => items
            .iter()
            .map(option_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(OptionValue::List),
        other => Err(format!("unsupported option value: {}", yaml_kind(other))),
    }
}

fn scalar_text(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn yaml_kind(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "list",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}

/// Loads declaration files from a directory
pub struct SchemaLoader {
    schemas_dir: PathBuf,
    primary_key: String,
    deleted_at: String,
}

impl SchemaLoader {
    pub fn new(schemas_dir: impl AsRef<Path>) -> Self {
        Self {
            schemas_dir: schemas_dir.as_ref().to_path_buf(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            deleted_at: DEFAULT_DELETED_AT.to_string(),
        }
    }

    /// Loader over the configured directory and record conventions
    pub fn from_config(config: &Config) -> Self {
        Self {
            schemas_dir: config.schemas.dir.clone(),
            primary_key: config.schemas.primary_key.clone(),
            deleted_at: config.schemas.deleted_at.clone(),
        }
    }

    pub fn schemas_dir(&self) -> &Path {
        &self.schemas_dir
    }

    /// Loads every `*.yaml` / `*.yml` file, keyed by collection name.
    pub fn load_all(&self) -> Result<BTreeMap<String, DeclaredRecordType>> {
        if !self.schemas_dir.exists() {
            return Err(Error::Config(format!(
                "Schemas directory does not exist: {}",
                self.schemas_dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.schemas_dir)? {
            let path = entry?.path();
            if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            ) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut record_types = BTreeMap::new();
        for path in paths {
            let record_type = self.load(&path)?;
            if let Some(previous) = record_types.insert(record_type.name.clone(), record_type) {
                tracing::warn!(
                    "Collection {} declared more than once, {:?} is overridden",
                    previous.name,
                    previous.source
                );
            }
        }

        tracing::debug!(
            "Loaded {} declarations from {}",
            record_types.len(),
            self.schemas_dir.display()
        );
        Ok(record_types)
    }

    pub fn load(&self, path: &Path) -> Result<DeclaredRecordType> {
        let content = fs::read_to_string(path)?;
        let file: DeclarationFile = serde_yaml::from_str(&content)?;
        let mut record_type = DeclaredRecordType::from_file(file, &self.primary_key, &self.deleted_at);
        record_type.source = Some(path.to_path_buf());
        Ok(record_type)
    }

    /// Loads a single file, or every declaration of a directory.
    pub fn load_path(&self, path: &Path) -> Result<BTreeMap<String, DeclaredRecordType>> {
        if path.is_dir() {
            let loader = SchemaLoader {
                schemas_dir: path.to_path_buf(),
                primary_key: self.primary_key.clone(),
                deleted_at: self.deleted_at.clone(),
            };
            return loader.load_all();
        }
        let record_type = self.load(path)?;
        Ok(BTreeMap::from([(record_type.name.clone(), record_type)]))
    }

    /// Lint a single declaration and return a list of human-readable issues (empty = ok)
    pub fn lint(registry: &SchemaRegistry, record_type: &dyn RecordType) -> Vec<String> {
        let mut issues = Vec::new();
        match registry.resolve(record_type) {
            Ok(_) => {
                if let Err(e) = registry.query_by(record_type) {
                    issues.push(e.to_string());
                }
            }
            Err(e) => issues.push(e.to_string()),
        }
        issues
    }

    /// Lint all loaded declarations and return map collection -> issues
    pub fn lint_all(
        registry: &SchemaRegistry,
        record_types: &BTreeMap<String, DeclaredRecordType>,
    ) -> BTreeMap<String, Vec<String>> {
        let mut map = BTreeMap::new();
        for (name, record_type) in record_types {
            let issues = SchemaLoader::lint(registry, record_type);
            if !issues.is_empty() {
                map.insert(name.clone(), issues);
            }
        }
        map
    }
}

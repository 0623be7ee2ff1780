//! Boundary with the record / model layer
//!
//! A [`RecordType`] describes a kind of record (its declared schema, primary
//! key and soft-delete convention). A [`Record`] is one instance of it.

use crate::schema::SchemaDeclaration;
use crate::value::Value;
use crate::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

pub const DEFAULT_PRIMARY_KEY: &str = "id";
pub const DEFAULT_DELETED_AT: &str = "deleted_at";

/// A kind of searchable record.
///
/// The name identifies the record type in the schema cache and in error messages.
pub trait RecordType: Send + Sync {
    fn name(&self) -> &str;

    /// The field declaration. The default implementation reports a missing declaration.
    fn declared_schema(&self) -> Result<SchemaDeclaration> {
        Err(Error::SchemaNotDefined {
            record: self.name().to_string(),
        })
    }

    fn primary_key_name(&self) -> &str {
        DEFAULT_PRIMARY_KEY
    }

    fn supports_soft_delete(&self) -> bool {
        false
    }

    fn deleted_at_attribute(&self) -> &str {
        DEFAULT_DELETED_AT
    }
}

/// One record instance.
pub trait Record {
    /// Direct attribute read, `Value::Null` when absent.
    fn attribute(&self, name: &str) -> Value;

    fn primary_key_value(&self) -> Value;

    /// Every native attribute of the record.
    fn attributes(&self) -> Vec<(String, Value)>;
}

/// A record backed by a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    primary_key: String,
    attributes: BTreeMap<String, Value>,
}

impl JsonRecord {
    pub fn new(primary_key: impl Into<String>, attributes: BTreeMap<String, Value>) -> Self {
        Self {
            primary_key: primary_key.into(),
            attributes,
        }
    }

    /// Builds a record from a JSON object.
    ///
    /// Attributes listed in `timestamps` are read as RFC 3339 strings or unix
    /// seconds and become [`Value::Timestamp`]; nulls stay null.
    pub fn from_json(
        json: serde_json::Value,
        primary_key: &str,
        timestamps: &[String],
    ) -> Result<Self> {
        let object = match json {
            serde_json::Value::Object(object) => object,
            other => {
                return Err(Error::InvalidRecord(format!(
                    "record must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut attributes = BTreeMap::new();
        for (name, value) in object {
            let value = if timestamps.iter().any(|t| t == &name) {
                parse_timestamp(&name, value)?
            } else {
                Value::from(value)
            };
            attributes.insert(name, value);
        }

        Ok(Self::new(primary_key, attributes))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }
}

impl Record for JsonRecord {
    fn attribute(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or(Value::Null)
    }

    fn primary_key_value(&self) -> Value {
        self.attribute(&self.primary_key)
    }

    fn attributes(&self) -> Vec<(String, Value)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

fn parse_timestamp(name: &str, value: serde_json::Value) -> Result<Value> {
    let parsed: Option<DateTime<Utc>> = match &value {
        serde_json::Value::Null => return Ok(Value::Null),
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        _ => None,
    };

    parsed.map(Value::Timestamp).ok_or_else(|| {
        Error::InvalidRecord(format!(
            "attribute `{}` must be an RFC 3339 timestamp or unix seconds, got {}",
            name, value
        ))
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

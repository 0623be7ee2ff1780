//! Schema registry
//!
//! Owns the resolved schema of every record type and the resolution of every
//! declared field. A miss resolves without holding a lock and publishes the
//! result; concurrent misses may resolve twice but all readers observe the
//! first published value.

mod stats;

pub use stats::CacheStats;

use crate::caster::{to_searchable_document, Document};
use crate::options::Normalized;
use crate::record::{Record, RecordType};
use crate::schema::{
    assemble_with, query_by, resolve_field, CollectionSchema, ResolvedField, ResolvedSchema,
};
use crate::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type FieldKey = (String, String);

/// Process-wide cache of resolved schemas, shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<ResolvedSchema>>>,
    fields: RwLock<HashMap<FieldKey, Arc<ResolvedField>>>,
    schema_stats: CacheStats,
    field_stats: CacheStats,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved schema of `record_type`, built on first access.
    pub fn resolve(&self, record_type: &dyn RecordType) -> Result<Arc<ResolvedSchema>> {
        let name = record_type.name();

        if let Some(schema) = self.schemas.read().get(name) {
            self.schema_stats.hit();
            tracing::debug!("Schema cache hit for {}", name);
            return Ok(Arc::clone(schema));
        }

        self.schema_stats.miss();
        tracing::debug!("Schema cache miss for {}, resolving", name);

        let schema = assemble_with(record_type, |field, options| {
            self.resolve_field(name, field, options)
        })?;

        let mut schemas = self.schemas.write();
        let published = schemas
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(schema));
        Ok(Arc::clone(published))
    }

    /// Resolution of one field, cached per `(record, field)`.
    pub fn resolve_field(
        &self,
        record: &str,
        field: &str,
        options: &Normalized,
    ) -> Result<Arc<ResolvedField>> {
        let key = (record.to_string(), field.to_string());

        if let Some(resolved) = self.fields.read().get(&key) {
            self.field_stats.hit();
            return Ok(Arc::clone(resolved));
        }

        self.field_stats.miss();
        let resolved = Arc::new(resolve_field(record, field, options)?);

        let mut fields = self.fields.write();
        Ok(Arc::clone(fields.entry(key).or_insert(resolved)))
    }

    pub fn collection_schema(&self, record_type: &dyn RecordType) -> Result<CollectionSchema> {
        Ok(self.resolve(record_type)?.collection_schema())
    }

    pub fn query_by(&self, record_type: &dyn RecordType) -> Result<String> {
        let schema = self.resolve(record_type)?;
        query_by(&schema)
    }

    pub fn to_searchable_document(
        &self,
        record_type: &dyn RecordType,
        record: &dyn Record,
    ) -> Result<Document> {
        let schema = self.resolve(record_type)?;
        Ok(to_searchable_document(&schema, record))
    }

    /// Resolves eagerly so declaration errors surface at startup.
    pub fn warm(&self, record_type: &dyn RecordType) -> Result<()> {
        let schema = self.resolve(record_type)?;
        query_by(&schema)?;
        tracing::info!(
            "Schema for {} ready ({} fields)",
            record_type.name(),
            schema.fields().len()
        );
        tracing::debug!(
            "Registry holds {} schemas, hit rate {:.2} over {} lookups",
            self.len(),
            self.schema_stats.hit_rate(),
            self.schema_stats.total_requests()
        );
        Ok(())
    }

    /// Drops the cached schema and field resolutions of one record type.
    pub fn invalidate(&self, record: &str) {
        let removed = self.schemas.write().remove(record).is_some();
        self.fields.write().retain(|(owner, _), _| owner != record);
        if removed {
            self.schema_stats.invalidate();
            tracing::debug!("Invalidated schema for {}", record);
        }
    }

    pub fn clear(&self) {
        let count = {
            let mut schemas = self.schemas.write();
            let count = schemas.len();
            schemas.clear();
            count
        };
        self.fields.write().clear();
        for _ in 0..count {
            self.schema_stats.invalidate();
        }
        tracing::debug!("Cleared {} cached schemas", count);
    }

    pub fn is_cached(&self, record: &str) -> bool {
        self.schemas.read().contains_key(record)
    }

    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.schema_stats
    }

    pub fn field_stats(&self) -> &CacheStats {
        &self.field_stats
    }
}

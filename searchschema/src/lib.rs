//! Compiles a compact per-field declaration DSL into search collection
//! schemas, default `query_by` lists and typed searchable documents.

pub mod cache;
pub mod caster;
pub mod config;
pub mod error;
pub mod options;
pub mod record;
pub mod schema;
pub mod value;
pub mod vocabulary;

pub use cache::SchemaRegistry;
pub use caster::{cast_field_value, to_searchable_document, Document};
pub use config::Config;
pub use error::{Error, Result};
pub use options::FieldOption;
pub use record::{JsonRecord, Record, RecordType};
pub use schema::{CollectionSchema, ResolvedSchema, SchemaDeclaration};
pub use value::Value;
pub use vocabulary::{FieldModifier, FieldParameter, FieldType, SchemaParameter};

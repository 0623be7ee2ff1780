//! Schema declaration, resolution and assembly

mod assembler;
mod declaration;
pub mod loader;
mod query_by;
pub mod resolver;

pub use assembler::{assemble, assemble_with, CollectionSchema, ResolvedSchema, SOFT_DELETED_FIELD};
pub use declaration::SchemaDeclaration;
pub use loader::{DeclarationFile, DeclaredRecordType, SchemaLoader};
pub use query_by::query_by;
pub use resolver::{
    resolve_field, FieldDescriptor, FieldModifiers, FieldValueSource, FieldValueTransform,
    ResolvedField,
};

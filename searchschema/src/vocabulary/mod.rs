//! Closed vocabularies of the field DSL
//!
//! Each enumeration is a pure set of identities: membership tests and name
//! lookups never validate anything. Per-identity validation lives in
//! [`validate`], casting in [`crate::caster`].

pub mod validate;

use serde::{Serialize, Serializer};
use std::fmt;

/// Search engine field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Infers the type from the indexed documents
    Auto,
    String,
    StringArray,
    /// Converts values to `string` or `string[]`
    StringAuto,
    Int32,
    Int32Array,
    Int64,
    Int64Array,
    Float,
    FloatArray,
    Bool,
    BoolArray,
    /// `[lat, lng]`
    GeoPoint,
    GeoPointArray,
    /// `[lat1, lng1, lat2, lng2, ...]`
    GeoPolygon,
    Object,
    ObjectArray,
    /// Base64 encoded image used for image search
    Image,
}

impl FieldType {
    pub const ALL: [FieldType; 18] = [
        FieldType::Auto,
        FieldType::String,
        FieldType::StringArray,
        FieldType::StringAuto,
        FieldType::Int32,
        FieldType::Int32Array,
        FieldType::Int64,
        FieldType::Int64Array,
        FieldType::Float,
        FieldType::FloatArray,
        FieldType::Bool,
        FieldType::BoolArray,
        FieldType::GeoPoint,
        FieldType::GeoPointArray,
        FieldType::GeoPolygon,
        FieldType::Object,
        FieldType::ObjectArray,
        FieldType::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Auto => "auto",
            FieldType::String => "string",
            FieldType::StringArray => "string[]",
            FieldType::StringAuto => "string*",
            FieldType::Int32 => "int32",
            FieldType::Int32Array => "int32[]",
            FieldType::Int64 => "int64",
            FieldType::Int64Array => "int64[]",
            FieldType::Float => "float",
            FieldType::FloatArray => "float[]",
            FieldType::Bool => "bool",
            FieldType::BoolArray => "bool[]",
            FieldType::GeoPoint => "geopoint",
            FieldType::GeoPointArray => "geopoint[]",
            FieldType::GeoPolygon => "geopolygon",
            FieldType::Object => "object",
            FieldType::ObjectArray => "object[]",
            FieldType::Image => "image",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn is_member(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    /// Whether the type may appear in the default `query_by` list.
    pub fn is_queryable(&self) -> bool {
        matches!(
            self,
            FieldType::String
                | FieldType::StringArray
                | FieldType::StringAuto
                | FieldType::Object
                | FieldType::ObjectArray
        )
    }

    /// Whether the type may be used as `default_sorting_field`.
    pub fn is_sortable(&self) -> bool {
        matches!(self, FieldType::Int32 | FieldType::Float)
    }
}

/// Boolean field switches. Every one accepts `name`, `name:true` or `name:false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldParameter {
    /// Puts the field in the default `query_by` list; never emitted in the schema
    Searchable,
    Excluded,
    Optional,
    Store,
    Sort,
    Facet,
    Index,
    Infix,
    Stem,
}

impl FieldParameter {
    pub const ALL: [FieldParameter; 9] = [
        FieldParameter::Searchable,
        FieldParameter::Excluded,
        FieldParameter::Optional,
        FieldParameter::Store,
        FieldParameter::Sort,
        FieldParameter::Facet,
        FieldParameter::Index,
        FieldParameter::Infix,
        FieldParameter::Stem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldParameter::Searchable => "searchable",
            FieldParameter::Excluded => "excluded",
            FieldParameter::Optional => "optional",
            FieldParameter::Store => "store",
            FieldParameter::Sort => "sort",
            FieldParameter::Facet => "facet",
            FieldParameter::Index => "index",
            FieldParameter::Infix => "infix",
            FieldParameter::Stem => "stem",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    pub fn is_member(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    /// Pseudo-parameters drive this crate only and are left out of the emitted schema.
    pub fn is_emitted(&self) -> bool {
        !matches!(self, FieldParameter::Searchable)
    }
}

/// Non-boolean per-field overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldModifier {
    /// Output name of the field. Default: the declared field name
    Name,
    Locale,
    TokenSeparators,
    SymbolsToIndex,
    /// Callback applied to the resolved value before casting
    TransformTo,
    /// Callback or constant replacing the direct attribute lookup
    ValueFrom,
}

impl FieldModifier {
    pub const ALL: [FieldModifier; 6] = [
        FieldModifier::Name,
        FieldModifier::Locale,
        FieldModifier::TokenSeparators,
        FieldModifier::SymbolsToIndex,
        FieldModifier::TransformTo,
        FieldModifier::ValueFrom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldModifier::Name => "name",
            FieldModifier::Locale => "locale",
            FieldModifier::TokenSeparators => "token_separators",
            FieldModifier::SymbolsToIndex => "symbols_to_index",
            FieldModifier::TransformTo => "transformTo",
            FieldModifier::ValueFrom => "valueFrom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    pub fn is_member(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

/// Collection-wide settings declared next to the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaParameter {
    TokenSeparators,
    SymbolsToIndex,
    /// Only `int32` or `float` fields
    DefaultSortingField,
    EnableNestedFields,
}

impl SchemaParameter {
    pub const ALL: [SchemaParameter; 4] = [
        SchemaParameter::TokenSeparators,
        SchemaParameter::SymbolsToIndex,
        SchemaParameter::DefaultSortingField,
        SchemaParameter::EnableNestedFields,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaParameter::TokenSeparators => "token_separators",
            SchemaParameter::SymbolsToIndex => "symbols_to_index",
            SchemaParameter::DefaultSortingField => "default_sorting_field",
            SchemaParameter::EnableNestedFields => "enable_nested_fields",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    pub fn is_member(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FieldParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FieldModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SchemaParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

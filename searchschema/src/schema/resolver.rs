//! Per-field resolution: type, modifiers and parameters

use crate::options::{chars_to_array, Normalized, OptionKey, OptionMap, OptionValue, TransformFn, ValueFromFn};
use crate::value::Value;
use crate::vocabulary::{FieldModifier, FieldParameter, FieldType};
use crate::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Where the raw value of a field comes from.
#[derive(Clone)]
pub enum FieldValueSource {
    /// Direct attribute read
    Attribute(String),
    /// Non-callback `valueFrom`
    Constant(Value),
    /// `valueFrom` callback over the record
    Computed(ValueFromFn),
}

/// What happens to the raw value before casting.
#[derive(Clone, Default)]
pub enum FieldValueTransform {
    #[default]
    Identity,
    Custom(TransformFn),
}

impl FieldValueTransform {
    pub fn is_identity(&self) -> bool {
        matches!(self, FieldValueTransform::Identity)
    }
}

impl fmt::Debug for FieldValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValueSource::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            FieldValueSource::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            FieldValueSource::Computed(_) => f.write_str("Computed(<callback>)"),
        }
    }
}

impl fmt::Debug for FieldValueTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValueTransform::Identity => f.write_str("Identity"),
            FieldValueTransform::Custom(_) => f.write_str("Custom(<callback>)"),
        }
    }
}

/// Resolved modifiers of one field.
#[derive(Debug, Clone)]
pub struct FieldModifiers {
    pub name: Option<String>,
    pub locale: Option<String>,
    pub token_separators: Option<Vec<String>>,
    pub symbols_to_index: Option<Vec<String>>,
    pub transform: FieldValueTransform,
    pub source: FieldValueSource,
}

impl FieldModifiers {
    fn new(field: &str) -> Self {
        Self {
            name: None,
            locale: None,
            token_separators: None,
            symbols_to_index: None,
            transform: FieldValueTransform::Identity,
            source: FieldValueSource::Attribute(field.to_string()),
        }
    }
}

/// A fully resolved field.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub declared_name: String,
    pub field_type: FieldType,
    pub modifiers: FieldModifiers,
    /// Parameters in declaration order, `searchable` included
    pub parameters: Vec<(FieldParameter, bool)>,
}

impl ResolvedField {
    /// Name used in the collection schema and in documents.
    pub fn output_name(&self) -> &str {
        self.modifiers.name.as_deref().unwrap_or(&self.declared_name)
    }

    pub fn parameter(&self, parameter: FieldParameter) -> Option<bool> {
        self.parameters
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, v)| *v)
    }

    pub fn is_searchable(&self) -> bool {
        self.parameter(FieldParameter::Searchable).unwrap_or(false)
    }

    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.output_name().to_string(),
            field_type: self.field_type,
            locale: self.modifiers.locale.clone(),
            token_separators: self.modifiers.token_separators.clone(),
            symbols_to_index: self.modifiers.symbols_to_index.clone(),
            parameters: self
                .parameters
                .iter()
                .filter(|(p, _)| p.is_emitted())
                .copied()
                .collect(),
        }
    }
}

/// One entry of the emitted `fields` list.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub locale: Option<String>,
    pub token_separators: Option<Vec<String>>,
    pub symbols_to_index: Option<Vec<String>>,
    pub parameters: Vec<(FieldParameter, bool)>,
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("type", &self.field_type)?;
        if let Some(locale) = &self.locale {
            map.serialize_entry("locale", locale)?;
        }
        if let Some(separators) = &self.token_separators {
            map.serialize_entry("token_separators", separators)?;
        }
        if let Some(symbols) = &self.symbols_to_index {
            map.serialize_entry("symbols_to_index", symbols)?;
        }
        for (parameter, value) in &self.parameters {
            map.serialize_entry(parameter.as_str(), value)?;
        }
        map.end()
    }
}

/// Resolves one declared field of `record`.
pub fn resolve_field(record: &str, field: &str, options: &Normalized) -> Result<ResolvedField> {
    let empty = OptionMap::new();
    let map = options.options().unwrap_or(&empty);

    let field_type = resolve_type(record, field, map)?;
    let modifiers = resolve_modifiers(record, field, map)?;
    let parameters = resolve_parameters(record, field, map)?;
    warn_unrecognized(record, field, map);

    tracing::debug!(
        "Resolved {}.{} as {} ({} parameters)",
        record,
        field,
        field_type,
        parameters.len()
    );

    Ok(ResolvedField {
        declared_name: field.to_string(),
        field_type,
        modifiers,
        parameters,
    })
}

/// Exactly one option value must name a field type. Entries keyed by a
/// modifier or parameter name never count.
pub fn resolve_type(record: &str, field: &str, map: &OptionMap) -> Result<FieldType> {
    let types: Vec<FieldType> = map
        .iter()
        .filter(|(key, _)| !is_reserved_key(key))
        .filter_map(|(_, value)| value.as_str().and_then(FieldType::from_name))
        .collect();

    match types.as_slice() {
        [field_type] => Ok(*field_type),
        _ => Err(Error::ExactlyOneType {
            record: record.to_string(),
            field: field.to_string(),
            found: types.len(),
        }),
    }
}

pub fn resolve_modifiers(record: &str, field: &str, map: &OptionMap) -> Result<FieldModifiers> {
    let mut modifiers = FieldModifiers::new(field);
    let mut seen = HashSet::new();

    for (key, value) in map.iter() {
        let Some(modifier) = key.name().and_then(FieldModifier::from_name) else {
            continue;
        };
        if !seen.insert(modifier) {
            return Err(Error::ModifierDuplicated {
                record: record.to_string(),
                field: field.to_string(),
                modifier,
            });
        }

        let invalid = |expected: &'static str| Error::ModifierInvalidValue {
            record: record.to_string(),
            field: field.to_string(),
            modifier,
            expected,
        };
        let not_a_callback = |expected: &'static str| Error::ModifierMustBeCallback {
            record: record.to_string(),
            field: field.to_string(),
            modifier,
            expected,
        };

        match modifier {
            FieldModifier::Name => {
                let name = value.as_str().filter(|s| !s.is_empty());
                modifiers.name = Some(name.ok_or_else(|| invalid("a non-empty string"))?.to_string());
            }
            FieldModifier::Locale => {
                modifiers.locale = Some(value.as_str().ok_or_else(|| invalid("a string"))?.to_string());
            }
            FieldModifier::TokenSeparators => {
                modifiers.token_separators =
                    Some(chars_to_array(value).ok_or_else(|| invalid("a string or a list of characters"))?);
            }
            FieldModifier::SymbolsToIndex => {
                modifiers.symbols_to_index =
                    Some(chars_to_array(value).ok_or_else(|| invalid("a string or a list of characters"))?);
            }
            FieldModifier::TransformTo => match value {
                OptionValue::Transform(f) => modifiers.transform = FieldValueTransform::Custom(f.clone()),
                _ => return Err(not_a_callback("value transforming")),
            },
            FieldModifier::ValueFrom => match value {
                OptionValue::ValueFrom(f) => modifiers.source = FieldValueSource::Computed(f.clone()),
                OptionValue::Transform(_) => return Err(not_a_callback("record")),
                literal => modifiers.source = FieldValueSource::Constant(literal.to_value()),
            },
        }
    }

    Ok(modifiers)
}

/// Keyed parameters are parsed as booleans, bare parameter tokens resolve to `true`.
pub fn resolve_parameters(
    record: &str,
    field: &str,
    map: &OptionMap,
) -> Result<Vec<(FieldParameter, bool)>> {
    let mut parameters: Vec<(FieldParameter, bool)> = Vec::new();

    for (key, value) in map.iter() {
        let resolved = match key {
            OptionKey::Name(name) => match FieldParameter::from_name(name) {
                Some(parameter) => (parameter, parameter.parse(value, record, field)?),
                None => continue,
            },
            OptionKey::Index(_) => match value.as_str().and_then(FieldParameter::from_name) {
                Some(parameter) => (parameter, true),
                None => continue,
            },
        };

        if parameters.iter().any(|(p, _)| *p == resolved.0) {
            return Err(Error::ParameterDuplicated {
                record: record.to_string(),
                field: field.to_string(),
                parameter: resolved.0,
            });
        }
        parameters.push(resolved);
    }

    Ok(parameters)
}

fn is_reserved_key(key: &OptionKey) -> bool {
    key.name()
        .is_some_and(|name| FieldModifier::is_member(name) || FieldParameter::is_member(name))
}

fn warn_unrecognized(record: &str, field: &str, map: &OptionMap) {
    for (key, value) in map.iter() {
        let recognized = match key {
            OptionKey::Name(_) if is_reserved_key(key) => true,
            OptionKey::Name(_) => value.as_str().is_some_and(FieldType::is_member),
            OptionKey::Index(_) => value
                .as_str()
                .is_some_and(|s| FieldType::is_member(s) || FieldParameter::is_member(s)),
        };
        if !recognized {
            tracing::warn!(
                "{}.{}: ignoring unrecognized field option {:?} = {}",
                record,
                field,
                key,
                value.describe()
            );
        }
    }
}

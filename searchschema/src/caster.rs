//! Per-record value casting and searchable document building

use crate::record::Record;
use crate::schema::{FieldValueSource, FieldValueTransform, ResolvedField, ResolvedSchema};
use crate::value::Value;
use crate::vocabulary::FieldType;

/// A searchable document, keyed by output field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

impl FieldType {
    /// Casts a value to this field type.
    ///
    /// `Null` becomes `""` for string types and `[]` for array types. Numeric,
    /// bool and structure types keep `Null`, so optional fields stay empty.
    pub fn cast(&self, value: Value) -> Value {
        if value.is_null() {
            return self.cast_null();
        }
        match self {
            FieldType::Auto | FieldType::StringAuto => value,
            FieldType::String | FieldType::Image => stringify(value),
            FieldType::StringArray => each(value.wrap(), stringify),
            FieldType::Int32 | FieldType::Int64 => to_int(value),
            FieldType::Int32Array | FieldType::Int64Array => each(value.wrap(), to_int),
            FieldType::Float => to_float(value),
            FieldType::FloatArray => each(value.wrap(), to_float),
            FieldType::Bool => to_bool(value),
            FieldType::BoolArray => each(value.wrap(), to_bool),
            FieldType::Object | FieldType::GeoPoint => to_structure(value),
            FieldType::GeoPolygon | FieldType::GeoPointArray | FieldType::ObjectArray => {
                each(value.wrap(), to_structure)
            }
        }
    }

    fn cast_null(&self) -> Value {
        match self {
            FieldType::String | FieldType::Image => Value::String(String::new()),
            FieldType::StringArray
            | FieldType::Int32Array
            | FieldType::Int64Array
            | FieldType::FloatArray
            | FieldType::BoolArray
            | FieldType::GeoPolygon
            | FieldType::GeoPointArray
            | FieldType::ObjectArray => Value::Array(Vec::new()),
            _ => Value::Null,
        }
    }
}

/// Produces the cast value of one field for `record`.
///
/// The raw value comes from `source`. Without a transform, timestamps headed
/// for `int32`, `int64` or `auto` fields are coerced to unix seconds first.
pub fn cast_field_value(
    record: &dyn Record,
    field_name: &str,
    field_type: FieldType,
    transform: &FieldValueTransform,
    source: &FieldValueSource,
) -> Value {
    let raw = match source {
        FieldValueSource::Computed(value_from) => value_from(record),
        FieldValueSource::Constant(value) => value.clone(),
        FieldValueSource::Attribute(name) => record.attribute(name),
    };

    let raw = match transform {
        FieldValueTransform::Custom(transform) => transform(raw),
        FieldValueTransform::Identity => match (field_type, raw) {
            (FieldType::Int32 | FieldType::Int64 | FieldType::Auto, Value::Timestamp(ts)) => {
                Value::Int(ts.timestamp())
            }
            (_, raw) => raw,
        },
    };

    let value = field_type.cast(raw);
    tracing::trace!("Cast {} as {}: {:?}", field_name, field_type, value);
    value
}

impl ResolvedField {
    pub fn cast_value(&self, record: &dyn Record) -> Value {
        cast_field_value(
            record,
            &self.declared_name,
            self.field_type,
            &self.modifiers.transform,
            &self.modifiers.source,
        )
    }
}

/// Builds the document pushed to the search engine.
///
/// Native attributes named like a declared field are dropped, then every field's
/// cast value is added under its output name.
pub fn to_searchable_document(schema: &ResolvedSchema, record: &dyn Record) -> Document {
    let mut document = Document::new();
    for (name, value) in record.attributes() {
        if schema.field(&name).is_none() {
            document.insert(name, value.to_json());
        }
    }
    for field in schema.fields() {
        document.insert(field.output_name().to_string(), field.cast_value(record).to_json());
    }
    document
}

fn each(value: Value, cast: fn(Value) -> Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(cast).collect()),
        other => cast(other),
    }
}

fn stringify(value: Value) -> Value {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        other => match other.to_json() {
            serde_json::Value::String(s) => s,
            json => json.to_string(),
        },
    };
    Value::String(text)
}

fn to_int(value: Value) -> Value {
    let int = match value {
        Value::Null => return Value::Null,
        Value::Bool(b) => i64::from(b),
        Value::Int(i) => i,
        Value::Float(f) => f as i64,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Value::Timestamp(ts) => ts.timestamp(),
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
    };
    Value::Int(int)
}

fn to_float(value: Value) -> Value {
    let float = match value {
        Value::Null => return Value::Null,
        Value::Bool(b) => f64::from(u8::from(b)),
        Value::Int(i) => i as f64,
        Value::Float(f) => f,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Timestamp(ts) => ts.timestamp() as f64,
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(map) => f64::from(u8::from(!map.is_empty())),
    };
    Value::Float(float)
}

fn to_bool(value: Value) -> Value {
    let truthy = match value {
        Value::Null => return Value::Null,
        Value::Bool(b) => b,
        Value::Int(i) => i != 0,
        Value::Float(f) => f != 0.0,
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Timestamp(_) => true,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    };
    Value::Bool(truthy)
}

fn to_structure(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Array(_) | Value::Object(_) => value,
        scalar => Value::Array(vec![scalar]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::JsonRecord;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn timestamp() -> Value {
        Value::Timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_string_casts() {
        assert_eq!(FieldType::String.cast(Value::Int(42)), Value::from("42"));
        assert_eq!(FieldType::String.cast(Value::Bool(true)), Value::from("true"));
        assert_eq!(FieldType::String.cast(Value::Float(1.5)), Value::from("1.5"));
        assert_eq!(FieldType::Image.cast(timestamp()), Value::from("2024-05-01T12:00:00Z"));
        assert_eq!(
            FieldType::StringArray.cast(Value::Int(3)),
            Value::Array(vec![Value::from("3")])
        );
        assert_eq!(
            FieldType::StringArray.cast(Value::from(vec![Value::Int(1), Value::from("a")])),
            Value::from(vec![Value::from("1"), Value::from("a")])
        );
        assert_eq!(
            FieldType::StringArray.cast(Value::from(vec![Value::Null, Value::from("a")])),
            Value::from(vec![Value::from(""), Value::from("a")])
        );
    }

    #[test]
    fn test_numeric_casts() {
        assert_eq!(FieldType::Int32.cast(Value::from("17")), Value::Int(17));
        assert_eq!(FieldType::Int64.cast(Value::from("2.9")), Value::Int(2));
        assert_eq!(FieldType::Int64.cast(Value::from("abc")), Value::Int(0));
        assert_eq!(FieldType::Int32.cast(Value::Bool(true)), Value::Int(1));
        assert_eq!(FieldType::Float.cast(Value::Int(2)), Value::Float(2.0));
        assert_eq!(
            FieldType::Int32Array.cast(Value::from(vec!["1", "2"])),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            FieldType::FloatArray.cast(Value::Float(0.5)),
            Value::Array(vec![Value::Float(0.5)])
        );
    }

    #[test]
    fn test_bool_casts() {
        assert_eq!(FieldType::Bool.cast(Value::from("0")), Value::Bool(false));
        assert_eq!(FieldType::Bool.cast(Value::from("no")), Value::Bool(true));
        assert_eq!(FieldType::Bool.cast(Value::Int(0)), Value::Bool(false));
        assert_eq!(
            FieldType::BoolArray.cast(Value::from(vec![Value::Int(1), Value::from("")])),
            Value::Array(vec![Value::Bool(true), Value::Bool(false)])
        );
    }

    #[test]
    fn test_structure_casts() {
        let point = Value::from(vec![Value::Float(48.85), Value::Float(2.35)]);
        assert_eq!(FieldType::GeoPoint.cast(point.clone()), point);
        assert_eq!(
            FieldType::GeoPoint.cast(Value::Float(1.0)),
            Value::Array(vec![Value::Float(1.0)])
        );

        let object = Value::Object(BTreeMap::from([("a".to_string(), Value::Int(1))]));
        assert_eq!(FieldType::Object.cast(object.clone()), object);
        assert_eq!(
            FieldType::ObjectArray.cast(object.clone()),
            Value::Array(vec![object])
        );
    }

    #[test]
    fn test_passthrough_types() {
        assert_eq!(FieldType::Auto.cast(timestamp()), timestamp());
        assert_eq!(FieldType::StringAuto.cast(Value::Int(1)), Value::Int(1));
    }

    #[test]
    fn test_null_casts() {
        assert_eq!(FieldType::String.cast(Value::Null), Value::from(""));
        assert_eq!(FieldType::Image.cast(Value::Null), Value::from(""));
        for field_type in [FieldType::StringArray, FieldType::Int64Array, FieldType::ObjectArray] {
            assert_eq!(field_type.cast(Value::Null), Value::Array(vec![]), "{field_type}");
        }
        for field_type in [
            FieldType::Auto,
            FieldType::StringAuto,
            FieldType::Int32,
            FieldType::Float,
            FieldType::Bool,
            FieldType::Object,
            FieldType::GeoPoint,
        ] {
            assert_eq!(field_type.cast(Value::Null), Value::Null, "{field_type}");
        }
    }

    #[test]
    fn test_implicit_timestamp_coercion() {
        let mut record = JsonRecord::new("id", BTreeMap::new());
        record.set("created_at", timestamp());
        let source = FieldValueSource::Attribute("created_at".to_string());

        for field_type in [FieldType::Int32, FieldType::Int64, FieldType::Auto] {
            let value = cast_field_value(
                &record,
                "created_at",
                field_type,
                &FieldValueTransform::Identity,
                &source,
            );
            assert_eq!(value, Value::Int(1714564800), "{field_type}");
        }
    }

    #[test]
    fn test_transform_bypasses_timestamp_coercion() {
        let mut record = JsonRecord::new("id", BTreeMap::new());
        record.set("created_at", timestamp());
        let source = FieldValueSource::Attribute("created_at".to_string());
        let identity = FieldValueTransform::Custom(Arc::new(|v: Value| v));

        let value = cast_field_value(&record, "created_at", FieldType::Auto, &identity, &source);
        assert_eq!(value, timestamp());
    }

    #[test]
    fn test_sources() {
        let record = JsonRecord::from_json(json!({"id": 5, "title": "x"}), "id", &[]).unwrap();
        let computed = FieldValueSource::Computed(Arc::new(|r: &dyn Record| r.primary_key_value()));
        let constant = FieldValueSource::Constant(Value::from("fixed"));
        let identity = FieldValueTransform::Identity;

        assert_eq!(
            cast_field_value(&record, "id", FieldType::String, &identity, &computed),
            Value::from("5")
        );
        assert_eq!(
            cast_field_value(&record, "title", FieldType::String, &identity, &constant),
            Value::from("fixed")
        );
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use uuid::Uuid;

use crate::types::{ScalarKind, TypeRef};

/// Dynamically typed value produced by population.
///
/// Serializes to plain JSON: enums as their constant name, decimals and
/// temporal values as strings, maps and records as JSON objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Text(String),
    Uuid(Uuid),
    Instant(DateTime<Utc>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    OffsetDateTime(DateTime<FixedOffset>),
    Enum { type_name: String, constant: String },
    List(Vec<Value>),
    /// Entries in insertion order; keys are unique.
    Map(Vec<(Value, Value)>),
    Object(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::Instant(_) => "instant",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::OffsetDateTime(_) => "offset_datetime",
            Value::Enum { .. } => "enum",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(i64::from(*value)),
            Value::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(f64::from(*value)),
            Value::Long(value) => Some(*value as f64),
            Value::Float(value) => Some(f64::from(*value)),
            Value::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            Value::Enum { constant, .. } => Some(constant.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Structural check of this value against a declared type.
    ///
    /// `Null` only conforms to `Optional` types. Named types match enum
    /// values and records carrying the same type name.
    pub fn conforms_to(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Optional(inner) => self.is_null() || self.conforms_to(inner),
            TypeRef::Scalar(kind) => self.matches_scalar(*kind),
            TypeRef::List(element) => match self {
                Value::List(items) => items.iter().all(|item| item.conforms_to(element)),
                _ => false,
            },
            TypeRef::Map(key, value) => match self {
                Value::Map(entries) => entries
                    .iter()
                    .all(|(k, v)| k.conforms_to(key) && v.conforms_to(value)),
                _ => false,
            },
            TypeRef::Named(name) => match self {
                Value::Enum { type_name, .. } => type_name == name,
                Value::Object(record) => record.type_name() == name,
                _ => false,
            },
        }
    }

    fn matches_scalar(&self, kind: ScalarKind) -> bool {
        matches!(
            (kind, self),
            (ScalarKind::Bool, Value::Bool(_))
                | (ScalarKind::Int, Value::Int(_))
                | (ScalarKind::Long, Value::Long(_))
                | (ScalarKind::Float, Value::Float(_))
                | (ScalarKind::Double, Value::Double(_))
                | (ScalarKind::Decimal, Value::Decimal(_))
                | (ScalarKind::Text, Value::Text(_))
                | (ScalarKind::Uuid, Value::Uuid(_))
                | (ScalarKind::Instant, Value::Instant(_))
                | (ScalarKind::Date, Value::Date(_))
                | (ScalarKind::DateTime, Value::DateTime(_))
                | (ScalarKind::OffsetDateTime, Value::OffsetDateTime(_))
        )
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_i32(*value),
            Value::Long(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f32(*value),
            Value::Double(value) => serializer.serialize_f64(*value),
            Value::Decimal(value) => Serialize::serialize(value, serializer),
            Value::Text(value) => serializer.serialize_str(value),
            Value::Uuid(value) => value.serialize(serializer),
            Value::Instant(value) => value.serialize(serializer),
            Value::Date(value) => value.serialize(serializer),
            Value::DateTime(value) => value.serialize(serializer),
            Value::OffsetDateTime(value) => value.serialize(serializer),
            Value::Enum { constant, .. } => serializer.serialize_str(constant),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&MapKey(key), value)?;
                }
                map.end()
            }
            Value::Object(record) => record.serialize(serializer),
        }
    }
}

/// JSON object keys must be strings: numeric and boolean keys are rendered
/// through their textual form, everything else serializes as itself.
struct MapKey<'a>(&'a Value);

impl Serialize for MapKey<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Bool(value) => serializer.collect_str(value),
            Value::Int(value) => serializer.collect_str(value),
            Value::Long(value) => serializer.collect_str(value),
            Value::Float(value) => serializer.collect_str(value),
            Value::Double(value) => serializer.collect_str(value),
            other => other.serialize(serializer),
        }
    }
}

/// Field storage of a populated object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Stores a field value, returning the previous one.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_only_conforms_to_optional() {
        assert!(Value::Null.conforms_to(&TypeRef::optional(ScalarKind::Int.into())));
        assert!(!Value::Null.conforms_to(&ScalarKind::Int.into()));
        assert!(Value::Int(3).conforms_to(&TypeRef::optional(ScalarKind::Int.into())));
        assert!(!Value::Long(3).conforms_to(&ScalarKind::Int.into()));
    }

    #[test]
    fn named_types_match_by_type_name() {
        let value = Value::Enum {
            type_name: "Color".to_string(),
            constant: "RED".to_string(),
        };
        assert!(value.conforms_to(&TypeRef::named("Color")));
        assert!(!value.conforms_to(&TypeRef::named("Shape")));
        let record = Value::Object(Record::new("Shape"));
        assert!(record.conforms_to(&TypeRef::named("Shape")));
    }

    #[test]
    fn serializes_records_and_maps_as_json_objects() {
        let mut record = Record::new("Pojo");
        record.set("count", Value::Int(7));
        record.set("price", Value::Decimal(Decimal::new(1250, 2)));
        record.set(
            "tags",
            Value::Map(vec![(Value::Text("a".to_string()), Value::Long(1))]),
        );
        record.set(
            "color",
            Value::Enum {
                type_name: "Color".to_string(),
                constant: "RED".to_string(),
            },
        );
        let json = serde_json::to_string(&Value::Object(record)).expect("serialize");
        assert_eq!(
            json,
            r#"{"color":"RED","count":7,"price":"12.50","tags":{"a":1}}"#
        );
    }

    #[test]
    fn scalar_map_keys_render_as_strings() {
        let map = Value::Map(vec![
            (Value::Int(3), Value::Bool(true)),
            (Value::Bool(false), Value::Bool(false)),
            (Value::Double(1.5), Value::Bool(true)),
        ]);
        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(json, r#"{"3":true,"false":false,"1.5":true}"#);
    }
}

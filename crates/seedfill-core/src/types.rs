use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Built-in scalar families understood by the default generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Fixed-point decimal.
    Decimal,
    Text,
    Uuid,
    /// UTC timestamp.
    Instant,
    /// Calendar date without time zone.
    Date,
    /// Date and time without time zone.
    DateTime,
    /// Date and time with a fixed UTC offset.
    OffsetDateTime,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 12] = [
        ScalarKind::Bool,
        ScalarKind::Int,
        ScalarKind::Long,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::Decimal,
        ScalarKind::Text,
        ScalarKind::Uuid,
        ScalarKind::Instant,
        ScalarKind::Date,
        ScalarKind::DateTime,
        ScalarKind::OffsetDateTime,
    ];

    /// Name used in the textual form of a type reference.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Text => "string",
            ScalarKind::Uuid => "uuid",
            ScalarKind::Instant => "instant",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
            ScalarKind::OffsetDateTime => "offset_datetime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ScalarKind::Instant
                | ScalarKind::Date
                | ScalarKind::DateTime
                | ScalarKind::OffsetDateTime
        )
    }
}

/// Declared type of a property, constructor parameter or container element.
///
/// `Named` refers to an enum or object registered in a
/// [`TypeRegistry`](crate::TypeRegistry). `Optional` is the boxed/nullable
/// flavour of its inner type and is generated by the same family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Scalar(ScalarKind),
    Optional(Box<TypeRef>),
    List(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
    Named(String),
}

impl TypeRef {
    pub fn scalar(kind: ScalarKind) -> Self {
        TypeRef::Scalar(kind)
    }

    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::Optional(Box::new(inner))
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Strips any number of `Optional` layers.
    pub fn unwrap_optional(&self) -> &TypeRef {
        match self {
            TypeRef::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self.unwrap_optional(),
            TypeRef::List(_) | TypeRef::Map(_, _)
        )
    }

    /// Generic arguments of a container type: `[element]` for lists and
    /// `[key, value]` for maps. Empty for everything else.
    pub fn generic_arguments(&self) -> Vec<&TypeRef> {
        match self.unwrap_optional() {
            TypeRef::List(element) => vec![element.as_ref()],
            TypeRef::Map(key, value) => vec![key.as_ref(), value.as_ref()],
            _ => Vec::new(),
        }
    }

    pub fn named_type(&self) -> Option<&str> {
        match self.unwrap_optional() {
            TypeRef::Named(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Visits every `Named` reference reachable through generic arguments.
    pub fn named_references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_named(self, &mut out);
        out
    }
}

fn collect_named<'a>(ty: &'a TypeRef, out: &mut Vec<&'a str>) {
    match ty {
        TypeRef::Scalar(_) => {}
        TypeRef::Optional(inner) | TypeRef::List(inner) => collect_named(inner, out),
        TypeRef::Map(key, value) => {
            collect_named(key, out);
            collect_named(value, out);
        }
        TypeRef::Named(name) => out.push(name.as_str()),
    }
}

impl From<ScalarKind> for TypeRef {
    fn from(kind: ScalarKind) -> Self {
        TypeRef::Scalar(kind)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(kind) => f.write_str(kind.name()),
            TypeRef::Optional(inner) => write!(f, "Option<{inner}>"),
            TypeRef::List(element) => write!(f, "List<{element}>"),
            TypeRef::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            TypeRef::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for TypeRef {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        parse_type_ref(input.trim(), input)
    }
}

fn parse_type_ref(text: &str, original: &str) -> Result<TypeRef> {
    let invalid = |reason: &str| Error::InvalidTypeRef {
        input: original.to_string(),
        reason: reason.to_string(),
    };

    if text.is_empty() {
        return Err(invalid("empty type"));
    }

    let Some(open) = text.find('<') else {
        if let Some(kind) = ScalarKind::from_name(text) {
            return Ok(TypeRef::Scalar(kind));
        }
        if is_identifier(text) {
            return Ok(TypeRef::Named(text.to_string()));
        }
        return Err(invalid("expected a scalar name or a type identifier"));
    };

    if !text.ends_with('>') {
        return Err(invalid("unterminated generic arguments"));
    }
    let head = text[..open].trim();
    let args = split_arguments(&text[open + 1..text.len() - 1])
        .ok_or_else(|| invalid("unbalanced brackets"))?;

    let mut parsed = Vec::with_capacity(args.len());
    for arg in args {
        parsed.push(parse_type_ref(arg.trim(), original)?);
    }

    match (head, parsed.len()) {
        ("Option", 1) => Ok(TypeRef::optional(parsed.remove(0))),
        ("List", 1) => Ok(TypeRef::list(parsed.remove(0))),
        ("Map", 2) => {
            let value = parsed.remove(1);
            let key = parsed.remove(0);
            if !matches!(key, TypeRef::Scalar(_) | TypeRef::Named(_)) {
                return Err(invalid("map keys must be scalars or enums"));
            }
            Ok(TypeRef::map(key, value))
        }
        ("Option" | "List" | "Map", _) => Err(invalid("wrong number of generic arguments")),
        _ => Err(invalid("unknown generic container")),
    }
}

fn split_arguments(text: &str) -> Option<Vec<&str>> {
    let mut depth = 0_i32;
    let mut start = 0;
    let mut out = Vec::new();
    for (idx, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            ',' if depth == 0 => {
                out.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    out.push(&text[start..]);
    Some(out)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '$')
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_generics() {
        let parsed: TypeRef = "Map<string, List<Option<int>>>".parse().expect("parse");
        assert_eq!(
            parsed,
            TypeRef::map(
                TypeRef::Scalar(ScalarKind::Text),
                TypeRef::list(TypeRef::optional(TypeRef::Scalar(ScalarKind::Int)))
            )
        );
        assert_eq!(parsed.to_string(), "Map<string, List<Option<int>>>");
    }

    #[test]
    fn named_types_are_identifiers() {
        let parsed: TypeRef = "DemoEnum".parse().expect("parse");
        assert_eq!(parsed, TypeRef::named("DemoEnum"));
        assert!("List<int".parse::<TypeRef>().is_err());
        assert!("Set<int>".parse::<TypeRef>().is_err());
        assert!("Map<int>".parse::<TypeRef>().is_err());
        assert!("9lives".parse::<TypeRef>().is_err());
        assert!("Map<List<int>, int>".parse::<TypeRef>().is_err());
        assert!("Map<Option<int>, int>".parse::<TypeRef>().is_err());
    }

    #[test]
    fn optional_unwraps_to_inner() {
        let ty = TypeRef::optional(TypeRef::optional(TypeRef::list(TypeRef::named("Item"))));
        assert!(ty.is_container());
        assert_eq!(ty.generic_arguments(), vec![&TypeRef::named("Item")]);
        assert_eq!(ty.named_references(), vec!["Item"]);
    }
}

//! Serde contracts for type files.
//!
//! A type file describes enums and objects as data so that population can be
//! driven without Rust code, e.g. from the CLI. Objects described this way
//! use field-storing setters and constructors.

use schemars::JsonSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::descriptor::{EnumType, ObjectType};
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::types::TypeRef;

/// Root of a type file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeSchema {
    /// Contract version of the file.
    pub schema_version: String,
    pub types: Vec<TypeDef>,
}

/// Enum or object definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDef {
    Enum(EnumDef),
    Object(ObjectDef),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnumDef {
    pub name: String,
    /// Declared constants, in order.
    pub constants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ObjectDef {
    pub name: String,
    /// Whether the object can be created without arguments.
    #[serde(default = "default_true")]
    pub no_arg_constructor: bool,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    /// Constructors, each listed as the ordered field names it binds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PropertyDef {
    pub name: String,
    /// Textual type reference, e.g. `int`, `List<string>` or `DemoEnum`.
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub ty: TypeRef,
    /// Read-only properties have no setter and must be constructor-bound
    /// to receive a value.
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl TypeSchema {
    /// Builds and validates a registry from the definitions.
    pub fn into_registry(self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        for def in self.types {
            match def {
                TypeDef::Enum(def) => {
                    registry.register_enum(EnumType::new(def.name, def.constants))?;
                }
                TypeDef::Object(def) => {
                    registry.register_object(def.into_object_type()?)?;
                }
            }
        }
        registry.validate()?;
        Ok(registry)
    }
}

impl ObjectDef {
    pub fn into_object_type(self) -> Result<ObjectType> {
        let mut builder = ObjectType::builder(self.name);
        if self.no_arg_constructor {
            builder = builder.no_arg_constructor();
        }
        for property in self.properties {
            builder = if property.read_only {
                builder.field(property.name, property.ty)
            } else {
                builder.property(property.name, property.ty)
            };
        }
        for constructor in self.constructors {
            builder = builder.required_args_constructor(constructor);
        }
        builder.build()
    }
}

/// Emit the JSON Schema for type files.
pub fn type_schema_json_schema() -> RootSchema {
    schema_for!(TypeSchema)
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

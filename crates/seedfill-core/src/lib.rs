//! Core contracts for seedfill.
//!
//! This crate defines the type-descriptor model the population engine walks
//! (scalar kinds, type references, enum and object descriptors), the dynamic
//! value tree it produces, and the serde-backed type files used by the CLI.

pub mod descriptor;
pub mod error;
pub mod registry;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use descriptor::{
    ConstructorDef, ConstructorFn, EnumType, FieldDef, ObjectType, ObjectTypeBuilder, Param,
    SetterDef, SetterFn, TypeDescriptor, setter_name,
};
pub use error::{Error, InvokeError, Result};
pub use registry::TypeRegistry;
pub use schema::{EnumDef, ObjectDef, PropertyDef, TypeDef, TypeSchema, type_schema_json_schema};
pub use types::{ScalarKind, TypeRef};
pub use validation::{is_map_key, validate_map_keys, validate_registry};
pub use value::{Record, Value};

/// Current contract version for type files.
pub const TYPE_SCHEMA_VERSION: &str = "0.1";

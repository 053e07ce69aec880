//! Typed entry point: populate Rust types through their descriptors.
//!
//! A type implements [`Describe`] by registering the descriptor it maps to
//! and returning a reference to it. [`populate`] describes the target,
//! builds a [`Value`] graph and deserializes it back into the target with
//! serde, so field names in the descriptor must match the serde names.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use seedfill_core::{ScalarKind, TypeRef, TypeRegistry, Value};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::engine::Populator;
use crate::errors::PopulateError;
use crate::generators::SharedGenerator;
use crate::model::PopulateOptions;

/// Maps a Rust type onto a [`TypeRef`], registering any descriptor it
/// needs.
pub trait Describe {
    fn describe(types: &mut TypeRegistry) -> seedfill_core::Result<TypeRef>;
}

macro_rules! describe_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(_types: &mut TypeRegistry) -> seedfill_core::Result<TypeRef> {
                    Ok(TypeRef::Scalar(ScalarKind::$kind))
                }
            }
        )*
    };
}

describe_scalar! {
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    String => Text,
    Uuid => Uuid,
    DateTime<Utc> => Instant,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => OffsetDateTime,
}

impl<T: Describe> Describe for Option<T> {
    fn describe(types: &mut TypeRegistry) -> seedfill_core::Result<TypeRef> {
        Ok(TypeRef::optional(T::describe(types)?))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(types: &mut TypeRegistry) -> seedfill_core::Result<TypeRef> {
        Ok(TypeRef::list(T::describe(types)?))
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(types: &mut TypeRegistry) -> seedfill_core::Result<TypeRef> {
        Ok(TypeRef::map(K::describe(types)?, V::describe(types)?))
    }
}

impl<K: Describe, V: Describe> Describe for HashMap<K, V> {
    fn describe(types: &mut TypeRegistry) -> seedfill_core::Result<TypeRef> {
        Ok(TypeRef::map(K::describe(types)?, V::describe(types)?))
    }
}

/// Populates a `T` with the default options.
pub fn populate<T>(seed: i64, custom: &[SharedGenerator]) -> Result<T, PopulateError>
where
    T: Describe + DeserializeOwned,
{
    populate_with_options(seed, PopulateOptions::default(), custom)
}

pub fn populate_with_options<T>(
    seed: i64,
    options: PopulateOptions,
    custom: &[SharedGenerator],
) -> Result<T, PopulateError>
where
    T: Describe + DeserializeOwned,
{
    let mut types = TypeRegistry::new();
    let target = T::describe(&mut types)?;
    types.validate()?;
    let populator = Populator::with_options(types, options)?;
    let value = populator.populate(&target, seed, custom)?;
    from_value(&value)
}

/// Converts a populated value into any deserializable type.
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, PopulateError> {
    let json = serde_json::to_value(value)?;
    Ok(serde_json::from_value(json)?)
}

//! Parametrized generators for scenarios that need exact, stable shapes.

use seedfill_core::{TypeRef, Value, is_map_key};

use crate::context::{Context, PathElement};
use crate::errors::PopulateError;
use crate::generators::ValueGenerator;

const KEY_ATTEMPTS_PER_ENTRY: usize = 16;

/// `List<element>` of exactly `count` elements, whatever the seed.
#[derive(Debug, Clone)]
pub struct FilledListGenerator {
    count: usize,
    list_type: TypeRef,
}

impl FilledListGenerator {
    pub fn new(count: usize, element: TypeRef) -> Self {
        Self {
            count,
            list_type: TypeRef::list(element),
        }
    }
}

impl ValueGenerator for FilledListGenerator {
    fn id(&self) -> &str {
        "specific.filled_list"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        ctx.value_type() == &self.list_type
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let TypeRef::List(element) = &self.list_type else {
            return Err(ctx.generator_error("filled list without element type"));
        };
        let declaring = self.list_type.to_string();
        let mut items = Vec::with_capacity(self.count);
        for idx in 0..self.count {
            let frame = PathElement::element(format!("[{idx}]"), &declaring);
            items.push(ctx.generate(frame, element)?);
        }
        Ok(Value::List(items))
    }
}

/// `Map<key, value>` of exactly `count` entries with distinct keys.
#[derive(Debug, Clone)]
pub struct FilledMapGenerator {
    count: usize,
    map_type: TypeRef,
}

impl FilledMapGenerator {
    pub fn new(count: usize, key: TypeRef, value: TypeRef) -> Self {
        Self {
            count,
            map_type: TypeRef::map(key, value),
        }
    }
}

impl ValueGenerator for FilledMapGenerator {
    fn id(&self) -> &str {
        "specific.filled_map"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        ctx.value_type() == &self.map_type
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let TypeRef::Map(key_type, value_type) = &self.map_type else {
            return Err(ctx.generator_error("filled map without key and value types"));
        };
        if !is_map_key(key_type, ctx.types()) {
            return Err(ctx.generator_error(format!("{key_type} cannot key a map")));
        }
        let declaring = self.map_type.to_string();
        let max_attempts = self.count.saturating_mul(KEY_ATTEMPTS_PER_ENTRY);
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(self.count);
        let mut attempt = 0;
        while entries.len() < self.count {
            if attempt >= max_attempts {
                return Err(ctx.generator_error(format!(
                    "could not generate {} distinct keys of type {key_type} after {attempt} attempts",
                    self.count
                )));
            }
            let frame = PathElement::element(format!("key[{attempt}]"), &declaring);
            let key = ctx.generate(frame, key_type)?;
            if !entries.iter().any(|(existing, _)| existing == &key) {
                let value = ctx.generate(
                    PathElement::element(format!("value[{attempt}]"), &declaring),
                    value_type,
                )?;
                entries.push((key, value));
            }
            attempt += 1;
        }
        Ok(Value::Map(entries))
    }
}

/// Always yields the same value for one declared type.
#[derive(Debug, Clone)]
pub struct ConstantGenerator {
    ty: TypeRef,
    value: Value,
}

impl ConstantGenerator {
    pub fn new(ty: TypeRef, value: Value) -> Self {
        Self { ty, value }
    }
}

impl ValueGenerator for ConstantGenerator {
    fn id(&self) -> &str {
        "specific.constant"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        ctx.declared_type() == &self.ty || ctx.value_type() == &self.ty
    }

    fn generate(&self, _ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use seedfill_core::{ScalarKind, TypeRegistry};

    use super::*;
    use crate::engine::Populator;
    use crate::generators::SharedGenerator;

    #[test]
    fn filled_list_ignores_seed() {
        let populator = Populator::new(TypeRegistry::new());
        let custom: Vec<SharedGenerator> =
            vec![Arc::new(FilledListGenerator::new(10, ScalarKind::Int.into()))];
        let ty = TypeRef::list(ScalarKind::Int.into());
        for seed in [-1, 0, 99] {
            let value = populator.populate(&ty, seed, &custom).expect("populate");
            assert_eq!(value.as_list().map(<[Value]>::len), Some(10));
        }
    }

    #[test]
    fn filled_map_reaches_exact_count() {
        let populator = Populator::new(TypeRegistry::new());
        let custom: Vec<SharedGenerator> = vec![Arc::new(FilledMapGenerator::new(
            12,
            ScalarKind::Int.into(),
            ScalarKind::Text.into(),
        ))];
        let ty = TypeRef::map(ScalarKind::Int.into(), ScalarKind::Text.into());
        let value = populator.populate(&ty, 4, &custom).expect("populate");
        assert_eq!(value.as_map().map(<[(Value, Value)]>::len), Some(12));
    }

    #[test]
    fn filled_map_fails_when_keys_run_out() {
        let populator = Populator::new(TypeRegistry::new());
        let custom: Vec<SharedGenerator> = vec![Arc::new(FilledMapGenerator::new(
            3,
            ScalarKind::Bool.into(),
            ScalarKind::Int.into(),
        ))];
        let ty = TypeRef::map(ScalarKind::Bool.into(), ScalarKind::Int.into());
        let result = populator.populate(&ty, 4, &custom);
        assert!(matches!(result, Err(PopulateError::Generator { .. })));
    }
}

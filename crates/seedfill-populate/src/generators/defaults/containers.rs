use rand::Rng;
use rand::seq::IndexedRandom;
use seedfill_core::{TypeRef, Value, is_map_key};

use crate::context::{Context, PathElement};
use crate::errors::PopulateError;
use crate::generators::ValueGenerator;

/// Uniform pick among the declared constants of a registered enum.
pub struct EnumGenerator;

impl ValueGenerator for EnumGenerator {
    fn id(&self) -> &str {
        "default.enum"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        match ctx.value_type() {
            TypeRef::Named(name) => ctx.types().enum_type(name).is_some(),
            _ => false,
        }
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let TypeRef::Named(name) = ctx.value_type() else {
            return Err(ctx.generator_error("enum generator applied to a non-enum type"));
        };
        let Some(enum_type) = ctx.types().enum_type(name) else {
            return Err(ctx.generator_error(format!("enum '{name}' is not registered")));
        };
        let constant = enum_type
            .constants()
            .choose(&mut ctx.rng())
            .ok_or_else(|| ctx.generator_error(format!("enum '{name}' declares no constants")))?;
        Ok(Value::Enum {
            type_name: enum_type.name().to_string(),
            constant: constant.clone(),
        })
    }
}

/// List whose length is drawn from the configured collection bounds.
pub struct ListGenerator;

impl ValueGenerator for ListGenerator {
    fn id(&self) -> &str {
        "default.list"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        matches!(ctx.value_type(), TypeRef::List(_))
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let list_type = ctx.value_type().clone();
        let TypeRef::List(element) = &list_type else {
            return Err(ctx.generator_error("list generator applied to a non-list type"));
        };
        let len = collection_size(ctx);
        let declaring = list_type.to_string();
        let mut items = Vec::with_capacity(len);
        for idx in 0..len {
            let frame = PathElement::element(format!("[{idx}]"), &declaring);
            items.push(ctx.generate(frame, element)?);
        }
        Ok(Value::List(items))
    }
}

/// Map whose entry count is drawn from the configured collection bounds.
/// Entries whose generated key repeats an earlier one are dropped.
pub struct MapGenerator;

impl ValueGenerator for MapGenerator {
    fn id(&self) -> &str {
        "default.map"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        matches!(ctx.value_type(), TypeRef::Map(_, _))
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let map_type = ctx.value_type().clone();
        let TypeRef::Map(key_type, value_type) = &map_type else {
            return Err(ctx.generator_error("map generator applied to a non-map type"));
        };
        if !is_map_key(key_type, ctx.types()) {
            return Err(ctx.generator_error(format!("{key_type} cannot key a map")));
        }
        let len = collection_size(ctx);
        let declaring = map_type.to_string();
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(len);
        for idx in 0..len {
            let frame = PathElement::element(format!("key[{idx}]"), &declaring);
            let key = ctx.generate(frame, key_type)?;
            if entries.iter().any(|(existing, _)| existing == &key) {
                continue;
            }
            let frame = PathElement::element(format!("value[{idx}]"), &declaring);
            let value = ctx.generate(frame, value_type)?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }
}

fn collection_size(ctx: &Context<'_>) -> usize {
    let options = ctx.options();
    ctx.rng()
        .random_range(options.min_collection_size..=options.max_collection_size)
}

#[cfg(test)]
mod tests {
    use seedfill_core::{EnumType, ObjectType, ScalarKind, TypeRegistry};

    use crate::engine::Populator;
    use crate::model::PopulateOptions;

    use super::*;

    #[test]
    fn enum_values_come_from_declared_constants() {
        let mut types = TypeRegistry::new();
        let color = types
            .register_enum(EnumType::new("Color", ["RED", "GREEN", "BLUE"]))
            .expect("register");
        let populator = Populator::new(types);
        for seed in 0..16 {
            let value = populator.populate(&color, seed, &[]).expect("populate");
            assert!(matches!(
                value.as_str(),
                Some("RED") | Some("GREEN") | Some("BLUE")
            ));
        }
    }

    #[test]
    fn list_length_respects_options() {
        let options = PopulateOptions {
            min_collection_size: 2,
            max_collection_size: 4,
            ..PopulateOptions::default()
        };
        let populator =
            Populator::with_options(TypeRegistry::new(), options).expect("valid options");
        let ty = TypeRef::list(ScalarKind::Int.into());
        for seed in -8..8 {
            let value = populator.populate(&ty, seed, &[]).expect("populate");
            let len = value.as_list().expect("list").len();
            assert!((2..=4).contains(&len), "len {len}");
        }
    }

    #[test]
    fn object_map_keys_are_refused() {
        let mut types = TypeRegistry::new();
        let point = types
            .register_object(
                ObjectType::builder("Point")
                    .no_arg_constructor()
                    .property("x", ScalarKind::Int.into())
                    .build()
                    .expect("build"),
            )
            .expect("register");
        let lookup = TypeRef::map(point, ScalarKind::Int.into());
        types
            .register_object(
                ObjectType::builder("Holder")
                    .no_arg_constructor()
                    .property("lookup", lookup.clone())
                    .build()
                    .expect("build"),
            )
            .expect("register");
        let populator = Populator::new(types);

        let err = populator.populate(&lookup, 1, &[]).expect_err("object key");
        assert!(matches!(err, PopulateError::Types(_)), "{err}");

        let err = populator
            .populate_type("Holder", 1, &[])
            .expect_err("object key");
        assert!(
            matches!(err, PopulateError::Generator { ref path, .. } if path == "setLookup"),
            "{err}"
        );
    }

    #[test]
    fn map_keys_are_unique() {
        let options = PopulateOptions {
            min_collection_size: 8,
            max_collection_size: 8,
            ..PopulateOptions::default()
        };
        let populator =
            Populator::with_options(TypeRegistry::new(), options).expect("valid options");
        let ty = TypeRef::map(ScalarKind::Bool.into(), ScalarKind::Text.into());
        let value = populator.populate(&ty, 11, &[]).expect("populate");
        let entries = value.as_map().expect("map");
        assert!(!entries.is_empty() && entries.len() <= 2);
        if let [(first, _), (second, _)] = entries {
            assert_ne!(first, second);
        }
    }
}

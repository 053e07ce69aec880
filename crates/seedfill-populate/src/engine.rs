use seedfill_core::{
    ObjectType, Record, TypeDescriptor, TypeRef, TypeRegistry, Value, validate_map_keys,
};
use tracing::{debug, info, warn};

use crate::context::{Context, PathElement};
use crate::errors::PopulateError;
use crate::generators::{GeneratorRegistry, SharedGenerator};
use crate::model::PopulateOptions;
use crate::resolver::{Construction, select_construction, settable_properties};

/// Entry point of the population engine.
///
/// A populator is immutable once built and may serve any number of calls;
/// each call owns its own [`Context`].
#[derive(Debug, Clone)]
pub struct Populator {
    types: TypeRegistry,
    generators: GeneratorRegistry,
    options: PopulateOptions,
}

impl Populator {
    /// Populator with the default generators and options.
    pub fn new(types: TypeRegistry) -> Self {
        Self {
            types,
            generators: GeneratorRegistry::new(),
            options: PopulateOptions::default(),
        }
    }

    pub fn with_options(
        types: TypeRegistry,
        options: PopulateOptions,
    ) -> Result<Self, PopulateError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new(types)
        })
    }

    pub fn with_generators(mut self, generators: GeneratorRegistry) -> Self {
        self.generators = generators;
        self
    }

    /// Registered generators, e.g. to add specific ones.
    pub fn generators_mut(&mut self) -> &mut GeneratorRegistry {
        &mut self.generators
    }

    pub fn generators(&self) -> &GeneratorRegistry {
        &self.generators
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn options(&self) -> &PopulateOptions {
        &self.options
    }

    /// Builds a fully populated value of `target`.
    ///
    /// `custom` generators take priority over every registered one, in the
    /// given order. The result is a pure function of the populator, the
    /// target, the seed and the custom generators.
    pub fn populate(
        &self,
        target: &TypeRef,
        seed: i64,
        custom: &[SharedGenerator],
    ) -> Result<Value, PopulateError> {
        info!(target = %target, seed, custom = custom.len(), "population started");
        let mut ctx = Context::new(
            seed,
            target.clone(),
            &self.types,
            &self.options,
            self.generators.chain(custom),
        );
        let outcome = validate_map_keys(target, &self.types)
            .map_err(PopulateError::from)
            .and_then(|()| resolve_value(&mut ctx));
        finish(target, seed, outcome)
    }

    /// Populates the registered type `name`.
    pub fn populate_type(
        &self,
        name: &str,
        seed: i64,
        custom: &[SharedGenerator],
    ) -> Result<Value, PopulateError> {
        if !self.types.contains(name) {
            return Err(PopulateError::UnknownType {
                name: name.to_string(),
                path: String::new(),
            });
        }
        self.populate(&TypeRef::named(name), seed, custom)
    }

    /// Populates every settable property of an existing record.
    pub fn populate_instance(
        &self,
        record: Record,
        seed: i64,
        custom: &[SharedGenerator],
    ) -> Result<Record, PopulateError> {
        let target = TypeRef::named(record.type_name());
        let Some(object) = self.types.object_type(record.type_name()) else {
            return Err(PopulateError::UnknownType {
                name: record.type_name().to_string(),
                path: String::new(),
            });
        };
        info!(target = %target, seed, custom = custom.len(), "population started");
        let mut ctx = Context::new(
            seed,
            target.clone(),
            &self.types,
            &self.options,
            self.generators.chain(custom),
        );
        let outcome = populate_properties(&mut ctx, object, record, &[]);
        finish(&target, seed, outcome)
    }
}

fn finish<T>(
    target: &TypeRef,
    seed: i64,
    outcome: Result<T, PopulateError>,
) -> Result<T, PopulateError> {
    match &outcome {
        Ok(_) => info!(target = %target, seed, "population completed"),
        Err(err) => warn!(
            target = %target,
            seed,
            path = err.path().unwrap_or_default(),
            error = %err,
            "population failed"
        ),
    }
    outcome
}

/// Resolves a value for the context's declared type: first applicable
/// generator, else object construction, else failure at the current path.
pub(crate) fn resolve_value(ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
    let chain = ctx.chain();
    if let Some((tier, generator)) = chain.resolve(ctx) {
        debug!(
            generator = generator.id(),
            tier = %tier,
            path = %ctx.path_key(),
            "generator selected"
        );
        let value = generator.generate(ctx)?;
        if !value.conforms_to(ctx.declared_type()) {
            return Err(PopulateError::TypeMismatch {
                generator: generator.id().to_string(),
                expected: ctx.declared_type().to_string(),
                actual: value.kind_name().to_string(),
                path: ctx.diagnostic_path(),
            });
        }
        return Ok(value);
    }

    let TypeRef::Named(name) = ctx.value_type().clone() else {
        return Err(unresolvable(ctx));
    };
    match ctx.types().get(&name) {
        Some(TypeDescriptor::Object(object)) => instantiate(ctx, object),
        Some(TypeDescriptor::Enum(_)) => Err(unresolvable(ctx)),
        None => Err(PopulateError::UnknownType {
            name,
            path: ctx.diagnostic_path(),
        }),
    }
}

fn unresolvable(ctx: &Context<'_>) -> PopulateError {
    PopulateError::Unresolvable {
        path: ctx.diagnostic_path(),
    }
}

fn instantiate(ctx: &mut Context<'_>, object: &ObjectType) -> Result<Value, PopulateError> {
    let construction = select_construction(object).map_err(|source| {
        PopulateError::AmbiguousResolution {
            path: ctx.diagnostic_path(),
            source,
        }
    })?;

    let (record, bound) = match construction {
        Construction::NoArg(ctor) => {
            debug!(type_name = object.name(), path = %ctx.path_key(), "no-arg construction");
            let record = ctor
                .invoke(Vec::new())
                .map_err(|source| instantiation_error(ctx, object, source))?;
            (record, Vec::new())
        }
        Construction::Parameterized(ctor) => {
            debug!(
                type_name = object.name(),
                params = ctor.arity(),
                path = %ctx.path_key(),
                "parameterized construction"
            );
            let mut args = Vec::with_capacity(ctor.arity());
            for param in ctor.params() {
                let frame = PathElement::parameter(&param.name, object.name());
                args.push(ctx.generate(frame, &param.ty)?);
            }
            let record = ctor
                .invoke(args)
                .map_err(|source| instantiation_error(ctx, object, source))?;
            let bound = ctor.params().iter().map(|param| param.name.as_str()).collect();
            (record, bound)
        }
        Construction::Unavailable => {
            debug!(type_name = object.name(), path = %ctx.path_key(), "no viable constructor");
            return Err(unresolvable(ctx));
        }
    };

    populate_properties(ctx, object, record, &bound).map(Value::Object)
}

/// Resolves and applies every settable property not already bound by the
/// constructor.
fn populate_properties(
    ctx: &mut Context<'_>,
    object: &ObjectType,
    mut record: Record,
    bound: &[&str],
) -> Result<Record, PopulateError> {
    let properties = settable_properties(object, ctx.types()).map_err(|source| {
        PopulateError::AmbiguousResolution {
            path: ctx.diagnostic_path(),
            source,
        }
    })?;

    for property in properties {
        if bound.contains(&property.name.as_str()) {
            continue;
        }
        let setter = property.setter;
        let frame = PathElement::setter(setter.name(), object.name());
        ctx.descend(frame, property.ty.clone(), |ctx| {
            let value = resolve_value(ctx)?;
            setter
                .invoke(&mut record, vec![value])
                .map_err(|source| PopulateError::Invocation {
                    setter: setter.name().to_string(),
                    path: ctx.diagnostic_path(),
                    source,
                })
        })?;
    }
    Ok(record)
}

fn instantiation_error(
    ctx: &Context<'_>,
    object: &ObjectType,
    source: seedfill_core::InvokeError,
) -> PopulateError {
    PopulateError::Instantiation {
        type_name: object.name().to_string(),
        path: ctx.diagnostic_path(),
        source,
    }
}

//! Settable properties, setter overload ranking and construction choice.

use seedfill_core::{
    ConstructorDef, ObjectType, ScalarKind, SetterDef, TypeRef, TypeRegistry, setter_name,
};

use crate::errors::Ambiguity;

/// Single-argument setter chosen for one property name.
#[derive(Debug, Clone)]
pub struct Property<'a> {
    /// Property name derived from the setter name.
    pub name: String,
    pub setter: &'a SetterDef,
    /// Declared parameter type of the chosen overload.
    pub ty: &'a TypeRef,
    pub rank: u8,
}

/// How an object gets created.
#[derive(Debug, Clone, Copy)]
pub enum Construction<'a> {
    NoArg(&'a ConstructorDef),
    /// Bound constructor whose parameters are resolved as properties.
    Parameterized(&'a ConstructorDef),
    Unavailable,
}

/// Narrowness rank of a setter parameter type; higher wins.
pub fn specificity(ty: &TypeRef, types: &TypeRegistry) -> u8 {
    match ty {
        TypeRef::Optional(inner) => specificity(inner, types).saturating_sub(1),
        TypeRef::Scalar(kind) => match kind {
            ScalarKind::Bool => 95,
            ScalarKind::Uuid => 92,
            ScalarKind::Int => 90,
            ScalarKind::Long => 88,
            ScalarKind::Float => 86,
            ScalarKind::Double => 84,
            ScalarKind::Decimal => 82,
            ScalarKind::Date => 78,
            ScalarKind::DateTime => 76,
            ScalarKind::OffsetDateTime => 74,
            ScalarKind::Instant => 72,
            ScalarKind::Text => 10,
        },
        TypeRef::Named(name) if types.enum_type(name).is_some() => 100,
        TypeRef::Named(_) => 60,
        TypeRef::List(_) => 50,
        TypeRef::Map(_, _) => 48,
    }
}

/// Settable properties of `object`, in the order their setter names are
/// first declared.
///
/// Only single-argument setters count. Among same-named overloads the most
/// specific parameter type wins regardless of declaration order.
pub fn settable_properties<'a>(
    object: &'a ObjectType,
    types: &TypeRegistry,
) -> Result<Vec<Property<'a>>, Ambiguity> {
    let mut names: Vec<&str> = Vec::new();
    for setter in object.setters() {
        if setter.arity() == 1 && !names.contains(&setter.name()) {
            names.push(setter.name());
        }
    }

    let mut properties = Vec::with_capacity(names.len());
    for name in names {
        let candidates: Vec<(&SetterDef, &TypeRef, u8)> = object
            .setters()
            .iter()
            .filter(|setter| setter.name() == name)
            .filter_map(|setter| {
                setter
                    .single_param()
                    .map(|ty| (setter, ty, specificity(ty, types)))
            })
            .collect();
        let Some(best) = candidates.iter().map(|(_, _, rank)| *rank).max() else {
            continue;
        };
        let top: Vec<(&SetterDef, &TypeRef)> = candidates
            .iter()
            .filter(|(_, _, rank)| *rank == best)
            .map(|(setter, ty, _)| (*setter, *ty))
            .collect();
        let [(setter, ty)] = top.as_slice() else {
            return Err(Ambiguity::Setter {
                type_name: object.name().to_string(),
                setter: name.to_string(),
                candidates: top
                    .iter()
                    .map(|(_, ty)| ty.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        };
        properties.push(Property {
            name: field_for_setter(object, name),
            setter: *setter,
            ty: *ty,
            rank: best,
        });
    }
    Ok(properties)
}

/// Field written by the setter `name`, falling back to the name derived
/// from the setter when no declared field maps to it.
fn field_for_setter(object: &ObjectType, name: &str) -> String {
    object
        .fields()
        .iter()
        .find(|field| setter_name(&field.name) == name)
        .map(|field| field.name.clone())
        .unwrap_or_else(|| property_name(name))
}

/// Prefers the no-argument constructor, then the bound constructor with
/// the most parameters.
pub fn select_construction(object: &ObjectType) -> Result<Construction<'_>, Ambiguity> {
    if let Some(ctor) = object.no_arg_constructor() {
        return Ok(Construction::NoArg(ctor));
    }
    let bound = object.bound_constructors();
    let Some(arity) = bound.iter().map(|ctor| ctor.arity()).max() else {
        return Ok(Construction::Unavailable);
    };
    let widest: Vec<&ConstructorDef> = bound
        .into_iter()
        .filter(|ctor| ctor.arity() == arity)
        .collect();
    match widest.as_slice() {
        [ctor] => Ok(Construction::Parameterized(*ctor)),
        _ => Err(Ambiguity::Constructor {
            type_name: object.name().to_string(),
            arity,
            count: widest.len(),
        }),
    }
}

/// `setAnInt` becomes `anInt`; names without the `set` prefix are kept.
pub fn property_name(member: &str) -> String {
    let Some(rest) = member.strip_prefix("set").filter(|rest| !rest.is_empty()) else {
        return member.to_string();
    };
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_lowercase(), chars.as_str()),
        None => String::new(),
    }
}

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::types::TypeRef;

/// Validate internal consistency of a type registry.
///
/// This checks:
/// - enums declare at least one constant, without duplicates
/// - every named reference in fields, setters and constructors is registered
/// - map keys are scalars or enums
pub fn validate_registry(registry: &TypeRegistry) -> Result<()> {
    for descriptor in registry.descriptors() {
        match descriptor {
            TypeDescriptor::Enum(enum_type) => {
                if enum_type.constants().is_empty() {
                    return Err(Error::InvalidSchema(format!(
                        "enum '{}' declares no constants",
                        enum_type.name()
                    )));
                }
                for (idx, constant) in enum_type.constants().iter().enumerate() {
                    if enum_type.constants()[..idx].contains(constant) {
                        return Err(Error::InvalidSchema(format!(
                            "duplicate constant '{constant}' in enum '{}'",
                            enum_type.name()
                        )));
                    }
                }
            }
            TypeDescriptor::Object(object) => {
                for ty in object.referenced_types() {
                    for name in ty.named_references() {
                        if !registry.contains(name) {
                            return Err(Error::UnknownType(format!(
                                "{name} (referenced by '{}')",
                                object.name()
                            )));
                        }
                    }
                    validate_map_keys(ty, registry).map_err(|err| match err {
                        Error::InvalidSchema(reason) => {
                            Error::InvalidSchema(format!("{reason} (in '{}')", object.name()))
                        }
                        other => other,
                    })?;
                }
            }
        }
    }

    Ok(())
}

/// Rejects maps whose key type cannot be rendered as a JSON object key.
pub fn validate_map_keys(ty: &TypeRef, registry: &TypeRegistry) -> Result<()> {
    match ty {
        TypeRef::Scalar(_) | TypeRef::Named(_) => Ok(()),
        TypeRef::Optional(inner) | TypeRef::List(inner) => validate_map_keys(inner, registry),
        TypeRef::Map(key, value) => {
            if !is_map_key(key, registry) {
                return Err(Error::InvalidSchema(format!(
                    "map key type {key} is not a scalar or an enum"
                )));
            }
            validate_map_keys(value, registry)
        }
    }
}

/// Scalars and enums can key a map. Unregistered names are left to the
/// unknown-type checks.
pub fn is_map_key(ty: &TypeRef, registry: &TypeRegistry) -> bool {
    match ty {
        TypeRef::Scalar(_) => true,
        TypeRef::Named(name) => registry.object_type(name).is_none(),
        TypeRef::Optional(_) | TypeRef::List(_) | TypeRef::Map(_, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumType, ObjectType};
    use crate::types::ScalarKind;

    fn registry_with(key: TypeRef) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register_enum(EnumType::new("Color", ["RED"]))
            .expect("register");
        registry
            .register_object(
                ObjectType::builder("Point")
                    .no_arg_constructor()
                    .property("x", ScalarKind::Int.into())
                    .build()
                    .expect("build"),
            )
            .expect("register");
        registry
            .register_object(
                ObjectType::builder("Holder")
                    .no_arg_constructor()
                    .property("lookup", TypeRef::map(key, ScalarKind::Int.into()))
                    .build()
                    .expect("build"),
            )
            .expect("register");
        registry
    }

    #[test]
    fn scalar_and_enum_map_keys_are_accepted() {
        assert!(validate_registry(&registry_with(ScalarKind::Long.into())).is_ok());
        assert!(validate_registry(&registry_with(TypeRef::named("Color"))).is_ok());
    }

    #[test]
    fn object_map_keys_are_rejected() {
        let err = validate_registry(&registry_with(TypeRef::named("Point")))
            .expect_err("object key");
        assert!(
            matches!(err, Error::InvalidSchema(ref reason) if reason.contains("Point")),
            "{err}"
        );
        let nested = TypeRef::list(TypeRef::map(TypeRef::named("Point"), ScalarKind::Int.into()));
        assert!(validate_map_keys(&nested, &registry_with(ScalarKind::Int.into())).is_err());
    }
}

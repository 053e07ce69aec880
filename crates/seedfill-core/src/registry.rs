use std::collections::BTreeMap;

use crate::descriptor::{EnumType, ObjectType, TypeDescriptor};
use crate::error::{Error, Result};
use crate::types::TypeRef;
use crate::validation::validate_registry;

/// Name-keyed store of enum and object descriptors.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor and returns a reference to it.
    pub fn register(&mut self, descriptor: impl Into<TypeDescriptor>) -> Result<TypeRef> {
        let descriptor = descriptor.into();
        let name = descriptor.name().to_string();
        if self.types.contains_key(&name) {
            return Err(Error::DuplicateType(name));
        }
        self.types.insert(name.clone(), descriptor);
        Ok(TypeRef::Named(name))
    }

    pub fn register_enum(&mut self, enum_type: EnumType) -> Result<TypeRef> {
        self.register(enum_type)
    }

    pub fn register_object(&mut self, object: ObjectType) -> Result<TypeRef> {
        self.register(object)
    }

    /// Registers the descriptor built by `build` unless `name` is already
    /// present. `build` may register the types it depends on.
    pub fn register_with<F>(&mut self, name: &str, build: F) -> Result<TypeRef>
    where
        F: FnOnce(&mut Self) -> Result<TypeDescriptor>,
    {
        if self.types.contains_key(name) {
            return Ok(TypeRef::named(name));
        }
        let descriptor = build(self)?;
        if descriptor.name() != name {
            return Err(Error::InvalidSchema(format!(
                "descriptor '{}' registered under name '{name}'",
                descriptor.name()
            )));
        }
        self.register(descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        match self.types.get(name) {
            Some(TypeDescriptor::Enum(enum_type)) => Some(enum_type),
            _ => None,
        }
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        match self.types.get(name) {
            Some(TypeDescriptor::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        validate_registry(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = TypeRegistry::new();
        registry
            .register_enum(EnumType::new("Color", ["RED"]))
            .expect("first registration");
        let err = registry
            .register_enum(EnumType::new("Color", ["BLUE"]))
            .expect_err("duplicate");
        assert!(matches!(err, Error::DuplicateType(name) if name == "Color"));
    }

    #[test]
    fn register_with_is_idempotent() {
        let mut registry = TypeRegistry::new();
        let mut calls = 0;
        for _ in 0..2 {
            registry
                .register_with("Holder", |types| {
                    calls += 1;
                    let color = types.register_with("Color", |_| {
                        Ok(EnumType::new("Color", ["RED", "GREEN"]).into())
                    })?;
                    Ok(ObjectType::builder("Holder")
                        .no_arg_constructor()
                        .property("color", color)
                        .property("size", TypeRef::Scalar(ScalarKind::Int))
                        .build()?
                        .into())
                })
                .expect("register");
        }
        assert_eq!(calls, 1);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Color", "Holder"]);
        assert!(registry.object_type("Holder").is_some());
        assert!(registry.enum_type("Holder").is_none());
    }
}

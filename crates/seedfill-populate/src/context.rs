//! Traversal state of a single population call.
//!
//! The [`Context`] owns the stack of [`PathElement`]s entered so far. Frames
//! are only pushed through [`Context::descend`], which restores the stack
//! and the current declared type after the step, whether it succeeded or
//! failed, so the stack depth always equals the active recursion depth.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use seedfill_core::{TypeRef, TypeRegistry, Value};

use crate::engine::resolve_value;
use crate::errors::PopulateError;
use crate::generators::GeneratorChain;
use crate::model::PopulateOptions;
use crate::resolver::property_name;

/// What a frame stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Single-argument setter, named after the setter.
    Setter,
    /// Constructor parameter, named after the parameter.
    Parameter,
    /// Container element (`[i]`) or map entry part (`key[i]`, `value[i]`).
    Element,
}

/// One step of the path from the root value to the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathElement {
    pub name: String,
    /// Object type declaring the member, or the container type for elements.
    pub declaring_type: String,
    pub kind: FrameKind,
}

impl PathElement {
    pub fn setter(name: impl Into<String>, declaring_type: impl Into<String>) -> Self {
        Self::new(name, declaring_type, FrameKind::Setter)
    }

    pub fn parameter(name: impl Into<String>, declaring_type: impl Into<String>) -> Self {
        Self::new(name, declaring_type, FrameKind::Parameter)
    }

    pub fn element(name: impl Into<String>, declaring_type: impl Into<String>) -> Self {
        Self::new(name, declaring_type, FrameKind::Element)
    }

    fn new(name: impl Into<String>, declaring_type: impl Into<String>, kind: FrameKind) -> Self {
        Self {
            name: name.into(),
            declaring_type: declaring_type.into(),
            kind,
        }
    }
}

/// Mutable state of one top-level population call.
///
/// Generators read the current position through the accessors and recurse
/// with [`Context::generate`].
pub struct Context<'a> {
    seed: i64,
    path: Vec<PathElement>,
    types: &'a TypeRegistry,
    options: &'a PopulateOptions,
    chain: GeneratorChain<'a>,
    declared_type: TypeRef,
    member_name: Option<String>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        seed: i64,
        target: TypeRef,
        types: &'a TypeRegistry,
        options: &'a PopulateOptions,
        chain: GeneratorChain<'a>,
    ) -> Self {
        Self {
            seed,
            path: Vec::new(),
            types,
            options,
            chain,
            declared_type: target,
            member_name: None,
        }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Frame names from the root to the current frame.
    pub fn current_path(&self) -> Vec<&str> {
        self.path.iter().map(|element| element.name.as_str()).collect()
    }

    pub fn path_elements(&self) -> &[PathElement] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Frame names innermost first, joined by `<-`.
    pub fn diagnostic_path(&self) -> String {
        self.path
            .iter()
            .rev()
            .map(|element| element.name.as_str())
            .collect::<Vec<_>>()
            .join("<-")
    }

    /// Frame names root first, joined by `/`; feeds the random source.
    pub fn path_key(&self) -> String {
        self.current_path().join("/")
    }

    /// Type declared for the value being resolved.
    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    /// Declared type with any `Optional` wrapper removed.
    pub fn value_type(&self) -> &TypeRef {
        self.declared_type.unwrap_optional()
    }

    /// First generic argument of a container, e.g. the element of a list.
    pub fn generic_type(&self) -> Option<&TypeRef> {
        self.generic_arguments().into_iter().next()
    }

    pub fn generic_arguments(&self) -> Vec<&TypeRef> {
        self.declared_type.generic_arguments()
    }

    /// Setter or constructor parameter currently being resolved. Element
    /// frames keep the member of their container.
    pub fn member_name(&self) -> Option<&str> {
        self.member_name.as_deref()
    }

    pub fn declaring_type(&self) -> Option<&str> {
        self.path
            .last()
            .map(|element| element.declaring_type.as_str())
    }

    /// Property behind the current member: `setAnInt` yields `anInt`.
    pub fn property_name(&self) -> Option<String> {
        self.member_name.as_deref().map(property_name)
    }

    pub fn types(&self) -> &'a TypeRegistry {
        self.types
    }

    pub fn options(&self) -> &'a PopulateOptions {
        self.options
    }

    /// Random source for the current position, derived from the seed and
    /// the path key. Equal inputs always yield the same stream.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(hash_seed(self.seed as u64, &self.path_key()))
    }

    /// Resolves a value of `ty` under a child frame.
    pub fn generate(&mut self, frame: PathElement, ty: &TypeRef) -> Result<Value, PopulateError> {
        self.descend(frame, ty.clone(), resolve_value)
    }

    /// Runs `step` with `frame` pushed and `declared` as the current type.
    pub fn descend<T, F>(
        &mut self,
        frame: PathElement,
        declared: TypeRef,
        step: F,
    ) -> Result<T, PopulateError>
    where
        F: FnOnce(&mut Self) -> Result<T, PopulateError>,
    {
        let member = match frame.kind {
            FrameKind::Setter | FrameKind::Parameter => Some(frame.name.clone()),
            FrameKind::Element => self.member_name.clone(),
        };
        self.path.push(frame);
        let previous_type = std::mem::replace(&mut self.declared_type, declared);
        let previous_member = std::mem::replace(&mut self.member_name, member);

        let result = step(self);

        self.member_name = previous_member;
        self.declared_type = previous_type;
        self.path.pop();
        result
    }

    /// Generator failure at the current path.
    pub fn generator_error(&self, message: impl Into<String>) -> PopulateError {
        PopulateError::Generator {
            path: self.diagnostic_path(),
            message: message.into(),
        }
    }

    pub(crate) fn chain(&self) -> GeneratorChain<'a> {
        self.chain
    }
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use seedfill_core::ScalarKind;

    use super::*;
    use crate::generators::GeneratorRegistry;

    fn with_context<R>(seed: i64, f: impl FnOnce(&mut Context<'_>) -> R) -> R {
        let types = TypeRegistry::new();
        let options = PopulateOptions::default();
        let generators = GeneratorRegistry::new();
        let mut ctx = Context::new(
            seed,
            TypeRef::named("Root"),
            &types,
            &options,
            generators.chain(&[]),
        );
        f(&mut ctx)
    }

    #[test]
    fn diagnostic_path_is_innermost_first() {
        with_context(7, |ctx| {
            let path = ctx
                .descend(
                    PathElement::setter("setIntermediateClass", "Wrapper"),
                    TypeRef::named("IntermediateClass"),
                    |ctx| {
                        ctx.descend(
                            PathElement::setter("setNoArgConstructorMissing", "IntermediateClass"),
                            TypeRef::named("NoArgConstructorMissing"),
                            |ctx| Ok(ctx.diagnostic_path()),
                        )
                    },
                )
                .expect("descend");
            assert_eq!(path, "setNoArgConstructorMissing<-setIntermediateClass");
        });
    }

    #[test]
    fn descend_restores_state_on_failure() {
        with_context(7, |ctx| {
            let result: Result<(), _> = ctx.descend(
                PathElement::parameter("arg", "Pojo"),
                TypeRef::Scalar(ScalarKind::Text),
                |ctx| {
                    assert_eq!(ctx.member_name(), Some("arg"));
                    assert_eq!(ctx.declaring_type(), Some("Pojo"));
                    Err(ctx.generator_error("boom"))
                },
            );
            assert!(matches!(
                result,
                Err(PopulateError::Generator { ref path, .. }) if path == "arg"
            ));
            assert_eq!(ctx.depth(), 0);
            assert_eq!(ctx.declared_type(), &TypeRef::named("Root"));
            assert_eq!(ctx.member_name(), None);
        });
    }

    #[test]
    fn element_frames_keep_member_name() {
        with_context(1, |ctx| {
            ctx.descend(
                PathElement::setter("setNames", "Pojo"),
                TypeRef::list(TypeRef::Scalar(ScalarKind::Text)),
                |ctx| {
                    assert_eq!(ctx.generic_type(), Some(&TypeRef::Scalar(ScalarKind::Text)));
                    ctx.descend(
                        PathElement::element("[0]", "List<string>"),
                        TypeRef::Scalar(ScalarKind::Text),
                        |ctx| {
                            assert_eq!(ctx.member_name(), Some("setNames"));
                            assert_eq!(ctx.property_name().as_deref(), Some("names"));
                            assert_eq!(ctx.path_key(), "setNames/[0]");
                            Ok(())
                        },
                    )
                },
            )
            .expect("descend");
        });
    }

    #[test]
    fn rng_depends_on_seed_and_path() {
        let root = with_context(-1, |ctx| ctx.rng().random::<u64>());
        let again = with_context(-1, |ctx| ctx.rng().random::<u64>());
        let other_seed = with_context(1, |ctx| ctx.rng().random::<u64>());
        let nested = with_context(-1, |ctx| {
            ctx.descend(
                PathElement::setter("setA", "Pojo"),
                TypeRef::Scalar(ScalarKind::Int),
                |ctx| Ok(ctx.rng().random::<u64>()),
            )
            .expect("descend")
        });
        assert_eq!(root, again);
        assert_ne!(root, other_seed);
        assert_ne!(root, nested);
    }
}

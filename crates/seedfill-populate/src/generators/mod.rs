//! Value generators and their resolution chain.

pub mod custom;
pub mod defaults;
pub mod specific;

use std::fmt;
use std::sync::Arc;

use seedfill_core::Value;

use crate::context::Context;
use crate::errors::PopulateError;

/// Strategy producing a value for the declared type at the current path.
pub trait ValueGenerator: Send + Sync {
    fn id(&self) -> &str;

    /// Whether this generator handles the current position.
    fn is_applicable(&self, ctx: &Context<'_>) -> bool;

    /// Produces a value conforming to `ctx.declared_type()`. Nested values
    /// must be resolved through [`Context::generate`].
    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError>;
}

pub type SharedGenerator = Arc<dyn ValueGenerator>;

/// Priority tier a generator was selected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GeneratorTier {
    Custom,
    Specific,
    Default,
}

impl fmt::Display for GeneratorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeneratorTier::Custom => "custom",
            GeneratorTier::Specific => "specific",
            GeneratorTier::Default => "default",
        })
    }
}

/// Specific and default generators known to a populator.
#[derive(Clone)]
pub struct GeneratorRegistry {
    specific: Vec<SharedGenerator>,
    defaults: Vec<SharedGenerator>,
}

impl GeneratorRegistry {
    /// Registry with every built-in default generator.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        defaults::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            specific: Vec::new(),
            defaults: Vec::new(),
        }
    }

    pub fn register_specific(&mut self, generator: impl ValueGenerator + 'static) {
        self.specific.push(Arc::new(generator));
    }

    pub fn register_default(&mut self, generator: impl ValueGenerator + 'static) {
        self.defaults.push(Arc::new(generator));
    }

    pub fn generator(&self, id: &str) -> Option<&SharedGenerator> {
        self.specific
            .iter()
            .chain(&self.defaults)
            .find(|generator| generator.id() == id)
    }

    pub fn generator_ids(&self) -> Vec<&str> {
        self.specific
            .iter()
            .chain(&self.defaults)
            .map(|generator| generator.id())
            .collect()
    }

    /// Resolution chain for one call: `custom` first, in the given order.
    pub fn chain<'a>(&'a self, custom: &'a [SharedGenerator]) -> GeneratorChain<'a> {
        GeneratorChain {
            custom,
            specific: &self.specific,
            defaults: &self.defaults,
        }
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("ids", &self.generator_ids())
            .finish()
    }
}

/// Ordered custom → specific → default lookup.
#[derive(Clone, Copy)]
pub struct GeneratorChain<'a> {
    custom: &'a [SharedGenerator],
    specific: &'a [SharedGenerator],
    defaults: &'a [SharedGenerator],
}

impl<'a> GeneratorChain<'a> {
    /// First applicable generator; registration order breaks ties within
    /// a tier.
    pub fn resolve(&self, ctx: &Context<'_>) -> Option<(GeneratorTier, &'a SharedGenerator)> {
        [
            (GeneratorTier::Custom, self.custom),
            (GeneratorTier::Specific, self.specific),
            (GeneratorTier::Default, self.defaults),
        ]
        .into_iter()
        .find_map(|(tier, generators)| {
            generators
                .iter()
                .find(|generator| generator.is_applicable(ctx))
                .map(|generator| (tier, generator))
        })
    }
}

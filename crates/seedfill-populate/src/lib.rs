//! Deterministic object-graph population for seedfill.
//!
//! Given a [`TypeRef`](seedfill_core::TypeRef) described in a
//! [`TypeRegistry`](seedfill_core::TypeRegistry) and a seed, the
//! [`Populator`] builds a fully populated [`Value`](seedfill_core::Value):
//! nested objects are instantiated through their constructors and setters,
//! containers are filled element by element, and every leaf is drawn from a
//! random source derived from `(seed, path)`. Repeated calls with the same
//! inputs produce identical graphs.

pub mod context;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod resolver;
pub mod typed;

pub use context::{Context, FrameKind, PathElement};
pub use engine::Populator;
pub use errors::{Ambiguity, PopulateError};
pub use generators::custom::FnGenerator;
pub use generators::specific::{ConstantGenerator, FilledListGenerator, FilledMapGenerator};
pub use generators::{
    GeneratorChain, GeneratorRegistry, GeneratorTier, SharedGenerator, ValueGenerator,
};
pub use model::PopulateOptions;
pub use typed::{Describe, from_value, populate, populate_with_options};

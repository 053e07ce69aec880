use std::fmt;
use std::sync::Arc;

use seedfill_core::{TypeRef, Value};

use crate::context::Context;
use crate::errors::PopulateError;
use crate::generators::ValueGenerator;

type GenerateFn = Arc<dyn Fn(&mut Context<'_>) -> Result<Value, PopulateError> + Send + Sync>;
type PredicateFn = Arc<dyn Fn(&Context<'_>) -> bool + Send + Sync>;

/// Closure-backed generator, usually passed as a custom generator.
///
/// ```
/// use seedfill_populate::FnGenerator;
/// use seedfill_core::{ScalarKind, Value};
///
/// let cool = FnGenerator::for_type(ScalarKind::Text.into(), |_| {
///     Ok(Value::Text("Always Cool".to_string()))
/// })
/// .when(|ctx| ctx.declaring_type() == Some("DemoPojo"));
/// ```
#[derive(Clone)]
pub struct FnGenerator {
    id: String,
    ty: TypeRef,
    member: Option<String>,
    predicates: Vec<PredicateFn>,
    generate: GenerateFn,
}

impl FnGenerator {
    /// Applies wherever the value type (declared type without `Optional`)
    /// equals `ty`.
    pub fn for_type<F>(ty: TypeRef, generate: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<Value, PopulateError> + Send + Sync + 'static,
    {
        Self {
            id: format!("custom.{ty}"),
            ty,
            member: None,
            predicates: Vec::new(),
            generate: Arc::new(generate),
        }
    }

    /// Applies to `ty` only under the setter or parameter named `member`.
    pub fn for_member<F>(ty: TypeRef, member: impl Into<String>, generate: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<Value, PopulateError> + Send + Sync + 'static,
    {
        let member = member.into();
        let mut generator = Self::for_type(ty, generate);
        generator.id = format!("custom.{}.{member}", generator.ty);
        generator.member = Some(member);
        generator
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Adds a predicate that must also hold for the generator to apply.
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }
}

impl ValueGenerator for FnGenerator {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        if ctx.value_type() != &self.ty {
            return false;
        }
        if let Some(member) = &self.member
            && ctx.member_name() != Some(member.as_str())
        {
            return false;
        }
        self.predicates.iter().all(|predicate| predicate(ctx))
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        (self.generate)(ctx)
    }
}

impl fmt::Debug for FnGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGenerator")
            .field("id", &self.id)
            .field("ty", &self.ty)
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}

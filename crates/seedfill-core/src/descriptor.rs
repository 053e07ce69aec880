//! Descriptors of enums and objects.
//!
//! An [`ObjectType`] lists what population may touch on a type: declared
//! fields, setters (possibly overloaded, of any arity) and constructors. Each
//! setter and constructor carries an invoker closure that operates on the
//! [`Record`] backing the object.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, InvokeError, Result};
use crate::types::TypeRef;
use crate::value::{Record, Value};

/// Invoker of a setter: receives the target record and the arguments.
pub type SetterFn =
    Arc<dyn Fn(&mut Record, Vec<Value>) -> std::result::Result<(), InvokeError> + Send + Sync>;

/// Invoker of a constructor: receives the arguments and builds a record.
pub type ConstructorFn =
    Arc<dyn Fn(Vec<Value>) -> std::result::Result<Record, InvokeError> + Send + Sync>;

/// Named constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Declared field of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    /// Read-only fields have no generated setter.
    pub read_only: bool,
}

#[derive(Clone)]
pub struct SetterDef {
    name: String,
    params: Vec<TypeRef>,
    invoker: SetterFn,
}

impl SetterDef {
    pub fn new<F>(name: impl Into<String>, params: Vec<TypeRef>, invoker: F) -> Self
    where
        F: Fn(&mut Record, Vec<Value>) -> std::result::Result<(), InvokeError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            invoker: Arc::new(invoker),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Declared parameter type when the setter takes exactly one argument.
    pub fn single_param(&self) -> Option<&TypeRef> {
        match self.params.as_slice() {
            [param] => Some(param),
            _ => None,
        }
    }

    pub fn invoke(
        &self,
        record: &mut Record,
        args: Vec<Value>,
    ) -> std::result::Result<(), InvokeError> {
        if args.len() != self.params.len() {
            return Err(InvokeError(format!(
                "setter '{}' expects {} argument(s), got {}",
                self.name,
                self.params.len(),
                args.len()
            )));
        }
        (self.invoker)(record, args)
    }
}

impl fmt::Debug for SetterDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetterDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct ConstructorDef {
    params: Vec<Param>,
    invoker: ConstructorFn,
}

impl ConstructorDef {
    pub fn new<F>(params: Vec<Param>, invoker: F) -> Self
    where
        F: Fn(Vec<Value>) -> std::result::Result<Record, InvokeError> + Send + Sync + 'static,
    {
        Self {
            params,
            invoker: Arc::new(invoker),
        }
    }

    /// Constructor producing an empty record of `type_name`.
    pub fn no_arg(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self::new(Vec::new(), move |_| Ok(Record::new(type_name.clone())))
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_no_arg(&self) -> bool {
        self.params.is_empty()
    }

    pub fn invoke(&self, args: Vec<Value>) -> std::result::Result<Record, InvokeError> {
        if args.len() != self.params.len() {
            return Err(InvokeError(format!(
                "constructor expects {} argument(s), got {}",
                self.params.len(),
                args.len()
            )));
        }
        (self.invoker)(args)
    }
}

impl fmt::Debug for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Enum with its declared constant set, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    constants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constants(&self) -> &[String] {
        &self.constants
    }

    pub fn contains(&self, constant: &str) -> bool {
        self.constants.iter().any(|c| c == constant)
    }

    /// Value for a declared constant, or `None` when it is not declared.
    pub fn value(&self, constant: &str) -> Option<Value> {
        self.contains(constant).then(|| Value::Enum {
            type_name: self.name.clone(),
            constant: constant.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    name: String,
    fields: Vec<FieldDef>,
    setters: Vec<SetterDef>,
    constructors: Vec<ConstructorDef>,
}

impl ObjectType {
    pub fn builder(name: impl Into<String>) -> ObjectTypeBuilder {
        ObjectTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn setters(&self) -> &[SetterDef] {
        &self.setters
    }

    pub fn constructors(&self) -> &[ConstructorDef] {
        &self.constructors
    }

    pub fn no_arg_constructor(&self) -> Option<&ConstructorDef> {
        self.constructors.iter().find(|ctor| ctor.is_no_arg())
    }

    /// A parameterized constructor is bound when every parameter names a
    /// declared field of this type and has that field's type.
    pub fn is_bound(&self, constructor: &ConstructorDef) -> bool {
        !constructor.is_no_arg()
            && constructor.params().iter().all(|param| {
                self.field(&param.name)
                    .is_some_and(|field| field.ty == param.ty)
            })
    }

    pub fn bound_constructors(&self) -> Vec<&ConstructorDef> {
        self.constructors
            .iter()
            .filter(|ctor| self.is_bound(ctor))
            .collect()
    }

    /// Every type reference mentioned by fields, setters and constructors.
    pub fn referenced_types(&self) -> Vec<&TypeRef> {
        let mut out: Vec<&TypeRef> = self.fields.iter().map(|field| &field.ty).collect();
        for setter in &self.setters {
            out.extend(setter.params());
        }
        for ctor in &self.constructors {
            out.extend(ctor.params().iter().map(|param| &param.ty));
        }
        out
    }
}

/// Builder for [`ObjectType`].
///
/// ```
/// use seedfill_core::{ObjectType, ScalarKind, TypeRef};
///
/// let pojo = ObjectType::builder("Pojo")
///     .no_arg_constructor()
///     .property("count", TypeRef::Scalar(ScalarKind::Int))
///     .build()
///     .expect("valid descriptor");
/// assert_eq!(pojo.setters()[0].name(), "setCount");
/// ```
#[derive(Debug)]
pub struct ObjectTypeBuilder {
    name: String,
    fields: Vec<FieldDef>,
    setters: Vec<SetterDef>,
    constructors: Vec<ConstructorDef>,
    required_args: Vec<Vec<String>>,
}

impl ObjectTypeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            setters: Vec::new(),
            constructors: Vec::new(),
            required_args: Vec::new(),
        }
    }

    pub fn no_arg_constructor(mut self) -> Self {
        self.constructors.push(ConstructorDef::no_arg(self.name.clone()));
        self
    }

    /// Declares a field together with its `set<Name>` setter.
    pub fn property(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        let name = name.into();
        let field = name.clone();
        self.setters.push(SetterDef::new(
            setter_name(&name),
            vec![ty.clone()],
            move |record, mut args| {
                let value = args
                    .pop()
                    .ok_or_else(|| InvokeError::new(format!("missing value for '{field}'")))?;
                record.set(field.clone(), value);
                Ok(())
            },
        ));
        self.fields.push(FieldDef {
            name,
            ty,
            read_only: false,
        });
        self
    }

    /// Declares a field without a setter.
    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            read_only: true,
        });
        self
    }

    pub fn setter<F>(mut self, name: impl Into<String>, params: Vec<TypeRef>, invoker: F) -> Self
    where
        F: Fn(&mut Record, Vec<Value>) -> std::result::Result<(), InvokeError> + Send + Sync + 'static,
    {
        self.setters.push(SetterDef::new(name, params, invoker));
        self
    }

    pub fn constructor<F>(mut self, params: Vec<Param>, invoker: F) -> Self
    where
        F: Fn(Vec<Value>) -> std::result::Result<Record, InvokeError> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorDef::new(params, invoker));
        self
    }

    /// Declares a constructor taking the named fields, in order, and storing
    /// each argument into its field. Field types are resolved at `build`.
    pub fn required_args_constructor<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_args
            .push(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<ObjectType> {
        let ObjectTypeBuilder {
            name,
            fields,
            setters,
            mut constructors,
            required_args,
        } = self;

        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate field '{}' on '{name}'",
                    field.name
                )));
            }
        }

        for (idx, setter) in setters.iter().enumerate() {
            let duplicate = setters[..idx]
                .iter()
                .any(|other| other.name() == setter.name() && other.params() == setter.params());
            if duplicate {
                return Err(Error::InvalidSchema(format!(
                    "duplicate setter '{}({})' on '{name}'",
                    setter.name(),
                    join_types(setter.params())
                )));
            }
        }

        if constructors.iter().filter(|ctor| ctor.is_no_arg()).count() > 1 {
            return Err(Error::InvalidSchema(format!(
                "duplicate no-argument constructor on '{name}'"
            )));
        }

        for bound in required_args {
            let mut params = Vec::with_capacity(bound.len());
            for field_name in &bound {
                let field = fields
                    .iter()
                    .find(|field| &field.name == field_name)
                    .ok_or_else(|| {
                        Error::InvalidSchema(format!(
                            "constructor on '{name}' binds unknown field '{field_name}'"
                        ))
                    })?;
                params.push(Param::new(field_name.clone(), field.ty.clone()));
            }
            let type_name = name.clone();
            constructors.push(ConstructorDef::new(params, move |args| {
                let mut record = Record::new(type_name.clone());
                for (field, value) in bound.iter().zip(args) {
                    record.set(field.clone(), value);
                }
                Ok(record)
            }));
        }

        Ok(ObjectType {
            name,
            fields,
            setters,
            constructors,
        })
    }
}

/// Registered descriptor.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Enum(EnumType),
    Object(ObjectType),
}

impl TypeDescriptor {
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Enum(enum_type) => enum_type.name(),
            TypeDescriptor::Object(object) => object.name(),
        }
    }
}

impl From<EnumType> for TypeDescriptor {
    fn from(value: EnumType) -> Self {
        TypeDescriptor::Enum(value)
    }
}

impl From<ObjectType> for TypeDescriptor {
    fn from(value: ObjectType) -> Self {
        TypeDescriptor::Object(value)
    }
}

/// Setter name generated for a property: `count` becomes `setCount`.
pub fn setter_name(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

fn join_types(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    fn int() -> TypeRef {
        TypeRef::Scalar(ScalarKind::Int)
    }

    #[test]
    fn property_setter_stores_field() {
        let object = ObjectType::builder("Pojo")
            .no_arg_constructor()
            .property("aBoolean", TypeRef::Scalar(ScalarKind::Bool))
            .build()
            .expect("build");
        let setter = &object.setters()[0];
        assert_eq!(setter.name(), "setABoolean");

        let mut record = Record::new("Pojo");
        setter
            .invoke(&mut record, vec![Value::Bool(true)])
            .expect("invoke");
        assert_eq!(record.get("aBoolean"), Some(&Value::Bool(true)));
        assert!(setter.invoke(&mut record, Vec::new()).is_err());
    }

    #[test]
    fn required_args_constructor_binds_fields() {
        let object = ObjectType::builder("Pojo")
            .field("id", int())
            .property("note", TypeRef::Scalar(ScalarKind::Text))
            .required_args_constructor(["id"])
            .build()
            .expect("build");
        let ctor = &object.constructors()[0];
        assert!(object.is_bound(ctor));
        assert_eq!(ctor.params()[0].ty, int());

        let record = ctor.invoke(vec![Value::Int(4)]).expect("invoke");
        assert_eq!(record.type_name(), "Pojo");
        assert_eq!(record.get("id"), Some(&Value::Int(4)));
    }

    #[test]
    fn unbound_constructor_is_not_eligible() {
        let object = ObjectType::builder("Lonely")
            .constructor(
                vec![Param::new("arg", TypeRef::Scalar(ScalarKind::Text))],
                |_| Ok(Record::new("Lonely")),
            )
            .build()
            .expect("build");
        assert!(object.no_arg_constructor().is_none());
        assert!(object.bound_constructors().is_empty());
    }

    #[test]
    fn constructor_with_mismatched_field_type_is_not_bound() {
        let object = ObjectType::builder("Pojo")
            .field("id", int())
            .constructor(
                vec![Param::new("id", TypeRef::Scalar(ScalarKind::Text))],
                |_| Ok(Record::new("Pojo")),
            )
            .build()
            .expect("build");
        assert!(!object.is_bound(&object.constructors()[0]));
        assert!(object.bound_constructors().is_empty());
    }

    #[test]
    fn build_rejects_inconsistent_descriptors() {
        let duplicate_field = ObjectType::builder("Pojo")
            .property("a", int())
            .field("a", int())
            .build();
        assert!(matches!(duplicate_field, Err(Error::InvalidSchema(_))));

        let unknown_bound = ObjectType::builder("Pojo")
            .required_args_constructor(["missing"])
            .build();
        assert!(matches!(unknown_bound, Err(Error::InvalidSchema(_))));

        let duplicate_setter = ObjectType::builder("Pojo")
            .property("a", int())
            .setter("setA", vec![int()], |_, _| Ok(()))
            .build();
        assert!(matches!(duplicate_setter, Err(Error::InvalidSchema(_))));
    }
}

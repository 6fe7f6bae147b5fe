//! Explicit introspection: the parameter lists and construction policy a type
//! publishes in place of runtime reflection.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ReflectionError;
use crate::helpers::{downcast, into_any, AnyRef, Opaque};
use crate::Ref;

pub trait Injectable: Any + Send + Sync + Sized {
  fn reflect() -> Class;
}

/// Capability of types whose constructor is not callable from outside but
/// which hand out a shared instance instead.
pub trait SingletonProvider: Injectable {
  fn instance() -> Ref<Self>;
}

pub fn identifier<T: ?Sized + 'static>() -> &'static str {
  type_name::<T>()
}

type Body = Arc<dyn Fn(Arguments) -> anyhow::Result<AnyRef> + Send + Sync>;
type MethodBody = Arc<dyn Fn(&AnyRef, Arguments) -> anyhow::Result<AnyRef> + Send + Sync>;
type Accessor = Arc<dyn Fn() -> AnyRef + Send + Sync>;

#[derive(Clone, Copy)]
pub struct TypeHint {
  name: &'static str,
  class: Option<fn() -> Class>,
}

impl TypeHint {
  pub fn named<T: ?Sized + 'static>() -> Self {
    TypeHint {
      name: identifier::<T>(),
      class: None,
    }
  }

  pub fn class<T: Injectable>() -> Self {
    TypeHint {
      name: identifier::<T>(),
      class: Some(T::reflect),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub(crate) fn loader(&self) -> Option<fn() -> Class> {
    self.class
  }
}

impl fmt::Debug for TypeHint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeHint")
      .field("name", &self.name)
      .field("injectable", &self.class.is_some())
      .finish()
  }
}

#[derive(Clone)]
pub struct Parameter {
  name: String,
  position: usize,
  ty: Option<TypeHint>,
  default: Option<AnyRef>,
}

impl Parameter {
  pub fn untyped(name: impl Into<String>) -> Self {
    Parameter {
      name: name.into(),
      position: 0,
      ty: None,
      default: None,
    }
  }

  pub fn of<T: Injectable>(name: impl Into<String>) -> Self {
    Parameter {
      ty: Some(TypeHint::class::<T>()),
      ..Parameter::untyped(name)
    }
  }

  pub fn typed<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
    Parameter {
      ty: Some(TypeHint::named::<T>()),
      ..Parameter::untyped(name)
    }
  }

  pub fn with_default<T>(mut self, value: T) -> Self
    where T: Any + Send + Sync
  {
    self.default = Some(into_any(value));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn type_hint(&self) -> Option<&TypeHint> {
    self.ty.as_ref()
  }

  pub fn is_default_value_available(&self) -> bool {
    self.default.is_some()
  }

  pub fn default_value(&self) -> Option<AnyRef> {
    self.default.clone()
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("position", &self.position)
      .field("type", &self.ty.map(|ty| ty.name))
      .field("default", &self.default.is_some())
      .finish()
  }
}

fn push_param(params: &mut Vec<Parameter>, mut param: Parameter) {
  param.position = params.len();
  params.push(param);
}

#[derive(Clone, Default)]
pub struct Arguments {
  values: Vec<AnyRef>,
}

impl Arguments {
  pub fn new(values: Vec<AnyRef>) -> Self {
    Arguments { values }
  }

  pub fn get<T>(&self, position: usize) -> Result<Ref<T>, ReflectionError>
    where T: Any + Send + Sync
  {
    let value = self.raw(position)?;
    downcast::<T>(&value).ok_or(ReflectionError::ArgumentType {
      position,
      expected: type_name::<T>(),
    })
  }

  pub fn value<T>(&self, position: usize) -> Result<T, ReflectionError>
    where T: Any + Send + Sync + Clone
  {
    self.get::<T>(position).map(|value| (*value).clone())
  }

  pub fn raw(&self, position: usize) -> Result<AnyRef, ReflectionError> {
    self.values
      .get(position)
      .cloned()
      .ok_or(ReflectionError::MissingArgument { position })
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl fmt::Debug for Arguments {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Arguments")
      .field("len", &self.values.len())
      .finish()
  }
}

#[derive(Clone)]
pub struct Function {
  params: Vec<Parameter>,
  body: Body,
}

impl Function {
  pub fn new<T, F>(body: F) -> Self
    where
      T: Any + Send + Sync,
      F: Fn(Arguments) -> anyhow::Result<T> + Send + Sync + 'static,
  {
    Function {
      params: Vec::new(),
      body: Arc::new(move |args: Arguments| body(args).map(into_any)),
    }
  }

  pub fn shared<F>(body: F) -> Self
    where F: Fn(Arguments) -> anyhow::Result<AnyRef> + Send + Sync + 'static
  {
    Function {
      params: Vec::new(),
      body: Arc::new(body),
    }
  }

  pub fn param(mut self, param: Parameter) -> Self {
    push_param(&mut self.params, param);
    self
  }

  pub fn params(&self) -> &[Parameter] {
    &self.params
  }

  pub(crate) fn call(&self, args: Arguments) -> anyhow::Result<AnyRef> {
    (self.body)(args)
  }
}

impl fmt::Debug for Function {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Function")
      .field("params", &self.params)
      .field("body", &Opaque("closure"))
      .finish()
  }
}

#[derive(Clone)]
pub struct Method {
  params: Vec<Parameter>,
  body: MethodBody,
}

impl Method {
  pub fn new<S, T, F>(body: F) -> Self
    where
      S: Any + Send + Sync,
      T: Any + Send + Sync,
      F: Fn(&S, Arguments) -> anyhow::Result<T> + Send + Sync + 'static,
  {
    Method {
      params: Vec::new(),
      body: Arc::new(move |receiver: &AnyRef, args: Arguments| -> anyhow::Result<AnyRef> {
        let receiver = receiver
          .downcast_ref::<S>()
          .ok_or(ReflectionError::Receiver { expected: type_name::<S>() })?;
        body(receiver, args).map(into_any)
      }),
    }
  }

  pub fn param(mut self, param: Parameter) -> Self {
    push_param(&mut self.params, param);
    self
  }

  pub fn params(&self) -> &[Parameter] {
    &self.params
  }

  pub(crate) fn call(&self, receiver: &AnyRef, args: Arguments) -> anyhow::Result<AnyRef> {
    (self.body)(receiver, args)
  }
}

impl fmt::Debug for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Method")
      .field("params", &self.params)
      .finish()
  }
}

#[derive(Clone)]
pub enum Constructor {
  /// The type declares no constructor and is built without arguments.
  Implicit(Arc<dyn Fn() -> AnyRef + Send + Sync>),
  Public(Function),
  /// The constructor cannot be called from outside the type.
  Restricted { accessor: Option<Accessor> },
}

impl fmt::Debug for Constructor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Constructor::Implicit(_) => f.write_str("Implicit"),
      Constructor::Public(function) => f.debug_tuple("Public").field(function).finish(),
      Constructor::Restricted { accessor } => f
        .debug_struct("Restricted")
        .field("accessor", &accessor.is_some())
        .finish(),
    }
  }
}

#[derive(Clone, Debug)]
pub struct Class {
  name: &'static str,
  type_id: TypeId,
  constructor: Constructor,
  methods: HashMap<String, Method>,
}

impl Class {
  pub fn new<T: Any + Send + Sync>(constructor: Function) -> Self {
    Class::with_constructor::<T>(Constructor::Public(constructor))
  }

  pub fn implicit<T>() -> Self
    where T: Any + Send + Sync + Default
  {
    Class::with_constructor::<T>(Constructor::Implicit(Arc::new(|| into_any(T::default()))))
  }

  pub fn restricted<T: Any + Send + Sync>() -> Self {
    Class::with_constructor::<T>(Constructor::Restricted { accessor: None })
  }

  pub fn singleton<T: SingletonProvider>() -> Self {
    let accessor: Accessor = Arc::new(|| T::instance() as AnyRef);
    Class::with_constructor::<T>(Constructor::Restricted {
      accessor: Some(accessor),
    })
  }

  pub fn with_constructor<T: Any + Send + Sync>(constructor: Constructor) -> Self {
    Class {
      name: identifier::<T>(),
      type_id: TypeId::of::<T>(),
      constructor,
      methods: HashMap::new(),
    }
  }

  pub fn method(mut self, name: impl Into<String>, method: Method) -> Self {
    self.methods.insert(name.into(), method);
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn constructor(&self) -> &Constructor {
    &self.constructor
  }

  pub fn constructor_params(&self) -> &[Parameter] {
    match &self.constructor {
      Constructor::Public(function) => function.params(),
      _ => &[],
    }
  }

  pub fn get_method(&self, name: &str) -> Option<&Method> {
    self.methods.get(name)
  }

  pub fn has_method(&self, name: &str) -> bool {
    self.methods.contains_key(name)
  }
}

use crate::container::Container;
use crate::error::Error;
use crate::helpers::{downcast, AnyRef};
use crate::reflect::{identifier, Function};
use crate::Ref;
use std::any::Any;

/// Something the [`Invoker`] can call.
#[derive(Debug, Clone)]
pub enum Action {
    Callable(Function),
    /// `[class identifier, method name]`
    Pair(Vec<String>),
}

impl Action {
    pub fn method(class: &str, method: &str) -> Self {
        Action::Pair(vec![class.to_owned(), method.to_owned()])
    }
}

impl From<Function> for Action {
    fn from(function: Function) -> Self {
        Action::Callable(function)
    }
}

impl From<(&str, &str)> for Action {
    fn from((class, method): (&str, &str)) -> Self {
        Action::method(class, method)
    }
}

impl From<&[&str]> for Action {
    fn from(parts: &[&str]) -> Self {
        Action::Pair(parts.iter().map(|part| (*part).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Action {
    fn from(parts: [&str; N]) -> Self {
        Action::from(&parts[..])
    }
}

impl From<Vec<String>> for Action {
    fn from(parts: Vec<String>) -> Self {
        Action::Pair(parts)
    }
}

/// Calls closures and methods with arguments resolved from a container.
#[derive(Debug, Clone)]
pub struct Invoker {
    container: Container,
}

impl Invoker {
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn invoke(&self, action: impl Into<Action>) -> Result<AnyRef, Error> {
        match action.into() {
            Action::Callable(function) => {
                tracing::debug!("invoking closure with {} params", function.params().len());
                self.container.call(&function)
            }
            Action::Pair(parts) => match parts.as_slice() {
                [class, method, ..] => self.execute_class_method(class, method),
                _ => Err(Error::MalformedAction(parts.join(", "))),
            },
        }
    }

    pub fn invoke_as<T>(&self, action: impl Into<Action>) -> Result<Ref<T>, Error>
    where
        T: Any + Send + Sync,
    {
        let value = self.invoke(action)?;
        downcast::<T>(&value).ok_or_else(|| Error::TypeMismatch {
            id: "invocation result".to_owned(),
            expected: identifier::<T>(),
        })
    }

    fn execute_class_method(&self, class: &str, method: &str) -> Result<AnyRef, Error> {
        let instance = self.container.get(class)?;
        let target = self
            .container
            .class_of(&instance)
            .and_then(|reflected| reflected.get_method(method).cloned())
            .ok_or_else(|| Error::MethodNotFound {
                class: class.to_owned(),
                method: method.to_owned(),
            })?;

        tracing::debug!("invoking '{}::{}'", class, method);
        let args = self.container.argument_resolver().resolve(target.params())?;
        target.call(&instance, args).map_err(Error::from_user)
    }
}

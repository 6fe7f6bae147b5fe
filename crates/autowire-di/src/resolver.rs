use crate::container::{Container, Lookup};
use crate::error::Error;
use crate::helpers::AnyRef;
use crate::reflect::{Arguments, Parameter};
use std::cell::RefCell;

thread_local! {
    // Keys currently under construction on this thread, tagged with the
    // owning container so that separate containers never see each other.
    static RESOLVING: RefCell<Vec<(usize, String)>> = RefCell::new(Vec::new());
}

/// Marks a key as under construction until dropped.
pub(crate) struct ResolutionGuard {
    owner: usize,
}

impl ResolutionGuard {
    pub(crate) fn enter(owner: usize, key: &str) -> Result<Self, Error> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(o, k)| *o == owner && k == key) {
                let mut chain: Vec<String> = stack
                    .iter()
                    .filter(|(o, _)| *o == owner)
                    .map(|(_, k)| k.clone())
                    .collect();
                chain.push(key.to_owned());
                return Err(Error::CircularDependency(chain));
            }
            stack.push((owner, key.to_owned()));
            Ok(ResolutionGuard { owner })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(index) = stack.iter().rposition(|(o, _)| *o == self.owner) {
                stack.remove(index);
            }
        });
    }
}

/// Turns parameter lists into positional arguments, resolving typed
/// parameters through the container and falling back to declared defaults.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentResolver<'a> {
    container: &'a Container,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn resolve(&self, params: &[Parameter]) -> Result<Arguments, Error> {
        let mut values = Vec::with_capacity(params.len());
        for param in params {
            let value = self.resolve_parameter(param)?;
            values.push(value);
        }
        Ok(Arguments::new(values))
    }

    fn resolve_parameter(&self, param: &Parameter) -> Result<AnyRef, Error> {
        let hint = match param.type_hint() {
            Some(hint) => hint,
            None => return Self::fallback(param),
        };

        if let Some(loader) = hint.loader() {
            self.container.autoload(hint.name(), loader);
        }

        match self.container.lookup(hint.name()) {
            Ok(Lookup::Found(value)) => Ok(value),
            Ok(Lookup::Missing(key)) | Err(Error::NotFound(key)) => {
                tracing::trace!("argument '{}': '{}' not in container", param.name(), key);
                Self::fallback(param)
            }
            Err(err) => Err(err),
        }
    }

    fn fallback(param: &Parameter) -> Result<AnyRef, Error> {
        param
            .default_value()
            .ok_or_else(|| Error::unresolved(param.name()))
    }
}

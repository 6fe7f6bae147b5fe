//! An autowiring dependency injection container.
//!
//! Entries are looked up by string identifier. Aliases redirect one identifier
//! to another, factories build entries on demand and types implementing
//! [`Injectable`] are constructed by resolving their constructor parameters
//! through the container. Every built entry is cached, so each identifier
//! resolves to one shared instance per container.
//!
//! ```
//! use autowire_di::{Class, Container, Function, Injectable, Parameter, Ref};
//!
//! #[derive(Default)]
//! struct Inner;
//!
//! impl Injectable for Inner {
//!     fn reflect() -> Class {
//!         Class::implicit::<Self>()
//!     }
//! }
//!
//! struct Outer {
//!     inner: Ref<Inner>,
//!     retries: u32,
//! }
//!
//! impl Injectable for Outer {
//!     fn reflect() -> Class {
//!         Class::new::<Self>(
//!             Function::new(|args| {
//!                 Ok(Outer {
//!                     inner: args.get(0)?,
//!                     retries: args.value(1)?,
//!                 })
//!             })
//!             .param(Parameter::of::<Inner>("inner"))
//!             .param(Parameter::untyped("retries").with_default(3u32)),
//!         )
//!     }
//! }
//!
//! let container = Container::new();
//! let outer = container.resolve::<Outer>().unwrap();
//! assert_eq!(outer.retries, 3);
//! assert!(std::sync::Arc::ptr_eq(&outer.inner, &container.resolve::<Inner>().unwrap()));
//! ```

mod container;
pub use container::{Container, Hook};
mod error;
pub use error::{Error, ReflectionError};
mod helpers;
pub use helpers::AnyRef;
mod invoker;
pub use invoker::{Action, Invoker};
mod reflect;
pub use reflect::{
    identifier, Arguments, Class, Constructor, Function, Injectable, Method, Parameter,
    SingletonProvider, TypeHint,
};
mod resolver;
pub use resolver::ArgumentResolver;

use std::sync::Arc;

pub type Ref<T> = Arc<T>;

/// Declarative bindings applied to a fresh container by [`ContainerFactory`].
pub trait ContainerConfig {
    /// `(abstract, concrete)` pairs.
    fn aliases(&self) -> Vec<(String, String)>;
    fn factories(&self) -> Vec<(String, Function)>;
    fn on_after_build_handlers(&self) -> Vec<Hook>;
}

#[derive(Debug, Clone, Copy)]
pub struct ContainerFactory;

impl ContainerFactory {
    /// Applies aliases, then factories, then hooks.
    pub fn create<C>(config: &C) -> Container
    where
        C: ContainerConfig + ?Sized,
    {
        let container = Container::new();

        for (alias, concrete) in config.aliases() {
            container.bind(&alias, &concrete);
        }

        for (id, factory) in config.factories() {
            container.set_factory(&id, factory);
        }

        for hook in config.on_after_build_handlers() {
            container.add_hook(hook);
        }

        tracing::debug!("container created: {:?}", container);
        container
    }
}

impl Container {
    pub fn build() -> ContainerBuilder {
        ContainerBuilder::default()
    }
}

#[derive(Default, Clone)]
pub struct ContainerBuilder {
    aliases: Vec<(String, String)>,
    factories: Vec<(String, Function)>,
    hooks: Vec<Hook>,
}

impl ContainerBuilder {
    pub fn bind(&mut self, alias: &str, concrete: &str) -> &mut Self {
        self.aliases.push((alias.to_owned(), concrete.to_owned()));
        self
    }

    pub fn factory(&mut self, id: &str, factory: Function) -> &mut Self {
        self.factories.push((id.to_owned(), factory));
        self
    }

    pub fn on_after_build<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(AnyRef, &Container) -> AnyRef + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(handler));
        self
    }

    pub fn finalize(&self) -> Container {
        ContainerFactory::create(self)
    }
}

impl ContainerConfig for ContainerBuilder {
    fn aliases(&self) -> Vec<(String, String)> {
        self.aliases.clone()
    }

    fn factories(&self) -> Vec<(String, Function)> {
        self.factories.clone()
    }

    fn on_after_build_handlers(&self) -> Vec<Hook> {
        self.hooks.clone()
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("aliases", &self.aliases)
            .field("factories", &self.factories.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

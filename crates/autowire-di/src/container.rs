use crate::error::Error;
use crate::helpers::{downcast, into_any, AnyRef};
use crate::reflect::{identifier, Class, Constructor, Function, Injectable};
use crate::resolver::{ArgumentResolver, ResolutionGuard};
use crate::Ref;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

pub type Hook = Arc<dyn Fn(AnyRef, &Container) -> AnyRef + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Lookup {
    Found(AnyRef),
    Missing(String),
}

#[derive(Default)]
struct Tables {
    aliases: HashMap<String, String>,
    factories: HashMap<String, Function>,
    cache: HashMap<String, AnyRef>,
    hooks: Vec<Hook>,
    classes: HashMap<String, Arc<Class>>,
    class_by_type: HashMap<TypeId, String>,
    // hooked self handle, held weakly
    own: Option<Weak<dyn Any + Send + Sync>>,
}

/// Cloning a `Container` yields another handle to the same tables.
#[derive(Clone, Default)]
pub struct Container {
    tables: Arc<RwLock<Tables>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Result<AnyRef, Error> {
        match self.lookup(id)? {
            Lookup::Found(value) => Ok(value),
            Lookup::Missing(key) => Err(Error::NotFound(key)),
        }
    }

    pub fn get_as<T>(&self, id: &str) -> Result<Ref<T>, Error>
    where
        T: Any + Send + Sync,
    {
        let value = self.get(id)?;
        downcast::<T>(&value).ok_or_else(|| Error::TypeMismatch {
            id: id.to_owned(),
            expected: identifier::<T>(),
        })
    }

    pub fn resolve<T: Injectable>(&self) -> Result<Ref<T>, Error> {
        self.autoload(identifier::<T>(), T::reflect);
        self.get_as::<T>(identifier::<T>())
    }

    pub fn has(&self, id: &str) -> bool {
        let tables = self.tables.read();
        let key = Self::concrete(&tables, id);
        tables.cache.contains_key(key)
            || tables.factories.contains_key(key)
            || tables.classes.contains_key(key)
            || key == identifier::<Container>()
    }

    /// Stores `value` under `id`, replacing any cached entry. Hooks are not applied.
    pub fn set<T>(&self, id: &str, value: T) -> &Self
    where
        T: Any + Send + Sync,
    {
        self.set_shared(id, into_any(value))
    }

    pub fn set_shared(&self, id: &str, value: AnyRef) -> &Self {
        let mut tables = self.tables.write();
        let key = Self::concrete(&tables, id).to_owned();
        tracing::debug!("set '{}'", key);
        tables.cache.insert(key, value);
        self
    }

    pub fn set_factory(&self, id: &str, factory: Function) -> &Self {
        let mut tables = self.tables.write();
        let key = Self::concrete(&tables, id).to_owned();
        if tables.cache.remove(&key).is_some() {
            tracing::debug!("evicted cached '{}' for new factory", key);
        }
        tables.factories.insert(key, factory);
        self
    }

    /// Makes `alias` resolve to `concrete`. Aliases are followed one hop only.
    pub fn bind(&self, alias: &str, concrete: &str) -> &Self {
        self.tables
            .write()
            .aliases
            .insert(alias.to_owned(), concrete.to_owned());
        self
    }

    pub fn set_on_after_build_handler<F>(&self, handler: F) -> &Self
    where
        F: Fn(AnyRef, &Container) -> AnyRef + Send + Sync + 'static,
    {
        self.add_hook(Arc::new(handler))
    }

    pub(crate) fn add_hook(&self, hook: Hook) -> &Self {
        self.tables.write().hooks.push(hook);
        self
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut tables = self.tables.write();
        let key = Self::concrete(&tables, id).to_owned();
        let cached = tables.cache.remove(&key).is_some();
        let factory = tables.factories.remove(&key).is_some();
        if key == identifier::<Container>() {
            tables.own = None;
        }
        cached || factory
    }

    pub fn register<T: Injectable>(&self) -> &Self {
        self.register_class(T::reflect())
    }

    pub fn register_class(&self, class: Class) -> &Self {
        let mut tables = self.tables.write();
        tables
            .class_by_type
            .insert(class.type_id(), class.name().to_owned());
        tables.classes.insert(class.name().to_owned(), Arc::new(class));
        self
    }

    pub(crate) fn autoload(&self, name: &str, loader: fn() -> Class) {
        if self.tables.read().classes.contains_key(name) {
            return;
        }
        let class = loader();
        let mut tables = self.tables.write();
        if !tables.classes.contains_key(name) {
            tables
                .class_by_type
                .insert(class.type_id(), class.name().to_owned());
            tables.classes.insert(name.to_owned(), Arc::new(class));
        }
    }

    pub(crate) fn class_of(&self, value: &AnyRef) -> Option<Arc<Class>> {
        let type_id = (**value).type_id();
        let tables = self.tables.read();
        let name = tables.class_by_type.get(&type_id)?;
        tables.classes.get(name).cloned()
    }

    pub fn same(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.tables, &other.tables)
    }

    pub fn argument_resolver(&self) -> ArgumentResolver<'_> {
        ArgumentResolver::new(self)
    }

    pub(crate) fn lookup(&self, id: &str) -> Result<Lookup, Error> {
        let (key, factory, class) = {
            let tables = self.tables.read();
            let key = Self::concrete(&tables, id).to_owned();
            if let Some(value) = tables.cache.get(&key) {
                tracing::trace!("cache hit '{}'", key);
                return Ok(Lookup::Found(value.clone()));
            }
            let factory = tables.factories.get(&key).cloned();
            if factory.is_none() && key == identifier::<Container>() {
                if let Some(value) = tables.own.as_ref().and_then(Weak::upgrade) {
                    return Ok(Lookup::Found(value));
                }
            }
            let class = tables.classes.get(&key).cloned();
            (key, factory, class)
        };

        if factory.is_none() && key == identifier::<Container>() {
            let _guard = ResolutionGuard::enter(self.owner(), &key)?;
            let value = self.after_build(into_any(self.clone()));
            self.tables.write().own = Some(Arc::downgrade(&value));
            return Ok(Lookup::Found(value));
        }

        let value = {
            let _guard = ResolutionGuard::enter(self.owner(), &key)?;
            if let Some(factory) = factory {
                tracing::debug!("invoking factory for '{}'", key);
                self.call(&factory)?
            } else if let Some(class) = class {
                tracing::debug!("constructing '{}'", key);
                self.create(&class)?
            } else {
                return Ok(Lookup::Missing(key));
            }
        };

        let value = self.after_build(value);
        self.tables.write().cache.insert(key, value.clone());
        Ok(Lookup::Found(value))
    }

    pub(crate) fn call(&self, function: &Function) -> Result<AnyRef, Error> {
        let args = self.argument_resolver().resolve(function.params())?;
        function.call(args).map_err(Error::from_user)
    }

    fn create(&self, class: &Class) -> Result<AnyRef, Error> {
        match class.constructor() {
            Constructor::Implicit(build) => Ok(build()),
            Constructor::Restricted {
                accessor: Some(accessor),
            } => Ok(accessor()),
            Constructor::Restricted { accessor: None } => {
                Err(Error::InaccessibleConstructor(class.name().to_owned()))
            }
            Constructor::Public(constructor) => {
                let args = self
                    .argument_resolver()
                    .resolve(constructor.params())
                    .map_err(|err| err.called_in(class.name()))?;
                constructor.call(args).map_err(Error::from_user)
            }
        }
    }

    fn after_build(&self, value: AnyRef) -> AnyRef {
        let hooks = self.tables.read().hooks.clone();
        if !hooks.is_empty() {
            tracing::debug!("applying {} after-build handlers", hooks.len());
        }
        hooks.iter().fold(value, |value, hook| hook(value, self))
    }

    fn concrete<'t>(tables: &'t Tables, id: &'t str) -> &'t str {
        tables.aliases.get(id).map(String::as_str).unwrap_or(id)
    }

    fn owner(&self) -> usize {
        Arc::as_ptr(&self.tables) as usize
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("Container")
            .field("aliases", &tables.aliases)
            .field("factories", &tables.factories.keys().collect::<Vec<_>>())
            .field("cached", &tables.cache.keys().collect::<Vec<_>>())
            .field("hooks", &tables.hooks.len())
            .field("classes", &tables.classes.keys().collect::<Vec<_>>())
            .finish()
    }
}

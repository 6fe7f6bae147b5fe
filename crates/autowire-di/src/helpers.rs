use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased, shared container entry.
pub type AnyRef = Arc<dyn Any + Send + Sync>;

pub(crate) fn downcast<T>(value: &AnyRef) -> Option<Arc<T>>
  where T: Any + Send + Sync
{
  value.clone().downcast::<T>().ok()
}

pub(crate) fn into_any<T>(value: T) -> AnyRef
  where T: Any + Send + Sync
{
  Arc::new(value)
}

/// Debug placeholder for type-erased values and closures.
pub(crate) struct Opaque(pub &'static str);

impl fmt::Debug for Opaque {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<{}>", self.0)
  }
}

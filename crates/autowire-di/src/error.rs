use thiserror::Error;
use std::sync::Arc;

#[derive(Error, Debug, Clone)]
pub enum Error {
  #[error("identifier '{0}' not found in container")]
  NotFound(String),
  #[error("could not resolve argument '{argument}'{}", render_chain(.chain))]
  UnresolvedArgument {
    argument: String,
    chain: Vec<String>,
  },
  #[error("{message}")]
  Container {
    message: String,
    #[source]
    source: Arc<ReflectionError>,
  },
  #[error("no access to constructor of class '{0}'")]
  InaccessibleConstructor(String),
  #[error("incorrect array [{0}] for resolving, array must be [class, method]")]
  MalformedAction(String),
  #[error("method '{method}' for class '{class}' not found")]
  MethodNotFound { class: String, method: String },
  #[error("circular dependency detected: {}", .0.join(" -> "))]
  CircularDependency(Vec<String>),
  #[error("entry '{id}' is not of type {expected}")]
  TypeMismatch { id: String, expected: &'static str },
  #[error("service: {0}")]
  Service(Arc<anyhow::Error>),
}

impl Error {
  pub(crate) fn unresolved(argument: &str) -> Self {
    Error::UnresolvedArgument {
      argument: argument.to_owned(),
      chain: Vec::new(),
    }
  }

  /// Records the class whose construction needed the unresolved argument.
  pub(crate) fn called_in(self, class: &str) -> Self {
    match self {
      Error::UnresolvedArgument { argument, mut chain } => {
        chain.push(class.to_owned());
        Error::UnresolvedArgument { argument, chain }
      }
      other => other,
    }
  }

  /// Construction-policy violations that are never recovered from.
  pub fn is_fatal(&self) -> bool {
    matches!(
      self,
      Error::InaccessibleConstructor(_)
        | Error::MalformedAction(_)
        | Error::MethodNotFound { .. }
    )
  }

  /// Converts a failure raised by user code (a factory, constructor or method body).
  pub(crate) fn from_user(err: anyhow::Error) -> Self {
    let err = match err.downcast::<Error>() {
      Ok(err) => return err,
      Err(err) => err,
    };
    match err.downcast::<ReflectionError>() {
      Ok(err) => Error::Container {
        message: err.to_string(),
        source: Arc::new(err),
      },
      Err(err) => Error::Service(Arc::new(err)),
    }
  }
}

fn render_chain(chain: &[String]) -> String {
  chain
    .iter()
    .map(|class| format!(" -> called in '{}'", class))
    .collect()
}

/// Introspection failures: an argument list that does not match what a body expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectionError {
  #[error("missing argument at position {position}")]
  MissingArgument { position: usize },
  #[error("argument at position {position} is not of type {expected}")]
  ArgumentType {
    position: usize,
    expected: &'static str,
  },
  #[error("receiver is not of type {expected}")]
  Receiver { expected: &'static str },
}

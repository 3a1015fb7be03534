mod default_call_adapter;
mod future_call_adapter;
mod oneway_call_adapter;
mod stream_call_adapter;

pub use default_call_adapter::{BlockingCallAdapter, DefaultCallAdapterFactory};
pub use future_call_adapter::{FutureCallAdapter, FutureCallAdapterFactory};
pub use oneway_call_adapter::{OneWayCallAdapter, OneWayCallAdapterFactory};
pub use stream_call_adapter::{StreamCallAdapter, StreamCallAdapterFactory};

use crate::{RemoteCall, RpcCallerError};
use ipclink_rpc_service::ReturnType;
use std::any::Any;
use std::sync::Arc;

/// A call adapter's output, converted to the declared return type by
/// [`RpcReturn::from_adapted`](crate::RpcReturn::from_adapted).
pub type Adapted = Box<dyn Any + Send>;

/// Turns a not-yet-started [`RemoteCall`] into the value a declared method
/// returns.
///
/// One adapter instance serves every call of every method it was resolved
/// for, possibly concurrently.
pub trait CallAdapter: Send + Sync {
    fn adapt(&self, call: RemoteCall) -> Result<Adapted, RpcCallerError>;
}

/// Produces a [`CallAdapter`] for return types it understands.
pub trait CallAdapterFactory: Send + Sync {
    /// Returns `None` if this factory does not handle `return_type`.
    fn get(
        &self,
        return_type: &ReturnType,
        tags: &[&'static str],
    ) -> Option<Arc<dyn CallAdapter>>;
}

/// Ordered chain of factories, with [`DefaultCallAdapterFactory`] as the
/// implicit last resort.
#[derive(Clone, Default)]
pub struct CallAdapterRegistry {
    factories: Vec<Arc<dyn CallAdapterFactory>>,
}

impl CallAdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_factory(&mut self, factory: Arc<dyn CallAdapterFactory>) {
        self.factories.push(factory);
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// First registered factory that matches wins; the default blocking
    /// adapter is tried last.
    pub fn resolve(
        &self,
        return_type: &ReturnType,
        tags: &[&'static str],
    ) -> Result<Arc<dyn CallAdapter>, RpcCallerError> {
        self.factories
            .iter()
            .find_map(|factory| factory.get(return_type, tags))
            .or_else(|| DefaultCallAdapterFactory.get(return_type, tags))
            .ok_or_else(|| {
                RpcCallerError::Configuration(format!(
                    "no call adapter registered for `{}` ({:?})",
                    return_type,
                    return_type.shape()
                ))
            })
    }
}

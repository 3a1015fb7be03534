use crate::{CallAdapter, CallAdapterRegistry, RpcCallerError};
use ipclink_rpc_service::MethodDeclaration;
use ipclink_rpc_service::ReturnType;
use ipclink_rpc_service::codec::ResultDecoder;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable, resolved form of a declared method.
pub struct MethodDescriptor {
    declaration: MethodDeclaration,
    signature: String,
    call_adapter: Arc<dyn CallAdapter>,
}

impl MethodDescriptor {
    /// Resolves the call adapter for `declaration`. Fails with
    /// [`RpcCallerError::Configuration`] if no adapter handles its return type.
    pub fn build(
        declaration: &MethodDeclaration,
        adapters: &CallAdapterRegistry,
    ) -> Result<Self, RpcCallerError> {
        let call_adapter = adapters
            .resolve(declaration.return_type(), declaration.tags())
            .map_err(|err| match err {
                RpcCallerError::Configuration(msg) => RpcCallerError::Configuration(format!(
                    "Unable to create call adapter for {}: {}",
                    declaration.signature(),
                    msg
                )),
                other => other,
            })?;

        Ok(Self {
            declaration: declaration.clone(),
            signature: declaration.signature(),
            call_adapter,
        })
    }

    pub fn method_id(&self) -> u64 {
        self.declaration.method_id()
    }

    pub fn name(&self) -> &'static str {
        self.declaration.name()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn return_type(&self) -> &ReturnType {
        self.declaration.return_type()
    }

    pub fn tags(&self) -> &'static [&'static str] {
        self.declaration.tags()
    }

    pub fn call_adapter(&self) -> &Arc<dyn CallAdapter> {
        &self.call_adapter
    }

    pub fn encode_args(&self, args: &(dyn Any + Send)) -> Result<Vec<u8>, RpcCallerError> {
        (self.declaration.args_encoder())(args).map_err(|e| RpcCallerError::Codec(e.to_string()))
    }

    pub fn result_decoder(&self) -> ResultDecoder {
        self.declaration.result_decoder()
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("signature", &self.signature)
            .field("return_type", self.return_type())
            .field("tags", &self.tags())
            .finish()
    }
}

/// Lazily built, never evicted descriptors keyed by method id.
///
/// Hits take only the read lock. On a miss the slot for the method is
/// created under the write lock and then initialised through its
/// [`OnceCell`], so concurrent first callers run the build once and all
/// observe the same descriptor. A failed build leaves the slot empty.
#[derive(Default)]
pub struct MethodDescriptorCache {
    entries: RwLock<HashMap<u64, Arc<OnceCell<Arc<MethodDescriptor>>>>>,
}

impl MethodDescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, method_id: u64) -> Option<Arc<MethodDescriptor>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&method_id)
            .and_then(|slot| slot.get().cloned())
    }

    /// Returns the cached descriptor, running `build` if there is none yet.
    pub fn resolve_with<F>(
        &self,
        method_id: u64,
        build: F,
    ) -> Result<Arc<MethodDescriptor>, RpcCallerError>
    where
        F: FnOnce() -> Result<MethodDescriptor, RpcCallerError>,
    {
        if let Some(descriptor) = self.get(method_id) {
            return Ok(descriptor);
        }

        let slot = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(method_id)
            .or_default()
            .clone();

        slot.get_or_try_init(|| build().map(Arc::new)).cloned()
    }

    pub fn resolve(
        &self,
        declaration: &MethodDeclaration,
        adapters: &CallAdapterRegistry,
    ) -> Result<Arc<MethodDescriptor>, RpcCallerError> {
        self.resolve_with(declaration.method_id(), || {
            tracing::debug!("Building method descriptor for {}", declaration.signature());
            MethodDescriptor::build(declaration, adapters)
        })
    }

    /// Number of successfully built descriptors.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

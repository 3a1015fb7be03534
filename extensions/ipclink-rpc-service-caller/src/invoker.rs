use bitcode::{DecodeOwned, Encode};
use ipclink::rpc::{RpcRequest, RpcResponse, RpcResultStatus};
use ipclink_rpc_service::codec;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub type CallbackHandler = Arc<
    dyn Fn(&[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> + Send + Sync,
>;

/// Handlers for calls the peer makes back into this process, keyed by method ID.
///
/// Clones share the same handler table.
#[derive(Clone, Default)]
pub struct CallbackInvoker {
    handlers: Arc<RwLock<HashMap<u64, CallbackHandler>>>,
}

impl CallbackInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_handler<F>(&self, method_id: u64, handler: F) -> Result<(), String>
    where
        F: Fn(&[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);

        match handlers.entry(method_id) {
            Entry::Occupied(_) => Err(format!(
                "a handler for method ID {} is already registered",
                method_id
            )),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    /// Registers a handler taking decoded arguments `A` and returning an `O`
    /// to be encoded as the response payload.
    pub fn register<A, O, F>(&self, method_id: u64, handler: F) -> Result<(), String>
    where
        A: DecodeOwned,
        O: Encode,
        F: Fn(A) -> Result<O, Box<dyn std::error::Error + Send + Sync>> + Send + Sync + 'static,
    {
        self.register_handler(method_id, move |bytes| {
            let args = codec::decode::<A>(bytes)?;
            let output = handler(args)?;
            Ok(codec::encode(&output))
        })
    }

    pub fn unregister(&self, method_id: u64) -> bool {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&method_id)
            .is_some()
    }

    pub fn has_handler(&self, method_id: u64) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&method_id)
    }

    /// Runs the handler for `request` and builds the reply.
    pub fn invoke(&self, request: RpcRequest) -> RpcResponse {
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&request.rpc_method_id)
            .cloned();

        let Some(handler) = handler else {
            tracing::warn!(
                "No callback handler for {} (method ID {})",
                request.rpc_method_signature,
                request.rpc_method_id
            );
            return RpcResponse::for_request(&request, RpcResultStatus::MethodNotFound, Vec::new());
        };

        match handler(&request.rpc_param_bytes) {
            Ok(encoded) => RpcResponse::for_request(&request, RpcResultStatus::Success, encoded),
            Err(e) => {
                tracing::error!(
                    "Callback {} failed: {}",
                    request.rpc_method_signature,
                    e
                );
                RpcResponse::for_request(&request, RpcResultStatus::Fail, e.to_string().into_bytes())
            }
        }
    }
}

use crate::{Adapted, CallAdapter, CallAdapterFactory, RemoteCall, RpcCallerError};
use ipclink_rpc_service::{ReturnShape, ReturnType};
use std::sync::Arc;

/// Blocks the invoking thread until the call resolves and returns its value.
pub struct BlockingCallAdapter;

impl CallAdapter for BlockingCallAdapter {
    fn adapt(&self, call: RemoteCall) -> Result<Adapted, RpcCallerError> {
        call.execute()
    }
}

/// Handles every [`ReturnShape::Value`] return type.
pub struct DefaultCallAdapterFactory;

impl CallAdapterFactory for DefaultCallAdapterFactory {
    fn get(
        &self,
        return_type: &ReturnType,
        _tags: &[&'static str],
    ) -> Option<Arc<dyn CallAdapter>> {
        match return_type.shape() {
            ReturnShape::Value => Some(Arc::new(BlockingCallAdapter)),
            _ => None,
        }
    }
}

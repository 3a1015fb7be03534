use crate::{Adapted, CallAdapter, CallAdapterFactory, RemoteCall, RpcCallerError};
use ipclink_rpc_service::{ReturnShape, ReturnType};
use std::sync::Arc;

/// Sends the call and returns immediately with a
/// [`PendingResult`](crate::PendingResult), surfaced as an
/// [`RpcFuture`](crate::RpcFuture).
pub struct FutureCallAdapter;

impl CallAdapter for FutureCallAdapter {
    fn adapt(&self, call: RemoteCall) -> Result<Adapted, RpcCallerError> {
        call.start()?;
        Ok(Box::new(call.pending_result()))
    }
}

#[derive(Default)]
pub struct FutureCallAdapterFactory;

impl CallAdapterFactory for FutureCallAdapterFactory {
    fn get(
        &self,
        return_type: &ReturnType,
        _tags: &[&'static str],
    ) -> Option<Arc<dyn CallAdapter>> {
        (return_type.shape() == ReturnShape::Future)
            .then(|| Arc::new(FutureCallAdapter) as Arc<dyn CallAdapter>)
    }
}

use crate::{Adapted, CallAdapter, CallAdapterFactory, RemoteCall, RpcCallerError};
use ipclink_rpc_service::{ReturnShape, ReturnType};
use std::sync::Arc;

/// Sends the call and hands back its pending result for an
/// [`RpcStream`](crate::RpcStream).
pub struct StreamCallAdapter;

impl CallAdapter for StreamCallAdapter {
    fn adapt(&self, call: RemoteCall) -> Result<Adapted, RpcCallerError> {
        call.start()?;
        Ok(Box::new(call.pending_result()))
    }
}

#[derive(Default)]
pub struct StreamCallAdapterFactory;

impl CallAdapterFactory for StreamCallAdapterFactory {
    fn get(
        &self,
        return_type: &ReturnType,
        _tags: &[&'static str],
    ) -> Option<Arc<dyn CallAdapter>> {
        (return_type.shape() == ReturnShape::Stream)
            .then(|| Arc::new(StreamCallAdapter) as Arc<dyn CallAdapter>)
    }
}

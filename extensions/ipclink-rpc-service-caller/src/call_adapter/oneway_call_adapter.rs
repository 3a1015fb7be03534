use crate::constants::ONEWAY_TAG;
use crate::{Adapted, CallAdapter, CallAdapterFactory, RemoteCall, RpcCallerError};
use ipclink_rpc_service::{ReturnShape, ReturnType};
use std::sync::Arc;

/// Sends the call without waiting for it or registering it for a response.
/// Send failures and a disconnected transport are still reported.
pub struct OneWayCallAdapter;

impl CallAdapter for OneWayCallAdapter {
    fn adapt(&self, call: RemoteCall) -> Result<Adapted, RpcCallerError> {
        call.start_detached()?;
        Ok(Box::new(()))
    }
}

/// Matches `()`-returning value methods tagged [`ONEWAY_TAG`].
#[derive(Default)]
pub struct OneWayCallAdapterFactory;

impl CallAdapterFactory for OneWayCallAdapterFactory {
    fn get(
        &self,
        return_type: &ReturnType,
        tags: &[&'static str],
    ) -> Option<Arc<dyn CallAdapter>> {
        let matches = return_type.shape() == ReturnShape::Value
            && return_type.is_unit()
            && tags.contains(&ONEWAY_TAG);

        matches.then(|| Arc::new(OneWayCallAdapter) as Arc<dyn CallAdapter>)
    }
}

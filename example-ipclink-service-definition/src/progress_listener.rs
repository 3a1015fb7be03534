use ipclink_rpc_service::rpc_method_id;

/// Callback the peer invokes on the client while it works.
///
/// Arguments are `(step, total)` and the handler answers with an
/// acknowledgement string.
pub const ON_PROGRESS_METHOD_ID: u64 = rpc_method_id!("example.ProgressListener.on_progress");

pub const ON_PROGRESS_SIGNATURE: &str = "example.ProgressListener.on_progress(step, total)";

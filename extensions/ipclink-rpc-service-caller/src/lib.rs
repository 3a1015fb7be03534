mod call_adapter;
pub use call_adapter::*;
pub mod constants;
mod dispatcher;
pub use dispatcher::Dispatcher;
pub mod error;
pub use error::RpcCallerError;
mod invoker;
pub use invoker::{CallbackHandler, CallbackInvoker};
mod linker;
pub use linker::{InvocationHandler, RpcInterface, RpcLinker, RpcLinkerBuilder};
mod macros;
mod method_descriptor;
pub use method_descriptor::{MethodDescriptor, MethodDescriptorCache};
mod remote_call;
pub use remote_call::{CallState, PendingResult, RemoteCall};
mod rpc_return;
pub use rpc_return::*;
mod service_descriptor;
pub use service_descriptor::{ServiceDescriptor, ServiceTarget};
mod transport;
pub use transport::{
    RpcTransport, RpcTransportState, SendOutcome, StateChangeHandler, TransportEvents,
};

// Re-expose for generated code and for callers that only depend on this crate.
pub use ipclink;
pub use ipclink_rpc_service;

use crate::{CallbackInvoker, Dispatcher, ServiceDescriptor};
use ipclink::rpc::{RpcRequest, RpcResponse, RpcResultStatus};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RpcTransportState {
    Connected,
    Disconnected,
}

/// What the transport did with a request it accepted.
#[derive(Debug)]
pub enum SendOutcome {
    /// The response will be delivered later through [`TransportEvents::response`].
    Pending,
    /// The transport produced the response synchronously.
    Inline(RpcResponse),
}

/// The process-boundary collaborator the linker sends requests through.
///
/// Implementations own connection establishment. They report lifecycle
/// changes and inbound traffic through the [`TransportEvents`] handed to
/// [`RpcTransport::bind`], from whatever thread they run on.
pub trait RpcTransport: Send + Sync {
    fn bind(&self, service: &ServiceDescriptor, events: TransportEvents) -> Result<(), io::Error>;

    fn unbind(&self) -> Result<(), io::Error>;

    /// Hands a request to the peer. An `Err` means the peer was unreachable
    /// and the request was not delivered.
    fn send(&self, request: RpcRequest) -> Result<SendOutcome, io::Error>;
}

pub type StateChangeHandler = Arc<dyn Fn(RpcTransportState) + Send + Sync>;

/// Event sink the transport drives. Cheap to clone.
#[derive(Clone)]
pub struct TransportEvents {
    dispatcher: Arc<Dispatcher>,
    invoker: Option<CallbackInvoker>,
    state_change_handler: Arc<Mutex<Option<StateChangeHandler>>>,
}

impl TransportEvents {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>, invoker: Option<CallbackInvoker>) -> Self {
        Self {
            dispatcher,
            invoker,
            state_change_handler: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn set_state_change_handler(&self, handler: StateChangeHandler) {
        *self
            .state_change_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    pub fn connected(&self) {
        if self.dispatcher.on_connected() {
            self.notify_state_change(RpcTransportState::Connected);
        }
    }

    pub fn disconnected(&self) {
        if self.dispatcher.on_disconnected() {
            self.notify_state_change(RpcTransportState::Disconnected);
        }
    }

    /// Routes a response to the call waiting for it.
    pub fn response(&self, response: RpcResponse) {
        self.dispatcher.on_response(response);
    }

    /// Runs an inbound callback request from the peer and returns the reply.
    pub fn callback(&self, request: RpcRequest) -> RpcResponse {
        tracing::debug!("Receive callback in client: {}", request.rpc_method_signature);

        match &self.invoker {
            Some(invoker) => invoker.invoke(request),
            None => RpcResponse::for_request(
                &request,
                RpcResultStatus::MethodNotFound,
                b"no callback invoker configured".to_vec(),
            ),
        }
    }

    pub fn state(&self) -> RpcTransportState {
        self.dispatcher.state()
    }

    fn notify_state_change(&self, state: RpcTransportState) {
        // Run the handler unlocked so it may replace itself.
        let handler = self
            .state_change_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(handler) = handler {
            handler(state);
        }
    }
}

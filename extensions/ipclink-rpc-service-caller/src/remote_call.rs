use crate::{
    Dispatcher, MethodDescriptor, RpcCallerError, RpcTransport, RpcTransportState, SendOutcome,
};
use futures::channel::oneshot;
use ipclink::rpc::{RpcRequest, RpcResponse};
use ipclink::utils::now;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

type CallOutcome = Result<Vec<u8>, RpcCallerError>;

/// Lifecycle of a single invocation.
///
/// `Created` → `Pending` once the request is handed to the transport, then
/// exactly one of `Completed`, `Failed` or `Cancelled`.
#[derive(Debug, Clone)]
pub enum CallState {
    Created,
    Pending,
    /// Holds the still-encoded result payload.
    Completed(Vec<u8>),
    Failed(RpcCallerError),
    Cancelled,
}

impl CallState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, CallState::Created | CallState::Pending)
    }

    fn outcome(&self) -> Option<CallOutcome> {
        match self {
            CallState::Created | CallState::Pending => None,
            CallState::Completed(bytes) => Some(Ok(bytes.clone())),
            CallState::Failed(err) => Some(Err(err.clone())),
            CallState::Cancelled => Some(Err(RpcCallerError::Cancelled)),
        }
    }
}

/// One in-flight invocation.
///
/// Clones share the same call. The dispatcher holds a clone for as long as
/// the call is pending.
#[derive(Clone)]
pub struct RemoteCall {
    inner: Arc<RemoteCallInner>,
}

struct RemoteCallInner {
    request: RpcRequest,
    descriptor: Arc<MethodDescriptor>,
    transport: Arc<dyn RpcTransport>,
    dispatcher: Arc<Dispatcher>,
    created_at: u64,
    progress: Mutex<CallProgress>,
}

struct CallProgress {
    state: CallState,
    waiters: Vec<oneshot::Sender<CallOutcome>>,
}

impl RemoteCall {
    pub(crate) fn new(
        request: RpcRequest,
        descriptor: Arc<MethodDescriptor>,
        transport: Arc<dyn RpcTransport>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            inner: Arc::new(RemoteCallInner {
                request,
                descriptor,
                transport,
                dispatcher,
                created_at: now(),
                progress: Mutex::new(CallProgress {
                    state: CallState::Created,
                    waiters: Vec::new(),
                }),
            }),
        }
    }

    fn progress(&self) -> MutexGuard<'_, CallProgress> {
        self.inner
            .progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn call_id(&self) -> u32 {
        self.inner.request.rpc_call_id
    }

    pub fn request(&self) -> &RpcRequest {
        &self.inner.request
    }

    pub fn descriptor(&self) -> &Arc<MethodDescriptor> {
        &self.inner.descriptor
    }

    pub fn state(&self) -> CallState {
        self.progress().state.clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.progress().state.is_resolved()
    }

    /// Registers the call with the dispatcher and sends its request.
    ///
    /// Registration happens before the send so a response that races back
    /// immediately always finds its call. Only the first invocation does any
    /// work; later ones return `Ok(())`, leaving the outcome to be read from
    /// the call.
    pub fn start(&self) -> Result<(), RpcCallerError> {
        {
            let mut progress = self.progress();
            if !matches!(progress.state, CallState::Created) {
                return Ok(());
            }
            progress.state = CallState::Pending;
        }

        if let Err(err) = self.inner.dispatcher.register(self) {
            self.on_failure(err.clone());
            return Err(err);
        }

        match self.inner.transport.send(self.inner.request.clone()) {
            Ok(SendOutcome::Pending) => Ok(()),
            Ok(SendOutcome::Inline(response)) => {
                self.inner.dispatcher.on_response(response);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(
                    "Send failed for {} (call {}): {}",
                    self.inner.request.rpc_method_signature,
                    self.call_id(),
                    err
                );
                self.inner.dispatcher.unregister(self.call_id());
                let err = RpcCallerError::from(err);
                self.on_failure(err.clone());
                Err(err)
            }
        }
    }

    /// Sends the request without registering the call for a response.
    ///
    /// The call completes with an empty payload once the transport accepts
    /// the request, so it never occupies a dispatcher slot. Any response the
    /// peer sends later is unmatched and dropped.
    pub fn start_detached(&self) -> Result<(), RpcCallerError> {
        {
            let mut progress = self.progress();
            if !matches!(progress.state, CallState::Created) {
                return Ok(());
            }
            progress.state = CallState::Pending;
        }

        if self.inner.dispatcher.state() == RpcTransportState::Disconnected {
            self.on_failure(RpcCallerError::NotConnected);
            return Err(RpcCallerError::NotConnected);
        }

        match self.inner.transport.send(self.inner.request.clone()) {
            Ok(_) => {
                self.resolve(CallState::Completed(Vec::new()));
                Ok(())
            }
            Err(err) => {
                tracing::debug!(
                    "Detached send failed for {} (call {}): {}",
                    self.inner.request.rpc_method_signature,
                    self.call_id(),
                    err
                );
                let err = RpcCallerError::from(err);
                self.on_failure(err.clone());
                Err(err)
            }
        }
    }

    /// Sends the call if needed and blocks the current thread until it
    /// resolves, returning the decoded result.
    ///
    /// Once resolved, repeated calls return the stored outcome immediately.
    /// Must not be called from within an async task.
    pub fn execute(&self) -> Result<Box<dyn Any + Send>, RpcCallerError> {
        futures::executor::block_on(self.enqueue())
    }

    /// Like [`RemoteCall::execute`] but returns the encoded payload.
    pub fn execute_raw(&self) -> Result<Vec<u8>, RpcCallerError> {
        // A failed start is recorded in the call state and read back below.
        let _ = self.start();
        match self.subscribe() {
            Ok(outcome) => outcome,
            Err(receiver) => futures::executor::block_on(receiver)
                .unwrap_or(Err(RpcCallerError::Cancelled)),
        }
    }

    /// Sends the call if needed and returns a future of its decoded result.
    pub fn enqueue(&self) -> PendingResult {
        // A failed start resolves the call, so the result is already ready.
        let _ = self.start();
        self.pending_result()
    }

    /// A future of the decoded result that does not send the call.
    pub fn pending_result(&self) -> PendingResult {
        match self.subscribe() {
            Ok(outcome) => PendingResult {
                call: self.clone(),
                ready: Some(outcome),
                receiver: None,
            },
            Err(receiver) => PendingResult {
                call: self.clone(),
                ready: None,
                receiver: Some(receiver),
            },
        }
    }

    fn subscribe(&self) -> Result<CallOutcome, oneshot::Receiver<CallOutcome>> {
        let mut progress = self.progress();
        match progress.state.outcome() {
            Some(outcome) => Ok(outcome),
            None => {
                let (tx, rx) = oneshot::channel();
                progress.waiters.push(tx);
                Err(rx)
            }
        }
    }

    /// Fulfils the call from the peer's response.
    pub fn on_complete(&self, response: RpcResponse) -> bool {
        let state = if response.is_success() {
            CallState::Completed(response.rpc_payload_bytes)
        } else {
            CallState::Failed(RpcCallerError::RemoteExecution {
                status: response.rpc_result_status,
                payload: response.rpc_payload_bytes,
            })
        };
        self.resolve(state)
    }

    pub fn on_failure(&self, error: RpcCallerError) -> bool {
        self.resolve(CallState::Failed(error))
    }

    /// Abandons the call if it has not resolved yet. A response that arrives
    /// afterwards is dropped by the dispatcher.
    pub fn cancel(&self) -> bool {
        let cancelled = self.resolve(CallState::Cancelled);
        if cancelled {
            self.inner.dispatcher.unregister(self.call_id());
        }
        cancelled
    }

    fn resolve(&self, next: CallState) -> bool {
        let (outcome, waiters) = {
            let mut progress = self.progress();
            if progress.state.is_resolved() {
                tracing::trace!(
                    "Call {} already resolved; ignoring {:?}",
                    self.call_id(),
                    next
                );
                return false;
            }
            progress.state = next;
            let outcome = progress.state.outcome();
            (outcome, std::mem::take(&mut progress.waiters))
        };

        tracing::trace!(
            "Call {} to {} resolved after {}µs",
            self.call_id(),
            self.inner.request.rpc_method_signature,
            now().saturating_sub(self.inner.created_at)
        );

        if let Some(outcome) = outcome {
            for waiter in waiters {
                let _ = waiter.send(outcome.clone());
            }
        }

        true
    }

    fn decode(&self, outcome: CallOutcome) -> Result<Box<dyn Any + Send>, RpcCallerError> {
        let bytes = outcome?;
        (self.inner.descriptor.result_decoder())(&bytes)
            .map_err(|e| RpcCallerError::Codec(e.to_string()))
    }
}

impl fmt::Debug for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCall")
            .field("call_id", &self.call_id())
            .field("method", &self.inner.request.rpc_method_signature)
            .field("state", &self.progress().state)
            .finish()
    }
}

/// Future of a call's decoded, type-erased result.
///
/// Resolves on whichever thread fulfils the call.
pub struct PendingResult {
    call: RemoteCall,
    ready: Option<CallOutcome>,
    receiver: Option<oneshot::Receiver<CallOutcome>>,
}

impl PendingResult {
    pub fn call(&self) -> &RemoteCall {
        &self.call
    }
}

impl Future for PendingResult {
    type Output = Result<Box<dyn Any + Send>, RpcCallerError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(outcome) = this.ready.take() {
            return Poll::Ready(this.call.decode(outcome));
        }

        let Some(receiver) = this.receiver.as_mut() else {
            return Poll::Ready(Err(RpcCallerError::configuration(
                "pending result polled after completion",
            )));
        };

        match Pin::new(receiver).poll(cx) {
            Poll::Ready(received) => {
                this.receiver = None;
                let outcome = received.unwrap_or(Err(RpcCallerError::Cancelled));
                Poll::Ready(this.call.decode(outcome))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

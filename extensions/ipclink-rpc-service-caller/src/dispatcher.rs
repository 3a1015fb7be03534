use crate::constants::DEFAULT_MAX_PENDING_CALLS;
use crate::{RemoteCall, RpcCallerError, RpcTransportState};
use ipclink::rpc::RpcResponse;
use ipclink::utils::increment_u32_id;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Registry of in-flight calls keyed by call id.
///
/// Transport state and the registry share one lock, so a registration racing
/// a disconnect either observes `Disconnected` and fails fast, or lands in the
/// map before the drain and is failed by it.
pub struct Dispatcher {
    inner: Mutex<DispatcherInner>,
    max_pending_calls: usize,
}

struct DispatcherInner {
    state: RpcTransportState,
    pending: HashMap<u32, RemoteCall>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PENDING_CALLS)
    }
}

impl Dispatcher {
    /// Creates a dispatcher in the `Disconnected` state.
    pub fn new(max_pending_calls: usize) -> Self {
        Self {
            inner: Mutex::new(DispatcherInner {
                state: RpcTransportState::Disconnected,
                pending: HashMap::new(),
            }),
            max_pending_calls,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DispatcherInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> RpcTransportState {
        self.lock().state
    }

    /// Allocates a call id that no pending call currently uses.
    pub fn next_call_id(&self) -> u32 {
        let inner = self.lock();
        loop {
            let id = increment_u32_id();
            if !inner.pending.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn register(&self, call: &RemoteCall) -> Result<(), RpcCallerError> {
        let mut inner = self.lock();

        if inner.state == RpcTransportState::Disconnected {
            return Err(RpcCallerError::NotConnected);
        }

        if inner.pending.len() >= self.max_pending_calls {
            tracing::warn!(
                "Refusing call {}: {} calls already pending",
                call.call_id(),
                inner.pending.len()
            );
            return Err(RpcCallerError::TooManyPendingCalls {
                limit: self.max_pending_calls,
            });
        }

        let call_id = call.call_id();
        if inner.pending.contains_key(&call_id) {
            return Err(RpcCallerError::CallIdInUse { call_id });
        }

        inner.pending.insert(call_id, call.clone());
        tracing::trace!("Registered call {} ({} pending)", call_id, inner.pending.len());

        Ok(())
    }

    /// Removes a call without resolving it.
    pub fn unregister(&self, call_id: u32) -> Option<RemoteCall> {
        self.lock().pending.remove(&call_id)
    }

    /// Delivers a response to the call it answers.
    ///
    /// Returns `false` if no call with that id is pending; the response is
    /// logged and dropped, since its call may already have failed or been
    /// cancelled locally.
    pub fn on_response(&self, response: RpcResponse) -> bool {
        let call = self.lock().pending.remove(&response.rpc_call_id);

        match call {
            Some(call) => {
                call.on_complete(response);
                true
            }
            None => {
                tracing::warn!(
                    "Dropping response for unknown call {} ({:?})",
                    response.rpc_call_id,
                    response.rpc_result_status
                );
                false
            }
        }
    }

    /// Marks the transport connected. Returns `true` if the state changed.
    pub fn on_connected(&self) -> bool {
        let mut inner = self.lock();

        if !inner.pending.is_empty() {
            tracing::warn!(
                "Connected with {} calls still registered",
                inner.pending.len()
            );
        }

        let changed = inner.state != RpcTransportState::Connected;
        inner.state = RpcTransportState::Connected;
        changed
    }

    /// Marks the transport disconnected and fails every pending call with
    /// [`RpcCallerError::ConnectionLost`]. Returns `true` if the state changed.
    pub fn on_disconnected(&self) -> bool {
        let (changed, drained) = {
            let mut inner = self.lock();
            let changed = inner.state != RpcTransportState::Disconnected;
            inner.state = RpcTransportState::Disconnected;
            let drained: Vec<RemoteCall> = inner.pending.drain().map(|(_, call)| call).collect();
            (changed, drained)
        };

        if !drained.is_empty() {
            tracing::info!("Transport disconnected; failing {} pending calls", drained.len());
        }

        for call in drained {
            call.on_failure(RpcCallerError::ConnectionLost);
        }

        changed
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_pending(&self, call_id: u32) -> bool {
        self.lock().pending.contains_key(&call_id)
    }

    pub fn pending_call_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.lock().pending.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

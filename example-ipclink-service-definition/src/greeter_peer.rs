use crate::Greeting;
use ipclink::rpc::{RpcRequest, RpcResponse};
use ipclink_rpc_service::rpc_method_id;
use ipclink_rpc_service_caller::CallbackInvoker;
use std::sync::{Arc, Mutex, PoisonError};

pub const PING_METHOD_ID: u64 = rpc_method_id!("example.Greeter.ping");
pub const GREET_METHOD_ID: u64 = rpc_method_id!("example.Greeter.greet");
pub const ADD_METHOD_ID: u64 = rpc_method_id!("example.Greeter.add");
pub const SPLIT_WORDS_METHOD_ID: u64 = rpc_method_id!("example.Greeter.split_words");
pub const FAIL_METHOD_ID: u64 = rpc_method_id!("example.Greeter.fail");
pub const NOTIFY_METHOD_ID: u64 = rpc_method_id!("example.Greeter.notify");

/// The remote side of [`Greeter`](crate::Greeter), answering decoded requests
/// in-process. Used by tests and the demo app in place of a real peer.
#[derive(Clone)]
pub struct GreeterPeer {
    handlers: CallbackInvoker,
    notifications: Arc<Mutex<Vec<String>>>,
}

impl GreeterPeer {
    pub fn new() -> Result<Self, String> {
        let handlers = CallbackInvoker::new();
        let notifications = Arc::new(Mutex::new(Vec::new()));

        handlers.register::<(), String, _>(PING_METHOD_ID, |()| Ok("pong".to_string()))?;

        handlers.register::<(String, u32), Greeting, _>(GREET_METHOD_ID, |(name, times)| {
            Ok(Greeting {
                text: format!("Hello, {}!", name),
                times,
            })
        })?;

        handlers.register::<(i64, i64), i64, _>(ADD_METHOD_ID, |(a, b)| {
            a.checked_add(b)
                .ok_or_else(|| format!("{} + {} overflows", a, b).into())
        })?;

        handlers.register::<(String,), Vec<String>, _>(SPLIT_WORDS_METHOD_ID, |(text,)| {
            Ok(text.split_whitespace().map(str::to_string).collect())
        })?;

        handlers.register::<(String,), String, _>(FAIL_METHOD_ID, |(message,)| {
            Err(message.into())
        })?;

        handlers.register::<(String,), (), _>(NOTIFY_METHOD_ID, {
            let notifications = notifications.clone();
            move |(message,)| {
                tracing::info!("Peer received notification: {}", message);
                notifications
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(message);
                Ok(())
            }
        })?;

        Ok(Self {
            handlers,
            notifications,
        })
    }

    pub fn handle(&self, request: RpcRequest) -> RpcResponse {
        tracing::debug!(
            "Peer handling {} (call {})",
            request.rpc_method_signature,
            request.rpc_call_id
        );
        self.handlers.invoke(request)
    }

    /// Messages received through `notify`, oldest first.
    pub fn notifications(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

use example_ipclink_service_definition::{
    GREET_METHOD_ID, GreeterPeer, NOTIFY_METHOD_ID, ON_PROGRESS_METHOD_ID, ON_PROGRESS_SIGNATURE,
};
use ipclink::rpc::RpcRequest;
use ipclink::utils::increment_u32_id;
use ipclink_rpc_service::codec;
use ipclink_rpc_service_caller::{RpcTransport, SendOutcome, ServiceDescriptor, TransportEvents};
use std::io;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

/// In-process transport that hands every request to a [`GreeterPeer`]
/// running on a tokio task and delivers its responses asynchronously.
pub struct LoopbackTransport {
    peer: GreeterPeer,
    runtime: Handle,
    latency: Duration,
    link: Mutex<Option<Link>>,
}

struct Link {
    tx: UnboundedSender<RpcRequest>,
    task: JoinHandle<()>,
}

impl LoopbackTransport {
    pub fn new(peer: GreeterPeer, runtime: Handle) -> Self {
        Self {
            peer,
            runtime,
            latency: Duration::from_millis(10),
            link: Mutex::new(None),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl RpcTransport for LoopbackTransport {
    fn bind(&self, service: &ServiceDescriptor, events: TransportEvents) -> Result<(), io::Error> {
        let mut link = self.link.lock().unwrap_or_else(PoisonError::into_inner);
        if link.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("already bound to {}", service),
            ));
        }

        let (tx, mut rx) = unbounded_channel::<RpcRequest>();
        let peer = self.peer.clone();
        let latency = self.latency;
        let task_events = events.clone();

        let task = self.runtime.spawn(async move {
            while let Some(request) = rx.recv().await {
                let peer = peer.clone();
                let events = task_events.clone();

                tokio::spawn(async move {
                    tokio::time::sleep(latency).await;

                    // Report progress back to the client before answering.
                    if request.rpc_method_id == GREET_METHOD_ID {
                        let ack = events.callback(RpcRequest {
                            rpc_call_id: increment_u32_id(),
                            rpc_method_id: ON_PROGRESS_METHOD_ID,
                            rpc_method_signature: ON_PROGRESS_SIGNATURE.to_string(),
                            rpc_param_bytes: codec::encode(&(1u32, 1u32)),
                        });
                        tracing::debug!("Progress callback answered with {:?}", ack.rpc_result_status);
                    }

                    let one_way = request.rpc_method_id == NOTIFY_METHOD_ID;
                    let response = peer.handle(request);

                    // Nobody waits on a notification.
                    if !one_way {
                        events.response(response);
                    }
                });
            }
        });

        *link = Some(Link { tx, task });
        drop(link);

        tracing::info!("Loopback bound to {}", service);
        events.connected();
        Ok(())
    }

    fn unbind(&self) -> Result<(), io::Error> {
        let link = self
            .link
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(link) = link {
            drop(link.tx);
            link.task.abort();
        }

        Ok(())
    }

    fn send(&self, request: RpcRequest) -> Result<SendOutcome, io::Error> {
        let link = self.link.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(link) = link.as_ref() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "loopback not bound"));
        };

        link.tx
            .send(request)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "loopback peer stopped"))?;

        Ok(SendOutcome::Pending)
    }
}

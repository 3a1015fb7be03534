use example_ipclink_service_definition::{
    GREET_METHOD_ID, Greeter, GreeterPeer, GreeterProxy, Greeting, ON_PROGRESS_METHOD_ID,
    PING_METHOD_ID,
};
use futures::StreamExt;
use ipclink::rpc::{RpcRequest, RpcResponse, RpcResultStatus};
use ipclink_rpc_service::codec;
use ipclink_rpc_service::{InterfaceDeclaration, MethodDeclaration, ReturnShape, ReturnType};
use ipclink_rpc_service_caller::{
    CallbackInvoker, FutureCallAdapterFactory, InvocationHandler, OneWayCallAdapterFactory,
    RpcCallerError, RpcInterface, RpcLinker, RpcTransport, RpcTransportState, SendOutcome,
    ServiceDescriptor, StreamCallAdapterFactory, TransportEvents,
};
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::{Duration, Instant};

// --- Test Setup: Mock Transport ---

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    /// Requests are recorded and answered by the test through `TransportEvents`.
    Manual,
    /// Requests are answered inline by a `GreeterPeer`.
    Answering,
    /// Every send fails as if the peer were unreachable.
    Unreachable,
}

struct MockTransport {
    mode: Mode,
    peer: GreeterPeer,
    sent: Mutex<Vec<RpcRequest>>,
    events: Mutex<Option<TransportEvents>>,
}

impl MockTransport {
    fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            peer: GreeterPeer::new().unwrap(),
            sent: Mutex::new(Vec::new()),
            events: Mutex::new(None),
        })
    }

    fn sent(&self) -> Vec<RpcRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Blocks until at least `count` requests have been sent.
    fn wait_for_sent(&self, count: usize) -> Vec<RpcRequest> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            assert!(Instant::now() < deadline, "timed out waiting for requests");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn events(&self) -> TransportEvents {
        self.events.lock().unwrap().clone().expect("transport not bound")
    }
}

impl RpcTransport for MockTransport {
    fn bind(&self, _service: &ServiceDescriptor, events: TransportEvents) -> Result<(), io::Error> {
        *self.events.lock().unwrap() = Some(events.clone());
        events.connected();
        Ok(())
    }

    fn unbind(&self) -> Result<(), io::Error> {
        self.events.lock().unwrap().take();
        Ok(())
    }

    fn send(&self, request: RpcRequest) -> Result<SendOutcome, io::Error> {
        match self.mode {
            Mode::Unreachable => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "peer unreachable",
            )),
            Mode::Manual => {
                self.sent.lock().unwrap().push(request);
                Ok(SendOutcome::Pending)
            }
            Mode::Answering => {
                self.sent.lock().unwrap().push(request.clone());
                Ok(SendOutcome::Inline(self.peer.handle(request)))
            }
        }
    }
}

fn linker_with(transport: Arc<MockTransport>) -> RpcLinker {
    RpcLinker::builder()
        .peer("com.example.remote")
        .action("com.example.remote.BIND")
        .transport(transport)
        .add_call_adapter_factory(FutureCallAdapterFactory)
        .add_call_adapter_factory(StreamCallAdapterFactory)
        .add_call_adapter_factory(OneWayCallAdapterFactory)
        .build()
        .unwrap()
}

fn bound_greeter(mode: Mode) -> (Arc<MockTransport>, RpcLinker, GreeterProxy) {
    let transport = MockTransport::new(mode);
    let linker = linker_with(transport.clone());
    linker.bind().unwrap();
    let greeter = linker.create::<GreeterProxy>().unwrap();
    (transport, linker, greeter)
}

fn respond(transport: &MockTransport, request: &RpcRequest, payload: Vec<u8>) {
    transport
        .events()
        .response(RpcResponse::success(request.rpc_call_id, payload));
}

// --- Value calls through the default adapter ---

#[test]
fn test_ping_returns_pong_on_calling_thread() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let caller = thread::spawn(move || greeter.ping());

    let sent = transport.wait_for_sent(1);
    assert_eq!(sent[0].rpc_method_id, PING_METHOD_ID);
    assert_eq!(sent[0].rpc_method_signature, "example.Greeter.ping()");
    assert_eq!(linker.pending_call_ids(), vec![sent[0].rpc_call_id]);

    respond(&transport, &sent[0], codec::encode(&"pong".to_string()));

    assert_eq!(caller.join().unwrap().unwrap(), "pong");
    assert!(linker.pending_call_ids().is_empty());
}

#[test]
fn test_inline_response_is_routed_through_dispatcher() {
    let (_transport, linker, greeter) = bound_greeter(Mode::Answering);

    let greeting = greeter.greet("Ada".to_string(), 3).unwrap();

    assert_eq!(
        greeting,
        Greeting {
            text: "Hello, Ada!".to_string(),
            times: 3
        }
    );
    assert!(linker.pending_call_ids().is_empty());
}

#[test]
fn test_arguments_are_encoded_as_tuple() {
    let (transport, _linker, greeter) = bound_greeter(Mode::Answering);

    greeter.greet("Ada".to_string(), 3).unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].rpc_method_id, GREET_METHOD_ID);
    assert_eq!(
        sent[0].rpc_method_signature,
        "example.Greeter.greet(name, times)"
    );
    let args: (String, u32) = codec::decode(&sent[0].rpc_param_bytes).unwrap();
    assert_eq!(args, ("Ada".to_string(), 3));
}

#[test]
fn test_send_failure_leaves_no_pending_call() {
    let (transport, linker, greeter) = bound_greeter(Mode::Unreachable);

    match greeter.ping() {
        Err(RpcCallerError::Io(err)) => {
            assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused)
        }
        other => panic!("expected an I/O error, got {:?}", other),
    }

    assert!(linker.pending_call_ids().is_empty());
    assert!(transport.sent().is_empty());
}

#[test]
fn test_call_before_bind_is_not_connected() {
    let transport = MockTransport::new(Mode::Answering);
    let linker = linker_with(transport.clone());
    let greeter = linker.create::<GreeterProxy>().unwrap();

    assert_eq!(linker.transport_state(), RpcTransportState::Disconnected);
    assert!(matches!(greeter.ping(), Err(RpcCallerError::NotConnected)));
    assert!(transport.sent().is_empty());
}

#[test]
fn test_remote_failure_carries_peer_payload() {
    let (_transport, _linker, greeter) = bound_greeter(Mode::Answering);

    let err = greeter.fail("item does not exist".to_string()).unwrap_err();

    match &err {
        RpcCallerError::RemoteExecution { status, .. } => {
            assert_eq!(*status, RpcResultStatus::Fail)
        }
        other => panic!("expected a remote execution error, got {:?}", other),
    }
    assert_eq!(err.remote_message().as_deref(), Some("item does not exist"));
}

#[test]
fn test_undecodable_result_is_codec_error() {
    let (transport, _linker, greeter) = bound_greeter(Mode::Manual);

    let caller = thread::spawn(move || greeter.greet("Ada".to_string(), 1));

    let sent = transport.wait_for_sent(1);
    respond(&transport, &sent[0], Vec::new());

    assert!(matches!(
        caller.join().unwrap(),
        Err(RpcCallerError::Codec(_))
    ));
}

// --- Dispatch ---

#[test]
fn test_disconnect_unblocks_pending_call() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let caller = thread::spawn(move || greeter.ping());

    transport.wait_for_sent(1);
    transport.events().disconnected();

    assert!(matches!(
        caller.join().unwrap(),
        Err(RpcCallerError::ConnectionLost)
    ));
    assert!(linker.pending_call_ids().is_empty());
    assert_eq!(linker.transport_state(), RpcTransportState::Disconnected);
}

#[test]
fn test_disconnect_fails_every_blocked_caller() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let callers: Vec<_> = (0..4)
        .map(|_| {
            let greeter = greeter.clone();
            thread::spawn(move || greeter.ping())
        })
        .collect();

    transport.wait_for_sent(4);
    assert_eq!(linker.pending_call_ids().len(), 4);

    transport.events().disconnected();

    for caller in callers {
        assert!(matches!(
            caller.join().unwrap(),
            Err(RpcCallerError::ConnectionLost)
        ));
    }
    assert!(linker.pending_call_ids().is_empty());
}

#[test]
fn test_call_racing_disconnect_never_strands() {
    for _ in 0..50 {
        let (transport, linker, greeter) = bound_greeter(Mode::Manual);
        let events = transport.events();
        let barrier = Arc::new(Barrier::new(2));

        let caller = thread::spawn({
            let barrier = barrier.clone();
            move || {
                barrier.wait();
                greeter.add(1, 2)
            }
        });
        let disconnector = thread::spawn({
            let barrier = barrier.clone();
            move || {
                barrier.wait();
                events.disconnected();
            }
        });

        disconnector.join().unwrap();
        match caller.join().unwrap() {
            Err(err) => assert!(matches!(err, RpcCallerError::NotConnected)),
            Ok(sum) => assert!(matches!(
                futures::executor::block_on(sum),
                Err(RpcCallerError::ConnectionLost)
            )),
        }
        assert!(linker.pending_call_ids().is_empty());
    }
}

#[test]
fn test_unbind_fails_pending_calls() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let caller = thread::spawn(move || greeter.ping());
    transport.wait_for_sent(1);

    linker.unbind().unwrap();

    assert!(matches!(
        caller.join().unwrap(),
        Err(RpcCallerError::ConnectionLost)
    ));
}

#[test]
fn test_responses_in_reverse_order_reach_their_calls() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let first = thread::spawn({
        let greeter = greeter.clone();
        move || greeter.greet("first".to_string(), 1)
    });
    transport.wait_for_sent(1);

    let second = thread::spawn({
        let greeter = greeter.clone();
        move || greeter.greet("second".to_string(), 2)
    });
    let sent = transport.wait_for_sent(2);
    assert_eq!(linker.pending_call_ids().len(), 2);

    for request in sent.iter().rev() {
        let (name, times): (String, u32) = codec::decode(&request.rpc_param_bytes).unwrap();
        let greeting = Greeting {
            text: name,
            times,
        };
        respond(&transport, request, codec::encode(&greeting));
    }

    let first = first.join().unwrap().unwrap();
    let second = second.join().unwrap().unwrap();
    assert_eq!((first.text.as_str(), first.times), ("first", 1));
    assert_eq!((second.text.as_str(), second.times), ("second", 2));
}

#[test]
fn test_duplicate_response_is_ignored() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let caller = thread::spawn(move || greeter.ping());
    let sent = transport.wait_for_sent(1);

    let response = RpcResponse::success(sent[0].rpc_call_id, codec::encode(&"pong".to_string()));
    assert!(linker.dispatcher().on_response(response.clone()));
    assert_eq!(caller.join().unwrap().unwrap(), "pong");

    let late = RpcResponse::success(sent[0].rpc_call_id, codec::encode(&"again".to_string()));
    assert!(!linker.dispatcher().on_response(late));
}

#[test]
fn test_concurrent_callers_share_one_descriptor() {
    let (_transport, linker, greeter) = bound_greeter(Mode::Answering);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let greeter = greeter.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                greeter.greet(format!("caller-{}", i), i)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let greeting = handle.join().unwrap().unwrap();
        assert_eq!(greeting.text, format!("Hello, caller-{}!", i));
    }

    assert_eq!(linker.cached_method_count(), 1);
    assert!(linker.pending_call_ids().is_empty());
}

// --- Adapters ---

#[test]
fn test_future_method_without_factory_is_configuration_error() {
    let transport = MockTransport::new(Mode::Answering);
    let linker = RpcLinker::builder()
        .peer("com.example.remote")
        .class_name("RemoteService")
        .transport(transport.clone())
        .build()
        .unwrap();
    linker.bind().unwrap();
    let greeter = linker.create::<GreeterProxy>().unwrap();

    match greeter.add(1, 2) {
        Err(RpcCallerError::Configuration(msg)) => {
            assert!(msg.contains("Unable to create call adapter for example.Greeter.add(a, b)"))
        }
        Err(other) => panic!("expected a configuration error, got {:?}", other),
        Ok(_) => panic!("expected a configuration error"),
    }

    // Failed builds are retried on the next call rather than cached.
    assert_eq!(linker.cached_method_count(), 0);
    assert!(greeter.add(1, 2).is_err());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_future_adapter_resolves_result() {
    let (_transport, _linker, greeter) = bound_greeter(Mode::Answering);

    let (sum1, sum2) = tokio::join!(greeter.add(1, 2).unwrap(), greeter.add(40, 2).unwrap());

    assert_eq!(sum1.unwrap(), 3);
    assert_eq!(sum2.unwrap(), 42);
}

#[tokio::test]
async fn test_future_adapter_does_not_block_caller() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let future = greeter.add(20, 22).unwrap();
    assert_eq!(linker.pending_call_ids(), vec![future.call_id()]);

    let sent = transport.sent();
    let responder = tokio::spawn({
        let transport = transport.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            respond(&transport, &sent[0], codec::encode(&42i64));
        }
    });

    assert_eq!(future.await.unwrap(), 42);
    responder.await.unwrap();
}

#[tokio::test]
async fn test_cancelled_future_ignores_late_response() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    let future = greeter.add(1, 2).unwrap();
    let call_id = future.call_id();

    assert!(future.cancel());
    assert!(!future.cancel());
    assert!(linker.pending_call_ids().is_empty());
    assert!(matches!(future.await, Err(RpcCallerError::Cancelled)));

    let sent = transport.sent();
    assert_eq!(sent[0].rpc_call_id, call_id);
    assert!(
        !linker
            .dispatcher()
            .on_response(RpcResponse::success(call_id, codec::encode(&3i64)))
    );
}

#[tokio::test]
async fn test_stream_adapter_yields_once() {
    let (_transport, _linker, greeter) = bound_greeter(Mode::Answering);

    let items: Vec<_> = greeter
        .split_words("one two  three".to_string())
        .unwrap()
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert_eq!(
        items.into_iter().next().unwrap().unwrap(),
        vec!["one", "two", "three"]
    );
}

#[test]
fn test_oneway_adapter_returns_without_waiting() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);

    greeter.notify("fire and forget".to_string()).unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(linker.pending_call_ids().is_empty());

    // A late acknowledgement has no call to reach.
    assert!(
        !linker
            .dispatcher()
            .on_response(RpcResponse::success(sent[0].rpc_call_id, codec::encode(&())))
    );
}

#[test]
fn test_oneway_calls_do_not_hold_pending_slots() {
    let transport = MockTransport::new(Mode::Manual);
    let linker = RpcLinker::builder()
        .peer("com.example.remote")
        .action("BIND")
        .transport(transport.clone())
        .add_call_adapter_factory(FutureCallAdapterFactory)
        .add_call_adapter_factory(OneWayCallAdapterFactory)
        .max_pending_calls(3)
        .build()
        .unwrap();
    linker.bind().unwrap();
    let greeter = linker.create::<GreeterProxy>().unwrap();

    for i in 0..5 {
        greeter.notify(format!("note {i}")).unwrap();
    }
    assert_eq!(transport.sent().len(), 5);
    assert!(linker.pending_call_ids().is_empty());

    let sum = greeter.add(1, 2).unwrap();
    assert_eq!(linker.pending_call_ids(), vec![sum.call_id()]);
}

#[test]
fn test_oneway_reports_send_failures() {
    let transport = MockTransport::new(Mode::Manual);
    let linker = linker_with(transport.clone());
    let greeter = linker.create::<GreeterProxy>().unwrap();

    assert!(matches!(
        greeter.notify("too early".to_string()),
        Err(RpcCallerError::NotConnected)
    ));
    assert!(transport.sent().is_empty());

    let (_transport, linker, greeter) = bound_greeter(Mode::Unreachable);
    assert!(matches!(
        greeter.notify("nobody home".to_string()),
        Err(RpcCallerError::Io(_))
    ));
    assert!(linker.pending_call_ids().is_empty());
}

#[test]
fn test_oneway_reaches_peer() {
    let (transport, _linker, greeter) = bound_greeter(Mode::Answering);

    greeter.notify("hello peer".to_string()).unwrap();

    assert_eq!(transport.peer.notifications(), vec!["hello peer".to_string()]);
}

// --- Linker configuration and lifecycle ---

#[test]
fn test_builder_requires_transport_and_peer() {
    let missing_transport = RpcLinker::builder()
        .peer("com.example.remote")
        .action("BIND")
        .build();
    assert!(matches!(
        missing_transport,
        Err(RpcCallerError::Configuration(_))
    ));

    let missing_peer = RpcLinker::builder()
        .action("BIND")
        .transport(MockTransport::new(Mode::Manual))
        .build();
    match missing_peer {
        Err(RpcCallerError::Configuration(msg)) => assert_eq!(msg, "Peer name required."),
        other => panic!("expected a configuration error, got {:?}", other.err()),
    }

    let missing_target = RpcLinker::builder()
        .peer("com.example.remote")
        .transport(MockTransport::new(Mode::Manual))
        .build();
    assert!(matches!(
        missing_target,
        Err(RpcCallerError::Configuration(_))
    ));
}

#[test]
fn test_pending_limit_refuses_new_calls() {
    let transport = MockTransport::new(Mode::Manual);
    let linker = RpcLinker::builder()
        .peer("com.example.remote")
        .action("BIND")
        .transport(transport.clone())
        .add_call_adapter_factory(FutureCallAdapterFactory)
        .max_pending_calls(1)
        .build()
        .unwrap();
    linker.bind().unwrap();
    let greeter = linker.create::<GreeterProxy>().unwrap();

    let _first = greeter.add(1, 1).unwrap();
    assert!(matches!(
        greeter.add(2, 2),
        Err(RpcCallerError::TooManyPendingCalls { limit: 1 })
    ));
    assert_eq!(transport.sent().len(), 1);
}

#[test]
fn test_state_change_handler_sees_transitions() {
    let transport = MockTransport::new(Mode::Manual);
    let linker = linker_with(transport.clone());

    let states = Arc::new(Mutex::new(Vec::new()));
    linker.set_state_change_handler({
        let states = states.clone();
        move |state| states.lock().unwrap().push(state)
    });

    linker.bind().unwrap();
    transport.events().connected();
    linker.unbind().unwrap();
    linker.events().disconnected();

    assert_eq!(
        *states.lock().unwrap(),
        vec![
            RpcTransportState::Connected,
            RpcTransportState::Disconnected
        ]
    );
}

#[test]
fn test_state_change_handler_can_replace_itself() {
    let transport = MockTransport::new(Mode::Manual);
    let linker = linker_with(transport.clone());

    let states = Arc::new(Mutex::new(Vec::new()));
    linker.set_state_change_handler({
        let linker = linker.clone();
        let states = states.clone();
        move |first| {
            states.lock().unwrap().push(("first", first));
            let states = states.clone();
            linker.set_state_change_handler(move |state| {
                states.lock().unwrap().push(("second", state))
            });
        }
    });

    linker.bind().unwrap();
    linker.unbind().unwrap();

    assert_eq!(
        *states.lock().unwrap(),
        vec![
            ("first", RpcTransportState::Connected),
            ("second", RpcTransportState::Disconnected)
        ]
    );
}

#[test]
fn test_callbacks_are_run_by_invoker() {
    let invoker = CallbackInvoker::new();
    invoker
        .register::<(u32, u32), String, _>(ON_PROGRESS_METHOD_ID, |(step, total)| {
            Ok(format!("{}/{}", step, total))
        })
        .unwrap();

    let transport = MockTransport::new(Mode::Manual);
    let linker = RpcLinker::builder()
        .peer("com.example.remote")
        .action("BIND")
        .transport(transport.clone())
        .invoker(invoker)
        .build()
        .unwrap();
    linker.bind().unwrap();

    let response = transport.events().callback(RpcRequest {
        rpc_call_id: 7,
        rpc_method_id: ON_PROGRESS_METHOD_ID,
        rpc_method_signature: "example.ProgressListener.on_progress(step, total)".into(),
        rpc_param_bytes: codec::encode(&(2u32, 5u32)),
    });
    assert_eq!(response.rpc_call_id, 7);
    assert_eq!(response.rpc_result_status, RpcResultStatus::Success);
    let ack: String = codec::decode(&response.rpc_payload_bytes).unwrap();
    assert_eq!(ack, "2/5");

    let unknown = transport.events().callback(RpcRequest {
        rpc_call_id: 8,
        rpc_method_id: 12345,
        rpc_method_signature: "example.Unknown.call()".into(),
        rpc_param_bytes: Vec::new(),
    });
    assert_eq!(unknown.rpc_result_status, RpcResultStatus::MethodNotFound);
}

#[test]
fn test_callback_without_invoker_is_method_not_found() {
    let (transport, _linker, _greeter) = bound_greeter(Mode::Manual);

    let response = transport.events().callback(RpcRequest {
        rpc_call_id: 1,
        rpc_method_id: ON_PROGRESS_METHOD_ID,
        rpc_method_signature: "example.ProgressListener.on_progress(step, total)".into(),
        rpc_param_bytes: codec::encode(&(1u32, 1u32)),
    });

    assert_eq!(response.rpc_result_status, RpcResultStatus::MethodNotFound);
}

// --- Proxy ---

#[test]
fn test_proxy_base_operations_stay_local() {
    let (transport, linker, greeter) = bound_greeter(Mode::Manual);
    let other = linker.create::<GreeterProxy>().unwrap();

    let copy = greeter.clone();
    assert_eq!(greeter, copy);
    assert_ne!(greeter, other);

    let set: HashSet<GreeterProxy> = [greeter.clone(), copy, other].into_iter().collect();
    assert_eq!(set.len(), 2);

    assert!(format!("{:?}", greeter).starts_with("GreeterProxy("));
    assert_eq!(
        greeter.to_string(),
        "example.Greeter proxy for com.example.remote#com.example.remote.BIND"
    );

    assert!(transport.sent().is_empty());
}

#[test]
fn test_return_type_mismatch_is_rejected() {
    let (transport, _linker, greeter) = bound_greeter(Mode::Answering);

    let result = greeter.handler().invoke::<i64, _>("ping", ());

    assert!(matches!(result, Err(RpcCallerError::Configuration(_))));
    assert!(transport.sent().is_empty());
}

struct ShadowingProxy {
    handler: InvocationHandler,
}

impl RpcInterface for ShadowingProxy {
    const INTERFACE_NAME: &'static str = "example.Shadowing";

    fn declaration() -> InterfaceDeclaration {
        InterfaceDeclaration::new(
            Self::INTERFACE_NAME,
            vec![MethodDeclaration::new::<(), u64>(
                Self::INTERFACE_NAME,
                "hash",
                &[],
                ReturnType::of::<u64, u64>(ReturnShape::Value),
                &[],
            )],
        )
    }

    fn from_handler(handler: InvocationHandler) -> Self {
        Self { handler }
    }

    fn handler(&self) -> &InvocationHandler {
        &self.handler
    }
}

#[test]
fn test_create_rejects_interface_shadowing_local_operations() {
    let linker = linker_with(MockTransport::new(Mode::Manual));

    match linker.create::<ShadowingProxy>() {
        Err(RpcCallerError::Configuration(msg)) => assert!(msg.contains("example.Shadowing.hash")),
        Err(other) => panic!("expected a configuration error, got {:?}", other),
        Ok(proxy) => panic!("expected a configuration error, got {:?}", proxy.handler()),
    }
}

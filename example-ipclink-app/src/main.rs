use example_ipclink_app::LoopbackTransport;
use example_ipclink_service_definition::{Greeter, GreeterPeer, GreeterProxy, ON_PROGRESS_METHOD_ID};
use futures::StreamExt;
use ipclink_rpc_service_caller::{
    CallbackInvoker, FutureCallAdapterFactory, OneWayCallAdapterFactory, RpcCallerError,
    RpcLinker, StreamCallAdapterFactory,
};
use std::sync::Arc;
use tokio::join;
use tokio::runtime::Handle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ipclink_rpc_service_caller=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let peer = GreeterPeer::new()?;

    let invoker = CallbackInvoker::new();
    invoker.register::<(u32, u32), String, _>(ON_PROGRESS_METHOD_ID, |(step, total)| {
        tracing::info!("Peer progress: {}/{}", step, total);
        Ok(format!("ack {}/{}", step, total))
    })?;

    let linker = RpcLinker::builder()
        .peer("example.peer")
        .action("example.Greeter.BIND")
        .transport(Arc::new(LoopbackTransport::new(peer.clone(), Handle::current())))
        .add_call_adapter_factory(FutureCallAdapterFactory)
        .add_call_adapter_factory(StreamCallAdapterFactory)
        .add_call_adapter_factory(OneWayCallAdapterFactory)
        .invoker(invoker)
        .build()?;

    linker.set_state_change_handler(|state| {
        tracing::info!("Transport state changed: {:?}", state);
    });

    linker.bind()?;

    let greeter: GreeterProxy = linker.create()?;
    println!("Created {}", greeter);

    // Value-shaped methods block until the response arrives, so keep them
    // off the async workers.
    let (pong, greeting, failure) = tokio::task::spawn_blocking({
        let greeter = greeter.clone();
        move || -> Result<_, RpcCallerError> {
            let pong = greeter.ping()?;
            let greeting = greeter.greet("ipclink".to_string(), 2)?;
            let failure = greeter.fail("deliberate failure".to_string());
            Ok((pong, greeting, failure))
        }
    })
    .await??;

    println!("Result from ping(): {}", pong);
    println!("Result from greet(): {:?}", greeting);
    if let Err(err) = failure {
        println!("Result from fail(): {}", err);
    }

    let (sum1, sum2) = join!(greeter.add(1, 2)?, greeter.add(40, 2)?);
    println!("Result from first add(): {:?}", sum1);
    println!("Result from second add(): {:?}", sum2);

    let mut words = greeter.split_words("hello from the loopback peer".to_string())?;
    while let Some(chunk) = words.next().await {
        println!("Result from split_words(): {:?}", chunk?);
    }

    greeter.notify("demo finished".to_string())?;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    println!("Peer notifications: {:?}", peer.notifications());

    linker.unbind()?;
    Ok(())
}

use bitcode::{Decode, Encode};
use ipclink_rpc_service_caller::{RpcFuture, RpcStream, impl_rpc_value, rpc_interface};

pub const GREETER_INTERFACE: &str = "example.Greeter";

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct Greeting {
    pub text: String,
    pub times: u32,
}

impl_rpc_value!(Greeting);

rpc_interface! {
    /// Demo service exercising each built-in return shape.
    pub trait Greeter => GreeterProxy ("example.Greeter") {
        fn ping() -> String;
        fn greet(name: String, times: u32) -> Greeting;
        fn add(a: i64, b: i64) -> RpcFuture<i64>;
        fn split_words(text: String) -> RpcStream<Vec<String>>;
        fn fail(message: String) -> String;
        #[tags("oneway")]
        fn notify(message: String) -> ();
    }
}

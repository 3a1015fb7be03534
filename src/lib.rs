pub mod rpc;
pub mod utils;

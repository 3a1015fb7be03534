mod loopback_transport;
pub use loopback_transport::LoopbackTransport;

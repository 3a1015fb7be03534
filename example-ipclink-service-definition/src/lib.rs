mod greeter;
pub use greeter::*;
mod greeter_peer;
pub use greeter_peer::*;
mod progress_listener;
pub use progress_listener::*;

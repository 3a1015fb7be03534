pub mod codec;
mod declaration;
pub use declaration::*;
mod return_type;
pub use return_type::*;
mod macros;
pub use macros::*;

// Re-exported so generated code only has to name this crate.
pub use bitcode;

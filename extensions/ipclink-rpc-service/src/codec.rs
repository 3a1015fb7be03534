//! bitcode-backed argument and result encoding.
//!
//! Declarations store monomorphized instances of these functions as plain
//! `fn` pointers, so the invocation path never needs to know the concrete
//! argument or result types.

use bitcode::{DecodeOwned, Encode};
use std::any::{Any, type_name};
use std::io;

pub type ArgsEncoder = fn(&(dyn Any + Send)) -> Result<Vec<u8>, io::Error>;
pub type ResultDecoder = fn(&[u8]) -> Result<Box<dyn Any + Send>, io::Error>;

/// Encodes a type-erased argument tuple, which must be an `A`.
pub fn encode_args<A: Encode + 'static>(args: &(dyn Any + Send)) -> Result<Vec<u8>, io::Error> {
    let args = args.downcast_ref::<A>().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("argument type mismatch: expected `{}`", type_name::<A>()),
        )
    })?;

    Ok(bitcode::encode(args))
}

/// Decodes a response payload into a boxed `O`.
pub fn decode_result<O: DecodeOwned + Send + 'static>(
    bytes: &[u8],
) -> Result<Box<dyn Any + Send>, io::Error> {
    let value = decode::<O>(bytes)?;
    Ok(Box::new(value))
}

pub fn encode<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    bitcode::encode(value)
}

pub fn decode<T: DecodeOwned>(bytes: &[u8]) -> Result<T, io::Error> {
    bitcode::decode::<T>(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

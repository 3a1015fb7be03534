use ipclink::rpc::RpcResultStatus;
use ipclink_rpc_service::DeclarationError;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Represents errors that can occur during an RPC call from the perspective of the caller.
///
/// The type is `Clone` because a resolved call keeps its outcome and hands a
/// copy to every reader.
#[derive(Debug, Clone)]
pub enum RpcCallerError {
    /// Malformed interface, unsupported return type, or missing required setting.
    Configuration(String),
    /// The invocation was attempted while the transport was disconnected.
    NotConnected,
    /// The transport disconnected while the call was awaiting its response.
    ConnectionLost,
    /// The peer answered with an error payload instead of a result.
    RemoteExecution {
        status: RpcResultStatus,
        payload: Vec<u8>,
    },
    /// The transport refused the request synchronously.
    Io(Arc<io::Error>),
    /// Arguments could not be encoded or the result could not be decoded.
    Codec(String),
    /// The call was cancelled before a result arrived.
    Cancelled,
    /// Too many calls are already awaiting a response.
    TooManyPendingCalls { limit: usize },
    /// Another call registered under the same id is still awaiting its response.
    CallIdInUse { call_id: u32 },
}

impl RpcCallerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        RpcCallerError::Configuration(message.into())
    }

    /// The error payload as UTF-8 text, if this is a remote failure.
    pub fn remote_message(&self) -> Option<String> {
        match self {
            RpcCallerError::RemoteExecution { payload, .. } => {
                Some(String::from_utf8_lossy(payload).into_owned())
            }
            _ => None,
        }
    }
}

impl fmt::Display for RpcCallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallerError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            RpcCallerError::NotConnected => write!(f, "Transport is not connected"),
            RpcCallerError::ConnectionLost => {
                write!(f, "Connection lost while the call was pending")
            }
            RpcCallerError::RemoteExecution { status, payload } => write!(
                f,
                "Remote execution failed ({:?}): {}",
                status,
                String::from_utf8_lossy(payload)
            ),
            RpcCallerError::Io(e) => write!(f, "I/O error: {}", e),
            RpcCallerError::Codec(msg) => write!(f, "Codec error: {}", msg),
            RpcCallerError::Cancelled => write!(f, "RPC call cancelled"),
            RpcCallerError::TooManyPendingCalls { limit } => {
                write!(f, "Too many pending calls (limit {})", limit)
            }
            RpcCallerError::CallIdInUse { call_id } => {
                write!(f, "Call id {} is already in flight", call_id)
            }
        }
    }
}

impl std::error::Error for RpcCallerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcCallerError::Io(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for RpcCallerError {
    fn from(e: io::Error) -> Self {
        RpcCallerError::Io(Arc::new(e))
    }
}

impl From<DeclarationError> for RpcCallerError {
    fn from(e: DeclarationError) -> Self {
        RpcCallerError::Configuration(e.to_string())
    }
}

impl From<RpcCallerError> for io::Error {
    fn from(e: RpcCallerError) -> Self {
        match e {
            RpcCallerError::Io(inner) => io::Error::new(inner.kind(), inner.to_string()),
            RpcCallerError::NotConnected => io::Error::new(io::ErrorKind::NotConnected, e.to_string()),
            RpcCallerError::ConnectionLost => {
                io::Error::new(io::ErrorKind::ConnectionAborted, e.to_string())
            }
            other => io::Error::other(other.to_string()),
        }
    }
}

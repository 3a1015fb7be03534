use crate::rpc::RpcResultStatus;

/// A single outbound invocation, already encoded.
///
/// The request is constructed once per invocation and handed to the transport
/// exactly once. `rpc_call_id` correlates it with the eventual [`RpcResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    pub rpc_call_id: u32,
    pub rpc_method_id: u64,
    /// Human readable target, e.g. `example.Greeter.add(a, b)`.
    pub rpc_method_signature: String,
    pub rpc_param_bytes: Vec<u8>,
}

/// The peer's answer to a [`RpcRequest`].
///
/// On success `rpc_payload_bytes` holds the encoded result; otherwise it holds
/// whatever error payload the peer chose to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
    pub rpc_call_id: u32,
    pub rpc_result_status: RpcResultStatus,
    pub rpc_payload_bytes: Vec<u8>,
}

impl RpcResponse {
    pub fn success(rpc_call_id: u32, rpc_payload_bytes: Vec<u8>) -> Self {
        Self {
            rpc_call_id,
            rpc_result_status: RpcResultStatus::Success,
            rpc_payload_bytes,
        }
    }

    pub fn failure(
        rpc_call_id: u32,
        rpc_result_status: RpcResultStatus,
        rpc_payload_bytes: Vec<u8>,
    ) -> Self {
        Self {
            rpc_call_id,
            rpc_result_status,
            rpc_payload_bytes,
        }
    }

    /// Builds the response that answers `request` with the given status.
    pub fn for_request(
        request: &RpcRequest,
        rpc_result_status: RpcResultStatus,
        rpc_payload_bytes: Vec<u8>,
    ) -> Self {
        Self {
            rpc_call_id: request.rpc_call_id,
            rpc_result_status,
            rpc_payload_bytes,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.rpc_result_status.is_success()
    }
}

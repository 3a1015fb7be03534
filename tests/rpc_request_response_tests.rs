use ipclink::rpc::{RpcRequest, RpcResponse, RpcResultStatus};
use rand::Rng;

fn sample_request(rpc_call_id: u32) -> RpcRequest {
    RpcRequest {
        rpc_call_id,
        rpc_method_id: 0xABCD_ABCD_ABCD_ABCD,
        rpc_method_signature: "example.Greeter.ping()".to_string(),
        rpc_param_bytes: vec![],
    }
}

#[test]
fn response_for_request_carries_call_id() {
    let request = sample_request(42);
    let response = RpcResponse::for_request(&request, RpcResultStatus::Success, b"pong".to_vec());

    assert_eq!(response.rpc_call_id, 42);
    assert!(response.is_success());
    assert_eq!(response.rpc_payload_bytes, b"pong");
}

#[test]
fn failure_response_is_not_success() {
    let response = RpcResponse::failure(7, RpcResultStatus::Fail, b"boom".to_vec());
    assert!(!response.is_success());
    assert_eq!(response.rpc_result_status, RpcResultStatus::Fail);
}

#[test]
fn result_status_byte_conversion() {
    for status in [
        RpcResultStatus::Success,
        RpcResultStatus::Fail,
        RpcResultStatus::SystemError,
        RpcResultStatus::MethodNotFound,
    ] {
        assert_eq!(RpcResultStatus::try_from(status.value()).unwrap(), status);
    }

    let mut rng = rand::rng();
    for _ in 0..100 {
        let byte: u8 = rng.random_range(4..=u8::MAX);
        assert!(RpcResultStatus::try_from(byte).is_err());
    }
}

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Outcome reported by the peer for a single call.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum RpcResultStatus {
    Success = 0,
    /// The remote handler ran and returned an application-level error payload.
    Fail = 1,
    /// The remote side failed before or while running the handler.
    SystemError = 2,
    MethodNotFound = 3,
}

impl RpcResultStatus {
    #[inline]
    pub fn value(self) -> u8 {
        self.into()
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self == RpcResultStatus::Success
    }
}

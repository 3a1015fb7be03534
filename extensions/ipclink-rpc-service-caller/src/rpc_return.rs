use crate::{Adapted, PendingResult, RpcCallerError};
use bitcode::DecodeOwned;
use futures::Stream;
use ipclink_rpc_service::{ReturnShape, ReturnType};
use std::any::type_name;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A type a declared interface method may return.
///
/// `Output` is what the response payload decodes into; `Self` is what the
/// caller receives once a call adapter has shaped the call.
pub trait RpcReturn: Sized + Send + 'static {
    type Output: DecodeOwned + Send + 'static;

    fn return_type() -> ReturnType;

    fn from_adapted(adapted: Adapted) -> Result<Self, RpcCallerError>;
}

/// Unboxes an adapter's output, failing if the adapter produced something else.
pub fn downcast_adapted<T: 'static>(adapted: Adapted) -> Result<T, RpcCallerError> {
    adapted.downcast::<T>().map(|value| *value).map_err(|_| {
        RpcCallerError::configuration(format!(
            "call adapter did not produce a `{}`",
            type_name::<T>()
        ))
    })
}

/// Implements [`RpcReturn`] for types returned as plain, blocking values.
#[macro_export]
macro_rules! impl_rpc_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::RpcReturn for $ty {
                type Output = $ty;

                fn return_type() -> $crate::ipclink_rpc_service::ReturnType {
                    $crate::ipclink_rpc_service::ReturnType::of::<$ty, $ty>(
                        $crate::ipclink_rpc_service::ReturnShape::Value,
                    )
                }

                fn from_adapted(adapted: $crate::Adapted) -> Result<Self, $crate::RpcCallerError> {
                    $crate::downcast_adapted::<$ty>(adapted)
                }
            }
        )*
    };
}

impl_rpc_value!(
    (),
    bool,
    u8,
    u16,
    u32,
    u64,
    u128,
    i8,
    i16,
    i32,
    i64,
    i128,
    f32,
    f64,
    String,
);

impl<T> RpcReturn for Vec<T>
where
    T: DecodeOwned + Send + 'static,
{
    type Output = Vec<T>;

    fn return_type() -> ReturnType {
        ReturnType::of::<Self, Self>(ReturnShape::Value)
    }

    fn from_adapted(adapted: Adapted) -> Result<Self, RpcCallerError> {
        downcast_adapted::<Self>(adapted)
    }
}

impl<T> RpcReturn for Option<T>
where
    T: DecodeOwned + Send + 'static,
{
    type Output = Option<T>;

    fn return_type() -> ReturnType {
        ReturnType::of::<Self, Self>(ReturnShape::Value)
    }

    fn from_adapted(adapted: Adapted) -> Result<Self, RpcCallerError> {
        downcast_adapted::<Self>(adapted)
    }
}

/// Non-blocking result of a method declared to return a future.
///
/// Requires [`FutureCallAdapterFactory`](crate::FutureCallAdapterFactory).
pub struct RpcFuture<T> {
    pending: PendingResult,
    _output: PhantomData<fn() -> T>,
}

impl<T> RpcFuture<T> {
    pub fn new(pending: PendingResult) -> Self {
        Self {
            pending,
            _output: PhantomData,
        }
    }

    pub fn call_id(&self) -> u32 {
        self.pending.call().call_id()
    }

    /// Cancels the underlying call. The future then resolves to
    /// [`RpcCallerError::Cancelled`].
    pub fn cancel(&self) -> bool {
        self.pending.call().cancel()
    }
}

impl<T> RpcReturn for RpcFuture<T>
where
    T: DecodeOwned + Send + 'static,
{
    type Output = T;

    fn return_type() -> ReturnType {
        ReturnType::of::<Self, T>(ReturnShape::Future)
    }

    fn from_adapted(adapted: Adapted) -> Result<Self, RpcCallerError> {
        downcast_adapted::<PendingResult>(adapted).map(RpcFuture::new)
    }
}

impl<T: 'static> Future for RpcFuture<T> {
    type Output = Result<T, RpcCallerError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.pending)
            .poll(cx)
            .map(|result| result.and_then(downcast_adapted::<T>))
    }
}

/// Stream form of a call's result: yields it once, then ends.
///
/// Requires [`StreamCallAdapterFactory`](crate::StreamCallAdapterFactory).
pub struct RpcStream<T> {
    pending: Option<PendingResult>,
    call_id: u32,
    _output: PhantomData<fn() -> T>,
}

impl<T> RpcStream<T> {
    pub fn new(pending: PendingResult) -> Self {
        Self {
            call_id: pending.call().call_id(),
            pending: Some(pending),
            _output: PhantomData,
        }
    }

    pub fn call_id(&self) -> u32 {
        self.call_id
    }

    pub fn is_terminated(&self) -> bool {
        self.pending.is_none()
    }
}

impl<T> RpcReturn for RpcStream<T>
where
    T: DecodeOwned + Send + 'static,
{
    type Output = T;

    fn return_type() -> ReturnType {
        ReturnType::of::<Self, T>(ReturnShape::Stream)
    }

    fn from_adapted(adapted: Adapted) -> Result<Self, RpcCallerError> {
        downcast_adapted::<PendingResult>(adapted).map(RpcStream::new)
    }
}

impl<T: 'static> Stream for RpcStream<T> {
    type Item = Result<T, RpcCallerError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        let Some(pending) = this.pending.as_mut() else {
            return Poll::Ready(None);
        };

        match Pin::new(pending).poll(cx) {
            Poll::Ready(result) => {
                this.pending = None;
                Poll::Ready(Some(result.and_then(downcast_adapted::<T>)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

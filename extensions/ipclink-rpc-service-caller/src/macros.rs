/// Declares a remote interface: a trait, a proxy struct implementing it, and
/// the [`RpcInterface`](crate::RpcInterface) glue an
/// [`RpcLinker`](crate::RpcLinker) needs to create the proxy.
///
/// Every trait method returns `Result<R, RpcCallerError>` where `R` is the
/// declared return type, which must implement [`RpcReturn`](crate::RpcReturn).
/// Arguments are encoded as a tuple in declaration order. Method tags are
/// visible to call adapter factories.
///
/// The proxy answers `clone`, `eq`, `hash`, `fmt` and `to_string` itself;
/// those calls never reach the peer.
///
/// ```rust,ignore
/// use ipclink_rpc_service_caller::{RpcFuture, rpc_interface};
///
/// rpc_interface! {
///     pub trait Greeter => GreeterProxy ("example.Greeter") {
///         fn ping() -> String;
///         fn add(a: i64, b: i64) -> RpcFuture<i64>;
///         #[tags("oneway")]
///         fn notify(message: String) -> ();
///     }
/// }
/// ```
#[macro_export]
macro_rules! rpc_interface {
    (
        $(#[$meta:meta])*
        $vis:vis trait $trait_name:ident => $proxy:ident ($interface:literal) {
            $(
                $(#[tags($($tag:literal),* $(,)?)])?
                fn $method:ident($($arg:ident : $arg_ty:ty),* $(,)?) -> $ret:ty;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $trait_name {
            $(
                fn $method(&self, $($arg: $arg_ty),*) -> ::std::result::Result<$ret, $crate::RpcCallerError>;
            )*
        }

        #[derive(Clone, PartialEq, Eq, Hash)]
        $vis struct $proxy {
            handler: $crate::InvocationHandler,
        }

        impl $trait_name for $proxy {
            $(
                fn $method(&self, $($arg: $arg_ty),*) -> ::std::result::Result<$ret, $crate::RpcCallerError> {
                    self.handler.invoke::<$ret, _>(stringify!($method), ($($arg,)*))
                }
            )*
        }

        impl $crate::RpcInterface for $proxy {
            const INTERFACE_NAME: &'static str = $interface;

            fn declaration() -> $crate::ipclink_rpc_service::InterfaceDeclaration {
                $crate::ipclink_rpc_service::InterfaceDeclaration::new(
                    $interface,
                    ::std::vec![
                        $(
                            $crate::ipclink_rpc_service::MethodDeclaration::new::<
                                ($($arg_ty,)*),
                                <$ret as $crate::RpcReturn>::Output,
                            >(
                                $interface,
                                stringify!($method),
                                &[$(stringify!($arg)),*],
                                <$ret as $crate::RpcReturn>::return_type(),
                                &[$($($tag),*)?],
                            ),
                        )*
                    ],
                )
            }

            fn from_handler(handler: $crate::InvocationHandler) -> Self {
                Self { handler }
            }

            fn handler(&self) -> &$crate::InvocationHandler {
                &self.handler
            }
        }

        impl ::std::fmt::Debug for $proxy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({:?})", stringify!($proxy), self.handler)
            }
        }

        impl ::std::fmt::Display for $proxy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(
                    f,
                    "{} proxy for {}",
                    $interface,
                    self.handler.linker().service()
                )
            }
        }
    };
}

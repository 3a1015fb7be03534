use crate::constants::DEFAULT_MAX_PENDING_CALLS;
use crate::{
    CallAdapter, CallAdapterFactory, CallAdapterRegistry, CallbackInvoker, Dispatcher,
    MethodDescriptorCache, RemoteCall, RpcCallerError, RpcReturn, RpcTransport, RpcTransportState,
    ServiceDescriptor, TransportEvents,
};
use ipclink::rpc::RpcRequest;
use ipclink_rpc_service::{InterfaceDeclaration, ReturnType};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A declared remote interface, implemented by the proxy types
/// [`rpc_interface!`](crate::rpc_interface) generates.
pub trait RpcInterface: Sized {
    const INTERFACE_NAME: &'static str;

    fn declaration() -> InterfaceDeclaration;

    fn from_handler(handler: InvocationHandler) -> Self;

    fn handler(&self) -> &InvocationHandler;
}

/// Front-end shared by every proxy a linker creates.
#[derive(Clone)]
pub struct RpcLinker {
    shared: Arc<LinkerShared>,
}

struct LinkerShared {
    service: ServiceDescriptor,
    transport: Arc<dyn RpcTransport>,
    dispatcher: Arc<Dispatcher>,
    adapters: CallAdapterRegistry,
    method_cache: MethodDescriptorCache,
    events: TransportEvents,
}

impl RpcLinker {
    pub fn builder() -> RpcLinkerBuilder {
        RpcLinkerBuilder::default()
    }

    /// Creates a proxy for the interface `P`.
    ///
    /// Fails with [`RpcCallerError::Configuration`] if `P`'s declaration is not
    /// a valid remote interface.
    pub fn create<P: RpcInterface>(&self) -> Result<P, RpcCallerError> {
        let declaration = P::declaration();
        declaration.validate()?;

        if declaration.name() != P::INTERFACE_NAME {
            return Err(RpcCallerError::configuration(format!(
                "`{}` declares methods for `{}`",
                P::INTERFACE_NAME,
                declaration.name()
            )));
        }

        tracing::debug!(
            "Creating proxy for {} with {} methods",
            declaration.name(),
            declaration.methods().len()
        );

        Ok(P::from_handler(InvocationHandler {
            inner: Arc::new(HandlerInner {
                linker: self.clone(),
                declaration,
            }),
        }))
    }

    /// Asks the transport to connect to the service. Connection progress is
    /// reported through [`TransportEvents`].
    pub fn bind(&self) -> Result<(), RpcCallerError> {
        tracing::info!("Binding to {}", self.shared.service);
        self.shared
            .transport
            .bind(&self.shared.service, self.shared.events.clone())?;
        Ok(())
    }

    /// Releases the transport. Calls still pending fail with
    /// [`RpcCallerError::ConnectionLost`].
    pub fn unbind(&self) -> Result<(), RpcCallerError> {
        tracing::info!("Unbinding from {}", self.shared.service);
        let result = self.shared.transport.unbind();
        self.shared.events.disconnected();
        result.map_err(RpcCallerError::from)
    }

    /// Resolves the adapter that would handle `return_type`.
    pub fn find_call_adapter(
        &self,
        return_type: &ReturnType,
        tags: &[&'static str],
    ) -> Result<Arc<dyn CallAdapter>, RpcCallerError> {
        self.shared.adapters.resolve(return_type, tags)
    }

    pub fn service(&self) -> &ServiceDescriptor {
        &self.shared.service
    }

    pub fn transport_state(&self) -> RpcTransportState {
        self.shared.dispatcher.state()
    }

    /// The event sink the transport drives.
    pub fn events(&self) -> &TransportEvents {
        &self.shared.events
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.shared.dispatcher
    }

    /// Sets a callback to be invoked whenever the transport state changes.
    pub fn set_state_change_handler(
        &self,
        handler: impl Fn(RpcTransportState) + Send + Sync + 'static,
    ) {
        self.shared.events.set_state_change_handler(Arc::new(handler));
    }

    pub fn pending_call_ids(&self) -> Vec<u32> {
        self.shared.dispatcher.pending_call_ids()
    }

    pub fn cached_method_count(&self) -> usize {
        self.shared.method_cache.len()
    }

    fn invoke<R, A>(
        &self,
        declaration: &InterfaceDeclaration,
        method_name: &str,
        args: A,
    ) -> Result<R, RpcCallerError>
    where
        R: RpcReturn,
        A: Send + 'static,
    {
        let method = declaration.method(method_name).ok_or_else(|| {
            RpcCallerError::configuration(format!(
                "`{}` declares no method `{}`",
                declaration.name(),
                method_name
            ))
        })?;

        if method.return_type().type_id() != TypeId::of::<R>() {
            return Err(RpcCallerError::configuration(format!(
                "{} returns `{}`, not `{}`",
                method.signature(),
                method.return_type(),
                std::any::type_name::<R>()
            )));
        }

        let shared = &self.shared;
        let descriptor = shared.method_cache.resolve(method, &shared.adapters)?;

        let request = RpcRequest {
            rpc_call_id: shared.dispatcher.next_call_id(),
            rpc_method_id: descriptor.method_id(),
            rpc_method_signature: descriptor.signature().to_string(),
            rpc_param_bytes: descriptor.encode_args(&args)?,
        };

        tracing::trace!(
            "Invoking {} as call {}",
            request.rpc_method_signature,
            request.rpc_call_id
        );

        let call = RemoteCall::new(
            request,
            descriptor.clone(),
            shared.transport.clone(),
            shared.dispatcher.clone(),
        );

        let adapted = descriptor.call_adapter().adapt(call)?;
        R::from_adapted(adapted)
    }
}

impl fmt::Debug for RpcLinker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcLinker")
            .field("service", &self.shared.service)
            .field("state", &self.transport_state())
            .field("pending", &self.shared.dispatcher.pending_len())
            .finish()
    }
}

/// Routes a proxy's method calls into its linker.
///
/// Equality and hashing follow the identity of the proxy it was created for,
/// so clones of one proxy compare equal and separately created proxies do not.
#[derive(Clone)]
pub struct InvocationHandler {
    inner: Arc<HandlerInner>,
}

struct HandlerInner {
    linker: RpcLinker,
    declaration: InterfaceDeclaration,
}

impl InvocationHandler {
    /// Invokes `method_name` remotely with the argument tuple `args`.
    pub fn invoke<R, A>(&self, method_name: &str, args: A) -> Result<R, RpcCallerError>
    where
        R: RpcReturn,
        A: Send + 'static,
    {
        self.inner
            .linker
            .invoke(&self.inner.declaration, method_name, args)
    }

    pub fn declaration(&self) -> &InterfaceDeclaration {
        &self.inner.declaration
    }

    pub fn linker(&self) -> &RpcLinker {
        &self.inner.linker
    }
}

impl PartialEq for InvocationHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for InvocationHandler {}

impl Hash for InvocationHandler {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl fmt::Debug for InvocationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{:x} -> {}",
            self.inner.declaration.name(),
            Arc::as_ptr(&self.inner) as usize,
            self.inner.linker.service()
        )
    }
}

/// Configures an [`RpcLinker`].
pub struct RpcLinkerBuilder {
    peer: Option<String>,
    action: Option<String>,
    class_name: Option<String>,
    transport: Option<Arc<dyn RpcTransport>>,
    adapters: CallAdapterRegistry,
    invoker: Option<CallbackInvoker>,
    max_pending_calls: usize,
}

impl Default for RpcLinkerBuilder {
    fn default() -> Self {
        Self {
            peer: None,
            action: None,
            class_name: None,
            transport: None,
            adapters: CallAdapterRegistry::new(),
            invoker: None,
            max_pending_calls: DEFAULT_MAX_PENDING_CALLS,
        }
    }
}

impl RpcLinkerBuilder {
    pub fn peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = Some(peer.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Adds a factory, tried after any added earlier and before the default.
    pub fn add_call_adapter_factory(mut self, factory: impl CallAdapterFactory + 'static) -> Self {
        self.adapters.add_factory(Arc::new(factory));
        self
    }

    pub fn invoker(mut self, invoker: CallbackInvoker) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn max_pending_calls(mut self, max_pending_calls: usize) -> Self {
        self.max_pending_calls = max_pending_calls;
        self
    }

    pub fn build(self) -> Result<RpcLinker, RpcCallerError> {
        let service =
            ServiceDescriptor::new(self.peer.unwrap_or_default(), self.action, self.class_name)?;

        let transport = self
            .transport
            .ok_or_else(|| RpcCallerError::configuration("Transport required."))?;

        if self.max_pending_calls == 0 {
            return Err(RpcCallerError::configuration(
                "max_pending_calls must be at least 1",
            ));
        }

        let dispatcher = Arc::new(Dispatcher::new(self.max_pending_calls));
        let events = TransportEvents::new(dispatcher.clone(), self.invoker);

        Ok(RpcLinker {
            shared: Arc::new(LinkerShared {
                service,
                transport,
                dispatcher,
                adapters: self.adapters,
                method_cache: MethodDescriptorCache::new(),
                events,
            }),
        })
    }
}

use xxhash_rust::const_xxh3::xxh3_64 as const_xxh3_64;

pub const fn method_id_hash(name: &str) -> u64 {
    const_xxh3_64(name.as_bytes())
}

/// Compile-time RPC method ID generator using xxHash3.
///
/// This macro computes a deterministic `u64` identifier from a string literal
/// at **compile time** using the xxh3-64 hash function. Declared interface
/// methods are identified by the hash of `"<interface>.<method>"`, so the
/// same value can be produced ahead of time for a callback handler:
///
/// ```rust,no_run
/// use ipclink_rpc_service::rpc_method_id;
/// let id_1 = rpc_method_id!("example.Greeter.ping");
/// let id_2 = rpc_method_id!("example.Greeter.add");
/// assert!(id_1 > 0);
/// assert_ne!(id_1, id_2);
/// ```
#[macro_export]
macro_rules! rpc_method_id {
    ($name:literal) => {{
        const ID: u64 = $crate::method_id_hash($name);
        ID
    }};
}

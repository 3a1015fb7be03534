/// Upper bound on calls awaiting a response before new registrations are refused.
///
/// Each pending call holds its encoded request and any subscribed waiters, so
/// this caps memory held on behalf of a peer that stopped answering.
pub const DEFAULT_MAX_PENDING_CALLS: usize = 1024;

/// Method tag selecting the fire-and-forget adapter for `()`-returning methods.
pub const ONEWAY_TAG: &str = "oneway";

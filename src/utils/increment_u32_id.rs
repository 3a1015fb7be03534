use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process-wide call id counter. Starts at 1 so that 0 never appears on the wire.
static GLOBAL_ID_COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(1));

/// Returns the next call id.
///
/// Ids wrap around after `u32::MAX`; callers that must never hand out an id
/// still in use (the dispatcher) skip occupied values themselves.
#[inline]
pub fn increment_u32_id() -> u32 {
    loop {
        let id = GLOBAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        if id != 0 {
            return id;
        }
    }
}

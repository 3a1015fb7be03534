/// Returns the current timestamp in microseconds since the UNIX epoch.
///
/// Falls back to `0` if the system clock reports a time before the epoch.
///
/// # Example:
/// ```rust
/// use ipclink::utils::now;
/// let timestamp = now();
/// assert!(timestamp > 0);
/// ```
pub fn now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

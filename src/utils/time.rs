use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current time in nanoseconds since UNIX epoch.
pub fn current_time_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos() as u64
}

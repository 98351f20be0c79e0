use chrono::{DateTime, Utc};

/// Source of server-assigned session timestamps.
///
/// Implementations must never hand out a value less than or equal to one
/// they returned before.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

use std::sync::{Arc, Mutex};

/// Opaque entity identifier (a UUIDv7 rendered as a string).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, process-unique entity id.
///
/// UUIDv7 is time-ordered and carries a per-millisecond counter, so two
/// ids generated back-to-back never collide.
pub fn new_id() -> EntityId {
    uuid::Uuid::now_v7().to_string()
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for entity timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Clock shared between the stores owned by one tracker.
pub type SharedClock = Arc<dyn Clock>;

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}

/// A clock that only moves when told to. Used for deterministic tests and
/// for replaying command scripts at a fixed reference time.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to an absolute time (may move backwards).
    pub fn set(&self, to: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Next `updated_at` value for an entity: never earlier than `previous`,
/// even if the clock has moved backwards.
pub(crate) fn refreshed(previous: Timestamp, now: Timestamp) -> Timestamp {
    now.max(previous)
}

//! Time representation for the conditioning engine
//!
//! The engine never reads a clock itself: every operation takes the
//! caller's current time. Two scales are used:
//!
//! - Millisecond [`Timestamp`]s for samples, warm-up and rate windows
//!   (monotonic, 64-bit, never expected to wrap).
//! - Microsecond [`MicroInstant`]s for pulse arrivals, 32-bit and
//!   wrapping like a typical hardware cycle counter (~71 minutes per
//!   wrap). Dead-time comparisons use wrapping subtraction, so a wrap
//!   between two pulses is handled as long as the real gap is shorter
//!   than one wrap period.

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Pulse arrival instant in microseconds from a wrapping hardware counter
pub type MicroInstant = u32;

/// Source of time for hosts that want the engine driven from a clock
/// object instead of raw integers.
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a source frozen at `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp.
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock by `ms`.
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

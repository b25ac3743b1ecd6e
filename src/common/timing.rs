// src/common/timing.rs

use core::time::Duration;

// === Service Discovery ===

/// Attempts made to look the sensor service up before giving up.
/// Together with the backoff below this waits roughly as long as the
/// platform takes to bring the service up after a restart.
pub const SERVICE_LOOKUP_ATTEMPTS: u32 = 60;
/// Pause between two lookup attempts.
pub const SERVICE_LOOKUP_BACKOFF: Duration = Duration::from_secs(1);

// === Event Delivery ===

/// Sampling period used by `enable_sensor` when the caller does not pick one
/// (the platform's `SENSOR_DELAY_NORMAL`, 200 ms).
pub const DEFAULT_SAMPLING_PERIOD_NS: i64 = 200_000_000;
/// Batch report latency used by `enable_sensor`: report immediately.
pub const DEFAULT_MAX_REPORT_LATENCY_NS: i64 = 0;

/// Upper bound on how many events one `get_events` call stages.
/// Matches the receive buffer size the service sizes its channels for.
pub const STAGING_CAPACITY: usize = 256;

/// Bounded retry schedule: a fixed number of attempts with a fixed pause.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    #[cfg_attr(feature = "serde", serde(rename = "backoff_ms", with = "millis"))]
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        RetryPolicy { max_attempts, backoff }
    }

    /// A single attempt, never sleeping.
    pub const fn once() -> Self {
        RetryPolicy { max_attempts: 1, backoff: Duration::ZERO }
    }

    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Longest time the policy can spend sleeping.
    pub fn worst_case_delay(&self) -> Duration {
        self.backoff * (self.attempts() - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(SERVICE_LOOKUP_ATTEMPTS, SERVICE_LOOKUP_BACKOFF)
    }
}

#[cfg(feature = "serde")]
mod millis {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

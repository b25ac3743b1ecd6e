// src/queue/staging.rs

use crate::common::{timing::STAGING_CAPACITY, types::SensorEvent};
use arrayvec::ArrayVec;

/// Bounded area events are read into before being acknowledged and handed out.
///
/// After [`StagingBuffer::fill`] the buffer holds exactly the records the
/// channel reported, never more than were requested.
#[derive(Debug, Default)]
pub(crate) struct StagingBuffer {
    events: ArrayVec<SensorEvent, STAGING_CAPACITY>,
}

impl StagingBuffer {
    pub(crate) fn new() -> Self {
        StagingBuffer { events: ArrayVec::new() }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.events.capacity()
    }

    /// Offers `want` slots to `read` and keeps as many as it reports filled.
    ///
    /// Returns the number kept. A reader claiming more than it was offered
    /// is clamped to the offer.
    pub(crate) fn fill<F, E>(&mut self, want: usize, read: F) -> nb::Result<usize, E>
    where
        F: FnOnce(&mut [SensorEvent]) -> nb::Result<usize, E>,
    {
        let want = want.min(self.capacity());
        self.events.clear();
        self.events.extend(core::iter::repeat(SensorEvent::default()).take(want));

        let reported = match read(&mut self.events[..]) {
            Ok(count) => count,
            Err(e) => {
                self.events.clear();
                return Err(e);
            }
        };
        if reported > want {
            tracing::warn!(reported, requested = want, "event channel over-reported a read");
        }
        self.events.truncate(reported.min(want));
        Ok(self.events.len())
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[SensorEvent] {
        &self.events
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}

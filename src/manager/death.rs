// src/manager/death.rs

use super::ConnectionState;
use crate::common::types::Generation;
use core::fmt;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// One-shot message telling a manager that the service it is connected to died.
///
/// The manager hands one of these to [`SensorServer::link_to_death`] for every
/// generation it publishes. Firing it clears that generation's handle and
/// sensor cache under the manager's lock. A notifier for a superseded
/// generation, or for a manager that has been dropped, does nothing.
///
/// [`SensorServer::link_to_death`]: crate::common::hal_traits::SensorServer::link_to_death
pub struct DeathNotifier {
    generation: Generation,
    invalidate: Box<dyn FnOnce(Generation) + Send>,
}

impl DeathNotifier {
    pub(crate) fn new<S>(state: &Arc<Mutex<ConnectionState<S>>>, generation: Generation) -> Self
    where
        S: Send + 'static,
    {
        let target: Weak<Mutex<ConnectionState<S>>> = Arc::downgrade(state);
        DeathNotifier {
            generation,
            invalidate: Box::new(move |generation| match target.upgrade() {
                Some(state) => state.lock().peer_died(generation),
                None => tracing::debug!(%generation, "death notification for a dropped sensor manager"),
            }),
        }
    }

    /// Generation this notifier was linked for.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Delivers the notification. Blocks while the manager is busy.
    pub fn notify(self) {
        (self.invalidate)(self.generation)
    }
}

impl fmt::Debug for DeathNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeathNotifier").field("generation", &self.generation).finish_non_exhaustive()
    }
}

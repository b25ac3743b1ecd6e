// src/manager/connection.rs

use super::death::DeathNotifier;
use super::{ConnectionState, ManagerError, SensorManager};
use crate::common::{
    error::SensorError,
    hal_traits::{SensorServer, ServiceLocator, Timer},
    types::Generation,
};

impl<L, T> SensorManager<L, T>
where
    L: ServiceLocator,
    T: Timer,
{
    /// Makes sure a live service handle and its sensor list are published.
    ///
    /// Caller must hold the state lock; `state` is the guarded value.
    pub(super) fn ensure_connected_locked(
        &self,
        state: &mut ConnectionState<L::Server>,
    ) -> Result<Generation, ManagerError<L>> {
        // 1. Fast path: published handle that still answers a ping
        if let (Some(server), Some(generation)) = (state.server.as_ref(), state.directory.generation()) {
            match server.ping() {
                Ok(()) => return Ok(generation),
                Err(e) => {
                    tracing::warn!(%generation, error = ?e, "sensor service failed liveness ping, reconnecting");
                }
            }
        }

        // 2. Nothing from the old generation may survive a reconnect attempt
        state.clear();

        // 3. Look the service up within the retry budget
        let server = self.acquire()?;
        let generation = state.issue_generation();

        // 4. Link for death and fetch sensors before publishing anything
        server
            .link_to_death(DeathNotifier::new(&self.state, generation))
            .map_err(SensorError::Io)?;
        let sensors = server
            .sensor_list(&self.config.op_package_name)
            .map_err(SensorError::Io)?;

        tracing::info!(%generation, sensors = sensors.len(), "connected to sensor service");
        state.publish(server, generation, sensors);
        Ok(generation)
    }

    /// Looks the service up, sleeping `retry.backoff` between refused attempts.
    fn acquire(&self) -> Result<L::Server, ManagerError<L>> {
        let service_name = self.config.service_name.as_str();
        let policy = self.config.retry;
        let attempts = policy.attempts();

        for attempt in 1..=attempts {
            match self.locator.get_service(service_name) {
                Ok(server) => return Ok(server),
                Err(nb::Error::WouldBlock) => {
                    tracing::debug!(service = service_name, attempt, attempts, "service not registered yet");
                    if attempt < attempts {
                        self.timer.delay(policy.backoff);
                    }
                }
                Err(nb::Error::Other(e)) => {
                    tracing::warn!(service = service_name, error = ?e, "service lookup failed");
                    return Err(SensorError::Io(e));
                }
            }
        }

        tracing::warn!(service = service_name, attempts, "giving up on sensor service");
        Err(SensorError::ServiceUnavailable { attempts })
    }
}

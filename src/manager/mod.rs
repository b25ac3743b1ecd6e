// src/manager/mod.rs

mod connection;
mod death;
pub mod directory;

pub use death::DeathNotifier;
pub use directory::{SensorDirectory, SensorList};

use crate::common::{
    config::ManagerConfig,
    error::SensorError,
    hal_traits::{ChannelMode, ChannelRefusal, SensorServer, ServiceLocator, StdTimer, Timer},
    types::{Generation, SensorDescriptor, SensorHandle},
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Transport error type of the service a locator hands out.
pub type ServerError<L> = <<L as ServiceLocator>::Server as SensorServer>::Error;
/// Error type returned by [`SensorManager`] operations.
pub type ManagerError<L> = SensorError<ServerError<L>>;
/// Event connection type of the service a locator hands out.
pub type ServerConnection<L> = <<L as ServiceLocator>::Server as SensorServer>::Connection;

/// Handle and sensor cache, always replaced together.
pub(crate) struct ConnectionState<S> {
    server: Option<S>,
    directory: SensorDirectory,
    last_issued: Option<Generation>,
}

impl<S> ConnectionState<S> {
    fn new() -> Self {
        ConnectionState {
            server: None,
            directory: SensorDirectory::default(),
            last_issued: None,
        }
    }

    fn issue_generation(&mut self) -> Generation {
        let generation = self.last_issued.map_or(Generation::FIRST, |g| g.next());
        self.last_issued = Some(generation);
        generation
    }

    fn publish(&mut self, server: S, generation: Generation, sensors: Vec<SensorDescriptor>) {
        self.server = Some(server);
        self.directory.publish(generation, sensors);
    }

    fn clear(&mut self) {
        self.server = None;
        self.directory.invalidate();
    }

    /// Death notification for `generation`; ignored unless it is the live one.
    pub(crate) fn peer_died(&mut self, generation: Generation) {
        if self.directory.generation() != Some(generation) {
            tracing::debug!(%generation, "ignoring death notification for a superseded generation");
            return;
        }
        tracing::warn!(%generation, "sensor service died");
        self.clear();
    }
}

/// Connection to the sensor service, shared by any number of event queues.
///
/// The service is looked up lazily on the first operation and looked up again
/// whenever it dies; every operation first makes sure a live handle and its
/// sensor list are in place. All of that happens under one lock per manager,
/// so concurrent callers never see a handle and a sensor list from different
/// generations.
pub struct SensorManager<L, T = StdTimer>
where
    L: ServiceLocator,
{
    locator: L,
    timer: T,
    config: ManagerConfig,
    state: Arc<Mutex<ConnectionState<L::Server>>>,
}

impl<L> SensorManager<L, StdTimer>
where
    L: ServiceLocator,
{
    /// Manager with the default configuration and a sleeping timer.
    pub fn with_locator(locator: L) -> Self {
        SensorManager::new(locator, StdTimer, ManagerConfig::default())
    }
}

impl<L, T> SensorManager<L, T>
where
    L: ServiceLocator,
    T: Timer,
{
    /// Creates an unconnected manager; nothing is looked up until first use.
    pub fn new(locator: L, timer: T, config: ManagerConfig) -> Self {
        SensorManager {
            locator,
            timer,
            config,
            state: Arc::new(Mutex::new(ConnectionState::new())),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Generation currently published, if connected.
    ///
    /// Does not probe the service.
    pub fn generation(&self) -> Option<Generation> {
        self.state.lock().directory.generation()
    }

    /// Connects, or reconnects if the held handle is dead, and returns the
    /// live generation. Cheap when already connected.
    pub fn ensure_connected(&self) -> Result<Generation, ManagerError<L>> {
        let mut state = self.state.lock();
        self.ensure_connected_locked(&mut state)
    }

    /// Sensors of the live generation.
    ///
    /// The returned view keeps the manager locked until dropped.
    pub fn sensor_list(&self) -> Result<SensorList<'_>, ManagerError<L>> {
        let mut state = self.state.lock();
        let generation = self.ensure_connected_locked(&mut state)?;
        let directory = MutexGuard::map(state, |state| &mut state.directory);
        Ok(SensorList::new(directory, generation))
    }

    /// Descriptor for `handle` in the live generation.
    pub fn sensor(&self, handle: SensorHandle) -> Result<SensorDescriptor, ManagerError<L>> {
        self.resolve(handle).map(|(_, sensor)| sensor)
    }

    /// Like [`SensorManager::sensor`], also returning the generation the
    /// descriptor was found in.
    pub(crate) fn resolve(&self, handle: SensorHandle) -> Result<(Generation, SensorDescriptor), ManagerError<L>> {
        let mut state = self.state.lock();
        let generation = self.ensure_connected_locked(&mut state)?;
        match state.directory.get(handle) {
            Some(sensor) => Ok((generation, sensor.clone())),
            None => Err(SensorError::UnknownSensor(handle)),
        }
    }

    /// Asks the service for a new event connection.
    ///
    /// Not retried: if the service dies during the call the caller gets an
    /// error and must retry the whole operation.
    pub fn create_event_connection(
        &self,
        package_name: &str,
        mode: ChannelMode,
    ) -> Result<(Generation, ServerConnection<L>), ManagerError<L>> {
        let mut state = self.state.lock();
        let generation = self.ensure_connected_locked(&mut state)?;
        let server = match state.server.as_ref() {
            Some(server) => server,
            None => return Err(SensorError::NoConnection),
        };

        match server.create_event_connection(package_name, mode, &self.config.op_package_name) {
            Ok(connection) => Ok((generation, connection)),
            Err(ChannelRefusal::Declined) => {
                tracing::error!(%generation, "sensor service returned no event connection");
                Err(SensorError::ChannelCreationFailed)
            }
            Err(ChannelRefusal::PermissionDenied) => {
                tracing::warn!(%generation, ?mode, "event connection refused");
                Err(SensorError::PermissionDenied)
            }
            Err(ChannelRefusal::Transport(e)) => Err(SensorError::Io(e)),
        }
    }

    /// Whether the service accepts injected events. `false` if it cannot be reached.
    pub fn is_data_injection_enabled(&self) -> bool {
        self.data_injection_enabled().map_or(false, |(_, enabled)| enabled)
    }

    /// Like [`SensorManager::is_data_injection_enabled`], keeping the
    /// connection failure and the generation the answer came from.
    pub(crate) fn data_injection_enabled(&self) -> Result<(Generation, bool), ManagerError<L>> {
        let mut state = self.state.lock();
        let generation = self.ensure_connected_locked(&mut state)?;
        let enabled = state.server.as_ref().is_some_and(|server| server.is_data_injection_enabled());
        Ok((generation, enabled))
    }
}

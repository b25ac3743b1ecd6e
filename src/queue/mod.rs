// src/queue/mod.rs

mod staging;

use crate::common::{
    error::SensorError,
    hal_traits::{ChannelMode, EventConnection, SensorServer, ServiceLocator, Timer},
    timing::{DEFAULT_MAX_REPORT_LATENCY_NS, DEFAULT_SAMPLING_PERIOD_NS},
    types::{Generation, SensorDescriptor, SensorEvent, SensorHandle},
};
use crate::manager::SensorManager;
use staging::StagingBuffer;

/// One consumer's subscription to sensor data.
///
/// A queue is bound to the connection generation it was created in. If the
/// service dies and the manager reconnects, control calls on the old queue
/// fail with [`SensorError::PeerDied`] and data-path calls fail with the
/// transport's error; the queue is never repaired in place, create a new one.
///
/// Typical consumer loop: [`EventQueue::wait_for_event`] (blocking) followed
/// by [`EventQueue::get_events`] (non-blocking drain), or [`EventQueue::poll`]
/// which does both. Dropping the queue releases the remote channel.
pub struct EventQueue<C>
where
    C: EventConnection,
{
    connection: C,
    generation: Generation,
    staging: Box<StagingBuffer>,
}

impl<C> EventQueue<C>
where
    C: EventConnection,
{
    /// Opens a normal-mode queue with an empty package label.
    pub fn create<L, T>(manager: &SensorManager<L, T>) -> Result<Self, SensorError<C::Error>>
    where
        L: ServiceLocator,
        L::Server: SensorServer<Connection = C, Error = C::Error>,
        T: Timer,
    {
        Self::create_with(manager, "", ChannelMode::Normal)
    }

    /// Opens a queue for `package_name` in `mode`.
    ///
    /// Fails with `NoConnection` whenever the manager cannot establish its
    /// connection, whatever the transport reported while trying.
    /// [`ChannelMode::DataInjection`] is refused with `PermissionDenied`
    /// unless the connected service has data injection enabled.
    pub fn create_with<L, T>(
        manager: &SensorManager<L, T>,
        package_name: &str,
        mode: ChannelMode,
    ) -> Result<Self, SensorError<C::Error>>
    where
        L: ServiceLocator,
        L::Server: SensorServer<Connection = C, Error = C::Error>,
        T: Timer,
    {
        let connected = match mode {
            ChannelMode::Normal => manager.ensure_connected(),
            ChannelMode::DataInjection => match manager.data_injection_enabled() {
                Ok((_, false)) => {
                    tracing::warn!("data injection requested while the service has it disabled");
                    return Err(SensorError::PermissionDenied);
                }
                Ok((generation, true)) => Ok(generation),
                Err(e) => Err(e),
            },
        };
        if let Err(e) = connected {
            tracing::warn!(error = %e, "cannot create event queue");
            return Err(SensorError::NoConnection);
        }

        let (generation, connection) = match manager.create_event_connection(package_name, mode) {
            Ok(bound) => bound,
            Err(e) if e.is_connection_error() => {
                tracing::warn!(error = %e, "cannot create event queue");
                return Err(SensorError::NoConnection);
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(%generation, ?mode, "event queue created");
        Ok(EventQueue {
            connection,
            generation,
            staging: Box::new(StagingBuffer::new()),
        })
    }

    /// Connection generation this queue was created in.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether `manager` is still on the generation this queue was created in.
    pub fn is_current<L, T>(&self, manager: &SensorManager<L, T>) -> bool
    where
        L: ServiceLocator,
        T: Timer,
    {
        manager.generation() == Some(self.generation)
    }

    /// Starts delivery for `handle` at the default rate.
    pub fn enable_sensor<L, T>(&self, manager: &SensorManager<L, T>, handle: SensorHandle) -> Result<(), SensorError<C::Error>>
    where
        L: ServiceLocator,
        L::Server: SensorServer<Connection = C, Error = C::Error>,
        T: Timer,
    {
        self.enable_sensor_with(manager, handle, DEFAULT_SAMPLING_PERIOD_NS, DEFAULT_MAX_REPORT_LATENCY_NS)
    }

    /// Starts delivery for `handle` with an explicit sampling period and batching latency.
    pub fn enable_sensor_with<L, T>(
        &self,
        manager: &SensorManager<L, T>,
        handle: SensorHandle,
        sampling_period_ns: i64,
        max_batch_report_latency_ns: i64,
    ) -> Result<(), SensorError<C::Error>>
    where
        L: ServiceLocator,
        L::Server: SensorServer<Connection = C, Error = C::Error>,
        T: Timer,
    {
        let sensor = self.resolve(manager, handle)?;
        self.connection
            .enable_disable(sensor.handle, true, sampling_period_ns, max_batch_report_latency_ns, 0)
            .into_result()?;
        Ok(())
    }

    /// Stops delivery for `handle`.
    pub fn disable_sensor<L, T>(&self, manager: &SensorManager<L, T>, handle: SensorHandle) -> Result<(), SensorError<C::Error>>
    where
        L: ServiceLocator,
        L::Server: SensorServer<Connection = C, Error = C::Error>,
        T: Timer,
    {
        let sensor = self.resolve(manager, handle)?;
        self.connection.enable_disable(sensor.handle, false, 0, 0, 0).into_result()?;
        Ok(())
    }

    /// Changes the sampling period of `handle`.
    ///
    /// The period is passed through as is; the service clamps or rejects
    /// values below the sensor's minimum delay.
    pub fn set_event_rate<L, T>(
        &self,
        manager: &SensorManager<L, T>,
        handle: SensorHandle,
        interval_ns: i64,
    ) -> Result<(), SensorError<C::Error>>
    where
        L: ServiceLocator,
        L::Server: SensorServer<Connection = C, Error = C::Error>,
        T: Timer,
    {
        let sensor = self.resolve(manager, handle)?;
        self.connection.set_event_rate(sensor.handle, interval_ns).into_result()?;
        Ok(())
    }

    /// Blocks until the channel has data or is torn down.
    ///
    /// Returning `Ok` only signals readiness; a following
    /// [`EventQueue::get_events`] may still find nothing.
    pub fn wait_for_event(&self) -> Result<(), SensorError<C::Error>> {
        self.connection.wait_for_event().map_err(SensorError::Io)
    }

    /// Drains up to `buffer.len()` ready events into `buffer` without blocking.
    ///
    /// Every event read is acknowledged to the service exactly once, then
    /// copied out. A failed acknowledgement is logged and the events are
    /// still delivered, since they have already left the channel.
    /// Returns the number of events copied; 0 when nothing was ready.
    pub fn get_events(&mut self, buffer: &mut [SensorEvent]) -> Result<usize, SensorError<C::Error>> {
        if buffer.is_empty() {
            return Ok(0);
        }

        let connection = &mut self.connection;
        let read = match self.staging.fill(buffer.len(), |slots| connection.read(slots)) {
            Ok(count) => count,
            Err(nb::Error::WouldBlock) => return Ok(0),
            Err(nb::Error::Other(e)) => return Err(SensorError::Io(e)),
        };

        if read > 0 {
            let staged = self.staging.as_slice();
            if let Err(e) = self.connection.send_ack(staged) {
                tracing::warn!(events = read, error = ?e, "failed to acknowledge sensor events");
            }
            buffer[..read].copy_from_slice(staged);
        }

        self.staging.clear();
        Ok(read)
    }

    /// Non-blocking readiness check.
    pub fn has_events(&self) -> Result<bool, SensorError<C::Error>> {
        self.connection.poll_readable().map_err(SensorError::Io)
    }

    /// [`EventQueue::has_events`] as a C-style code: 1 ready, 0 not ready,
    /// negative status on failure.
    pub fn has_events_code(&self) -> i32 {
        match self.has_events() {
            Ok(true) => 1,
            Ok(false) => 0,
            Err(e) => e.status().code(),
        }
    }

    /// Waits for data, then drains it into `buffer`.
    pub fn poll(&mut self, buffer: &mut [SensorEvent]) -> Result<usize, SensorError<C::Error>> {
        self.wait_for_event()?;
        self.get_events(buffer)
    }

    /// Looks `handle` up in the manager's live generation and checks this
    /// queue still belongs to it. Never touches the channel.
    fn resolve<L, T>(&self, manager: &SensorManager<L, T>, handle: SensorHandle) -> Result<SensorDescriptor, SensorError<C::Error>>
    where
        L: ServiceLocator,
        L::Server: SensorServer<Connection = C, Error = C::Error>,
        T: Timer,
    {
        let (generation, sensor) = manager.resolve(handle)?;
        if generation != self.generation {
            tracing::debug!(queue = %self.generation, current = %generation, "event queue outlived its connection");
            return Err(SensorError::PeerDied);
        }
        Ok(sensor)
    }
}

impl<C> Drop for EventQueue<C>
where
    C: EventConnection,
{
    fn drop(&mut self) {
        tracing::debug!(generation = %self.generation, "event queue destroyed");
    }
}

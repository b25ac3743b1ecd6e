// src/common/hal_traits.rs

use super::status::Status;
use super::types::{SensorDescriptor, SensorEvent, SensorHandle};
use crate::manager::DeathNotifier;
use core::fmt::Debug;
use core::time::Duration;

/// Abstraction for the delays the connection retry loop needs.
///
/// Injected so tests can count and skip sleeps instead of waiting on the wall clock.
pub trait Timer {
    /// Block the calling thread for at least `duration`.
    fn delay(&self, duration: Duration);
}

/// [`Timer`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdTimer;

impl Timer for StdTimer {
    fn delay(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Mode requested when opening an event connection.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMode {
    /// Regular event delivery from the hardware.
    #[default]
    Normal = 0,
    /// Events are injected by the caller instead of read from hardware.
    /// Only accepted while the service has data injection enabled.
    DataInjection = 1,
}

impl ChannelMode {
    /// Wire value passed to the service.
    #[inline]
    pub const fn as_raw(&self) -> i32 {
        *self as i32
    }
}

/// Why the service did not hand out an event connection.
#[derive(Debug)]
pub enum ChannelRefusal<E> {
    /// The service returned no connection (it may have died mid-call).
    Declined,
    /// The caller lacks the permission the requested mode needs.
    PermissionDenied,
    /// The request itself failed on the transport.
    Transport(E),
}

/// Looks the sensor service up by name.
pub trait ServiceLocator {
    type Server: SensorServer;

    /// Returns the service if it is registered.
    ///
    /// `Err(nb::Error::WouldBlock)` means the name is not registered yet and the
    /// lookup may be retried. `Err(nb::Error::Other(e))` is a hard failure.
    fn get_service(&self, name: &str) -> nb::Result<Self::Server, <Self::Server as SensorServer>::Error>;
}

/// A live handle to the remote sensor service.
///
/// Implementations must not invoke a [`DeathNotifier`] from inside one of
/// these calls; the manager holds its lock while calling into the server.
pub trait SensorServer: Send + 'static {
    /// Transport error type.
    type Error: Debug;
    /// Event connection handed out by [`SensorServer::create_event_connection`].
    type Connection: EventConnection<Error = Self::Error>;

    /// Liveness probe. An error means the remote side is gone.
    fn ping(&self) -> Result<(), Self::Error>;

    /// Arranges for `notifier` to be fired once when the remote side dies.
    fn link_to_death(&self, notifier: DeathNotifier) -> Result<(), Self::Error>;

    /// Fetches the sensors the service exposes to `op_package_name`.
    fn sensor_list(&self, op_package_name: &str) -> Result<Vec<SensorDescriptor>, Self::Error>;

    /// Opens a new event connection for one consumer.
    fn create_event_connection(
        &self,
        package_name: &str,
        mode: ChannelMode,
        op_package_name: &str,
    ) -> Result<Self::Connection, ChannelRefusal<Self::Error>>;

    /// Whether the service currently accepts injected events.
    fn is_data_injection_enabled(&self) -> bool;
}

/// One consumer's event connection to the sensor service.
///
/// Control calls answer with the service's [`Status`]; data-path calls
/// report transport failures through `Self::Error`.
pub trait EventConnection: Send {
    /// Transport error type.
    type Error: Debug;

    /// Turns delivery for `handle` on or off.
    fn enable_disable(
        &self,
        handle: SensorHandle,
        enabled: bool,
        sampling_period_ns: i64,
        max_batch_report_latency_ns: i64,
        reserved_flags: i32,
    ) -> Status;

    /// Changes the sampling period of an enabled sensor.
    fn set_event_rate(&self, handle: SensorHandle, sampling_period_ns: i64) -> Status;

    /// Reads available events into `events` without blocking.
    ///
    /// Returns the number of records written, or `Err(nb::Error::WouldBlock)`
    /// when nothing is ready.
    fn read(&mut self, events: &mut [SensorEvent]) -> nb::Result<usize, Self::Error>;

    /// Acknowledges events previously returned by [`EventConnection::read`]
    /// so the service can release their buffers.
    fn send_ack(&mut self, events: &[SensorEvent]) -> Result<(), Self::Error>;

    /// Blocks until the channel is readable or torn down.
    fn wait_for_event(&self) -> Result<(), Self::Error>;

    /// Non-blocking readiness probe on the channel's descriptor.
    fn poll_readable(&self) -> Result<bool, Self::Error>;
}

// src/common/error.rs

use super::status::Status;
use super::types::SensorHandle;

/// Errors surfaced by the sensor manager and event queues.
///
/// `E` is the transport's own error type, carried by [`SensorError::Io`].
#[derive(Debug, thiserror::Error)]
pub enum SensorError<E = ()>
where
    E: core::fmt::Debug,
{
    /// The service never showed up within the retry budget.
    #[error("sensor service unavailable after {attempts} lookup attempts")]
    ServiceUnavailable { attempts: u32 },

    /// The service this channel was created against has died and been replaced.
    #[error("sensor service died; the event queue must be recreated")]
    PeerDied,

    /// An event queue could not be created because the manager cannot connect.
    #[error("no connection to the sensor service")]
    NoConnection,

    /// The service returned no event connection.
    #[error("sensor service did not create an event connection")]
    ChannelCreationFailed,

    /// The service refused the event connection for this caller.
    #[error("permission denied by the sensor service")]
    PermissionDenied,

    /// The handle is not in the current sensor list.
    #[error("unknown sensor handle {0}")]
    UnknownSensor(SensorHandle),

    /// Underlying transport failure (read, readiness check, link).
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The service answered a request with a failure status.
    #[error("sensor service returned {0}")]
    Status(Status),
}

impl<E: core::fmt::Debug> SensorError<E> {
    /// The status code a C caller sees for this error.
    pub fn status(&self) -> Status {
        match self {
            SensorError::ServiceUnavailable { .. } => Status::NAME_NOT_FOUND,
            SensorError::PeerDied => Status::DEAD_OBJECT,
            SensorError::NoConnection | SensorError::ChannelCreationFailed => Status::NO_INIT,
            SensorError::PermissionDenied => Status::PERMISSION_DENIED,
            SensorError::UnknownSensor(_) => Status::BAD_VALUE,
            SensorError::Io(_) => Status::IO_ERROR,
            SensorError::Status(status) => *status,
        }
    }

    /// Whether a fresh connection (and a recreated queue) may clear this error.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            SensorError::ServiceUnavailable { .. } | SensorError::PeerDied | SensorError::NoConnection
        )
    }
}

impl<E: core::fmt::Debug> From<Status> for SensorError<E> {
    fn from(status: Status) -> Self {
        SensorError::Status(status)
    }
}

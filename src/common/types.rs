// src/common/types.rs

use core::fmt;

// --- Sensor Handle ---

/// Opaque identifier the sensor service assigns to each sensor.
///
/// Handles are only meaningful within one connection generation; after the
/// service restarts the same number may name a different sensor.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorHandle(i32);

impl SensorHandle {
    #[inline]
    pub const fn new(raw: i32) -> Self {
        SensorHandle(raw)
    }

    #[inline]
    pub const fn as_raw(&self) -> i32 {
        self.0
    }
}

impl From<i32> for SensorHandle {
    fn from(value: i32) -> Self {
        SensorHandle(value)
    }
}

impl From<SensorHandle> for i32 {
    fn from(value: SensorHandle) -> Self {
        value.0
    }
}

impl fmt::Display for SensorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

// --- Sensor Type ---

/// Sensor type code as defined by the hardware sensor HAL.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorType(i32);

impl SensorType {
    pub const ACCELEROMETER: SensorType = SensorType(1);
    pub const MAGNETIC_FIELD: SensorType = SensorType(2);
    pub const ORIENTATION: SensorType = SensorType(3);
    pub const GYROSCOPE: SensorType = SensorType(4);
    pub const LIGHT: SensorType = SensorType(5);
    pub const PRESSURE: SensorType = SensorType(6);
    pub const PROXIMITY: SensorType = SensorType(8);
    pub const GRAVITY: SensorType = SensorType(9);
    pub const LINEAR_ACCELERATION: SensorType = SensorType(10);
    pub const ROTATION_VECTOR: SensorType = SensorType(11);
    pub const STEP_COUNTER: SensorType = SensorType(19);

    #[inline]
    pub const fn new(raw: i32) -> Self {
        SensorType(raw)
    }

    #[inline]
    pub const fn as_raw(&self) -> i32 {
        self.0
    }
}

impl From<i32> for SensorType {
    fn from(value: i32) -> Self {
        SensorType(value)
    }
}

// --- Generation ---

/// Identifies one successful acquisition of the sensor service.
///
/// Every reconnect produces a strictly larger generation. Caches, event
/// channels and death notifiers remember the generation they were made for
/// so that anything outliving a reconnect can be recognised as stale.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Generation(u64);

impl Generation {
    pub(crate) const FIRST: Generation = Generation(1);

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    #[inline]
    pub(crate) const fn next(&self) -> Generation {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// --- Sensor Descriptor ---

/// Static description of one sensor, as reported by the sensor service.
///
/// `name` and `vendor` are filled in when the transport provides them and may
/// be empty otherwise. `min_delay` is in microseconds, following the HAL; zero
/// means the sensor only reports on change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorDescriptor {
    pub name: String,
    pub vendor: String,
    pub version: i32,
    pub handle: SensorHandle,
    pub sensor_type: SensorType,
    pub max_range: f32,
    pub resolution: f32,
    /// Power draw in mA.
    pub power: f32,
    pub min_delay: i32,
}

impl SensorDescriptor {
    /// Minimum sampling interval in nanoseconds, the unit `set_event_rate` takes.
    pub fn min_delay_ns(&self) -> i64 {
        i64::from(self.min_delay) * 1_000
    }
}

// --- Sensor Event ---

/// Number of payload words carried by a [`SensorEvent`].
pub const EVENT_PAYLOAD_LEN: usize = 16;

/// A raw event record, laid out like the HAL's `sensors_event_t`.
///
/// Records are copied verbatim out of the event channel, so the layout must
/// stay binary compatible with what the service writes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SensorEvent {
    pub version: i32,
    pub sensor: i32,
    pub sensor_type: i32,
    pub reserved0: i32,
    /// Nanoseconds, `CLOCK_BOOTTIME` on the device.
    pub timestamp: i64,
    pub data: [f32; EVENT_PAYLOAD_LEN],
    pub flags: u32,
    pub reserved1: [u32; 3],
}

impl SensorEvent {
    /// Creates an event for `handle` with the given payload prefix; the rest of
    /// the payload is zeroed.
    pub fn new(handle: SensorHandle, sensor_type: SensorType, timestamp: i64, values: &[f32]) -> Self {
        let mut data = [0.0; EVENT_PAYLOAD_LEN];
        let len = values.len().min(EVENT_PAYLOAD_LEN);
        data[..len].copy_from_slice(&values[..len]);
        SensorEvent {
            version: core::mem::size_of::<SensorEvent>() as i32,
            sensor: handle.as_raw(),
            sensor_type: sensor_type.as_raw(),
            timestamp,
            data,
            ..Default::default()
        }
    }

    #[inline]
    pub fn handle(&self) -> SensorHandle {
        SensorHandle(self.sensor)
    }

    #[inline]
    pub fn sensor_type(&self) -> SensorType {
        SensorType(self.sensor_type)
    }

    #[inline]
    pub fn values(&self) -> &[f32; EVENT_PAYLOAD_LEN] {
        &self.data
    }
}

impl Default for SensorEvent {
    fn default() -> Self {
        SensorEvent {
            version: 0,
            sensor: 0,
            sensor_type: 0,
            reserved0: 0,
            timestamp: 0,
            data: [0.0; EVENT_PAYLOAD_LEN],
            flags: 0,
            reserved1: [0; 3],
        }
    }
}

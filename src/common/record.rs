// src/common/record.rs

use super::types::SensorDescriptor;
use core::ffi::{c_char, c_int};
use core::ptr;

/// Fixed-layout sensor record handed across the C interface.
///
/// Other components serialize against this layout: field order and types
/// must not change. `name` and `vendor` are left null; the C side has no
/// way to free strings allocated here.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SensorRecord {
    pub name: *const c_char,
    pub vendor: *const c_char,
    pub version: c_int,
    pub handle: c_int,
    pub sensor_type: c_int,
    pub max_range: f32,
    pub resolution: f32,
    pub power: f32,
    pub min_delay: i32,
}

impl From<&SensorDescriptor> for SensorRecord {
    fn from(sensor: &SensorDescriptor) -> Self {
        SensorRecord {
            name: ptr::null(),
            vendor: ptr::null(),
            version: sensor.version,
            handle: sensor.handle.as_raw(),
            sensor_type: sensor.sensor_type.as_raw(),
            max_range: sensor.max_range,
            resolution: sensor.resolution,
            power: sensor.power,
            min_delay: sensor.min_delay,
        }
    }
}

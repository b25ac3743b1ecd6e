// src/manager/directory.rs

use crate::common::record::SensorRecord;
use crate::common::types::{Generation, SensorDescriptor, SensorHandle};
use core::ops::Deref;
use parking_lot::MappedMutexGuard;

/// Sensor descriptors of one connection generation.
///
/// Either empty and unpublished, or holding the complete list fetched right
/// after a successful acquisition. Only the manager replaces it, under its lock.
#[derive(Debug, Default)]
pub struct SensorDirectory {
    generation: Option<Generation>,
    sensors: Vec<SensorDescriptor>,
}

impl SensorDirectory {
    /// Generation of the published list, `None` while nothing is published.
    #[inline]
    pub fn generation(&self) -> Option<Generation> {
        self.generation
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.generation.is_some()
    }

    #[inline]
    pub fn sensors(&self) -> &[SensorDescriptor] {
        &self.sensors
    }

    pub fn get(&self, handle: SensorHandle) -> Option<&SensorDescriptor> {
        self.sensors.iter().find(|sensor| sensor.handle == handle)
    }

    pub(crate) fn publish(&mut self, generation: Generation, sensors: Vec<SensorDescriptor>) {
        self.sensors = sensors;
        self.generation = Some(generation);
    }

    pub(crate) fn invalidate(&mut self) {
        self.sensors.clear();
        self.generation = None;
    }
}

/// Borrowed view of the current sensor list.
///
/// Holds the manager's lock for as long as it lives: read what you need and
/// drop it before calling back into the manager on the same thread.
pub struct SensorList<'a> {
    directory: MappedMutexGuard<'a, SensorDirectory>,
    generation: Generation,
}

impl<'a> SensorList<'a> {
    pub(crate) fn new(directory: MappedMutexGuard<'a, SensorDirectory>, generation: Generation) -> Self {
        SensorList { directory, generation }
    }

    /// Generation the listed descriptors belong to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn get(&self, handle: SensorHandle) -> Option<&SensorDescriptor> {
        self.directory.get(handle)
    }

    /// Copies the list into the fixed-layout records the C interface returns.
    pub fn to_records(&self) -> Vec<SensorRecord> {
        self.directory.sensors().iter().map(SensorRecord::from).collect()
    }
}

impl Deref for SensorList<'_> {
    type Target = [SensorDescriptor];

    fn deref(&self) -> &Self::Target {
        self.directory.sensors()
    }
}

// src/common/mock.rs

// In-process stand-in for the sensor service, shared by the unit tests.

use super::hal_traits::{ChannelMode, ChannelRefusal, EventConnection, SensorServer, ServiceLocator, Timer};
use super::status::Status;
use super::types::{SensorDescriptor, SensorEvent, SensorHandle, SensorType};
use crate::manager::DeathNotifier;
use core::time::Duration;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockError(pub &'static str);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MockRefusal {
    Declined,
    PermissionDenied,
}

pub fn sensor(handle: i32, sensor_type: SensorType, name: &str) -> SensorDescriptor {
    SensorDescriptor {
        name: name.into(),
        vendor: "Mock".into(),
        version: 1,
        handle: SensorHandle::new(handle),
        sensor_type,
        max_range: 10.0,
        resolution: 0.1,
        power: 0.5,
        min_delay: 10_000,
    }
}

pub fn event(handle: i32, timestamp: i64) -> SensorEvent {
    SensorEvent::new(SensorHandle::new(handle), SensorType::ACCELEROMETER, timestamp, &[0.1, 9.8, 0.2])
}

// --- Timer ---

/// Records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct MockTimer {
    delays: Mutex<Vec<Duration>>,
}

impl MockTimer {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }
}

impl Timer for MockTimer {
    fn delay(&self, duration: Duration) {
        self.delays.lock().push(duration);
    }
}

// --- Service ---

struct ServiceState {
    registered: bool,
    register_after: Option<u32>,
    lookup_failure: Option<MockError>,
    lookups: u32,
    instance: u64,
    alive: bool,
    sensors: Vec<SensorDescriptor>,
    sensor_list_calls: u32,
    sensor_list_failure: Option<MockError>,
    link_failure: Option<MockError>,
    notifiers: Vec<DeathNotifier>,
    refusal: Option<MockRefusal>,
    injection_enabled: bool,
    channels: Vec<MockChannel>,
}

/// Test-side handle on the fake remote service.
#[derive(Clone)]
pub struct MockService {
    state: Arc<Mutex<ServiceState>>,
}

impl MockService {
    pub fn new(sensors: Vec<SensorDescriptor>) -> Self {
        MockService {
            state: Arc::new(Mutex::new(ServiceState {
                registered: true,
                register_after: None,
                lookup_failure: None,
                lookups: 0,
                instance: 1,
                alive: true,
                sensors,
                sensor_list_calls: 0,
                sensor_list_failure: None,
                link_failure: None,
                notifiers: Vec::new(),
                refusal: None,
                injection_enabled: false,
                channels: Vec::new(),
            })),
        }
    }

    /// A service that never registers.
    pub fn unregistered() -> Self {
        let service = MockService::new(Vec::new());
        service.state.lock().registered = false;
        service
    }

    /// Registers once `lookups` lookups have been refused.
    pub fn register_after(self, lookups: u32) -> Self {
        {
            let mut state = self.state.lock();
            state.registered = false;
            state.register_after = Some(lookups);
        }
        self
    }

    pub fn locator(&self) -> MockLocator {
        MockLocator { service: self.clone() }
    }

    pub fn fail_lookups(&self, error: MockError) {
        self.state.lock().lookup_failure = Some(error);
    }

    pub fn fail_sensor_list(&self, error: Option<MockError>) {
        self.state.lock().sensor_list_failure = error;
    }

    pub fn fail_link(&self, error: Option<MockError>) {
        self.state.lock().link_failure = error;
    }

    pub fn refuse_channels(&self, refusal: Option<MockRefusal>) {
        self.state.lock().refusal = refusal;
    }

    pub fn set_injection_enabled(&self, enabled: bool) {
        self.state.lock().injection_enabled = enabled;
    }

    /// Marks the process dead without delivering death notifications.
    pub fn die_silently(&self) {
        let mut state = self.state.lock();
        state.alive = false;
        state.notifiers.clear();
        for channel in &state.channels {
            channel.close();
        }
    }

    /// Kills the process and delivers pending death notifications.
    pub fn kill(&self) {
        let notifiers = {
            let mut state = self.state.lock();
            state.alive = false;
            for channel in &state.channels {
                channel.close();
            }
            std::mem::take(&mut state.notifiers)
        };
        for notifier in notifiers {
            notifier.notify();
        }
    }

    /// Brings up a new process instance with a different sensor list.
    pub fn restart(&self, sensors: Vec<SensorDescriptor>) {
        let mut state = self.state.lock();
        state.instance += 1;
        state.alive = true;
        state.sensors = sensors;
    }

    /// Takes the notifiers registered so far without firing them.
    pub fn take_notifiers(&self) -> Vec<DeathNotifier> {
        std::mem::take(&mut self.state.lock().notifiers)
    }

    pub fn lookups(&self) -> u32 {
        self.state.lock().lookups
    }

    pub fn sensor_list_calls(&self) -> u32 {
        self.state.lock().sensor_list_calls
    }

    pub fn channel(&self, index: usize) -> MockChannel {
        self.state.lock().channels[index].clone()
    }

    pub fn channel_count(&self) -> usize {
        self.state.lock().channels.len()
    }
}

pub struct MockLocator {
    service: MockService,
}

impl ServiceLocator for MockLocator {
    type Server = MockServer;

    fn get_service(&self, name: &str) -> nb::Result<MockServer, MockError> {
        assert_eq!(name, "sensorservice");
        let mut state = self.service.state.lock();
        state.lookups += 1;
        if let Some(error) = state.lookup_failure {
            return Err(nb::Error::Other(error));
        }
        if let Some(after) = state.register_after {
            if state.lookups > after {
                state.registered = true;
            }
        }
        if !state.registered || !state.alive {
            return Err(nb::Error::WouldBlock);
        }
        Ok(MockServer {
            service: self.service.clone(),
            instance: state.instance,
        })
    }
}

pub struct MockServer {
    service: MockService,
    instance: u64,
}

impl MockServer {
    fn check_alive(&self, state: &ServiceState) -> Result<(), MockError> {
        if state.alive && state.instance == self.instance {
            Ok(())
        } else {
            Err(MockError("dead object"))
        }
    }
}

impl SensorServer for MockServer {
    type Error = MockError;
    type Connection = MockConnection;

    fn ping(&self) -> Result<(), MockError> {
        self.check_alive(&self.service.state.lock())
    }

    fn link_to_death(&self, notifier: DeathNotifier) -> Result<(), MockError> {
        let mut state = self.service.state.lock();
        self.check_alive(&state)?;
        if let Some(error) = state.link_failure {
            return Err(error);
        }
        state.notifiers.push(notifier);
        Ok(())
    }

    fn sensor_list(&self, op_package_name: &str) -> Result<Vec<SensorDescriptor>, MockError> {
        let mut state = self.service.state.lock();
        self.check_alive(&state)?;
        assert!(!op_package_name.is_empty());
        state.sensor_list_calls += 1;
        if let Some(error) = state.sensor_list_failure {
            return Err(error);
        }
        Ok(state.sensors.clone())
    }

    fn create_event_connection(
        &self,
        _package_name: &str,
        mode: ChannelMode,
        _op_package_name: &str,
    ) -> Result<MockConnection, ChannelRefusal<MockError>> {
        let mut state = self.service.state.lock();
        self.check_alive(&state).map_err(ChannelRefusal::Transport)?;
        match state.refusal {
            Some(MockRefusal::Declined) => return Err(ChannelRefusal::Declined),
            Some(MockRefusal::PermissionDenied) => return Err(ChannelRefusal::PermissionDenied),
            None => {}
        }
        let channel = MockChannel::new(mode);
        state.channels.push(channel.clone());
        Ok(MockConnection { channel })
    }

    fn is_data_injection_enabled(&self) -> bool {
        self.service.state.lock().injection_enabled
    }
}

// --- Event Channel ---

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCall {
    EnableDisable { handle: SensorHandle, enabled: bool, sampling_period_ns: i64, max_latency_ns: i64 },
    SetEventRate { handle: SensorHandle, sampling_period_ns: i64 },
}

struct ChannelState {
    mode: ChannelMode,
    control_calls: Vec<ControlCall>,
    control_status: Status,
    pending: VecDeque<SensorEvent>,
    read_requests: Vec<usize>,
    read_failure: Option<MockError>,
    over_report: usize,
    acked: Vec<SensorEvent>,
    ack_calls: u32,
    ack_failure: Option<MockError>,
    spurious_wakeups: u32,
    poll_failure: Option<MockError>,
    closed: bool,
}

struct ChannelShared {
    state: Mutex<ChannelState>,
    ready: Condvar,
}

/// Test-side handle on one event channel.
#[derive(Clone)]
pub struct MockChannel {
    shared: Arc<ChannelShared>,
}

impl MockChannel {
    fn new(mode: ChannelMode) -> Self {
        MockChannel {
            shared: Arc::new(ChannelShared {
                state: Mutex::new(ChannelState {
                    mode,
                    control_calls: Vec::new(),
                    control_status: Status::OK,
                    pending: VecDeque::new(),
                    read_requests: Vec::new(),
                    read_failure: None,
                    over_report: 0,
                    acked: Vec::new(),
                    ack_calls: 0,
                    ack_failure: None,
                    spurious_wakeups: 0,
                    poll_failure: None,
                    closed: false,
                }),
                ready: Condvar::new(),
            }),
        }
    }

    pub fn mode(&self) -> ChannelMode {
        self.shared.state.lock().mode
    }

    pub fn push_events(&self, events: &[SensorEvent]) {
        self.shared.state.lock().pending.extend(events.iter().copied());
        self.shared.ready.notify_all();
    }

    pub fn spurious_wakeup(&self) {
        self.shared.state.lock().spurious_wakeups += 1;
        self.shared.ready.notify_all();
    }

    pub fn close(&self) {
        self.shared.state.lock().closed = true;
        self.shared.ready.notify_all();
    }

    pub fn set_control_status(&self, status: Status) {
        self.shared.state.lock().control_status = status;
    }

    pub fn fail_reads(&self, error: Option<MockError>) {
        self.shared.state.lock().read_failure = error;
    }

    pub fn fail_acks(&self, error: Option<MockError>) {
        self.shared.state.lock().ack_failure = error;
    }

    pub fn fail_polls(&self, error: Option<MockError>) {
        self.shared.state.lock().poll_failure = error;
    }

    /// Makes reads claim `extra` more records than the caller asked for.
    pub fn over_report(&self, extra: usize) {
        self.shared.state.lock().over_report = extra;
    }

    pub fn control_calls(&self) -> Vec<ControlCall> {
        self.shared.state.lock().control_calls.clone()
    }

    pub fn acked(&self) -> Vec<SensorEvent> {
        self.shared.state.lock().acked.clone()
    }

    pub fn ack_calls(&self) -> u32 {
        self.shared.state.lock().ack_calls
    }

    pub fn read_requests(&self) -> Vec<usize> {
        self.shared.state.lock().read_requests.clone()
    }

    pub fn pending(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }
}

pub struct MockConnection {
    channel: MockChannel,
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.channel.close();
    }
}

impl EventConnection for MockConnection {
    type Error = MockError;

    fn enable_disable(
        &self,
        handle: SensorHandle,
        enabled: bool,
        sampling_period_ns: i64,
        max_batch_report_latency_ns: i64,
        _reserved_flags: i32,
    ) -> Status {
        let mut state = self.channel.shared.state.lock();
        state.control_calls.push(ControlCall::EnableDisable {
            handle,
            enabled,
            sampling_period_ns,
            max_latency_ns: max_batch_report_latency_ns,
        });
        state.control_status
    }

    fn set_event_rate(&self, handle: SensorHandle, sampling_period_ns: i64) -> Status {
        let mut state = self.channel.shared.state.lock();
        state.control_calls.push(ControlCall::SetEventRate { handle, sampling_period_ns });
        state.control_status
    }

    fn read(&mut self, events: &mut [SensorEvent]) -> nb::Result<usize, MockError> {
        let mut state = self.channel.shared.state.lock();
        state.read_requests.push(events.len());
        if let Some(error) = state.read_failure {
            return Err(nb::Error::Other(error));
        }
        if state.pending.is_empty() {
            return Err(nb::Error::WouldBlock);
        }
        let count = events.len().min(state.pending.len());
        for slot in events.iter_mut().take(count) {
            if let Some(event) = state.pending.pop_front() {
                *slot = event;
            }
        }
        Ok(count + state.over_report)
    }

    fn send_ack(&mut self, events: &[SensorEvent]) -> Result<(), MockError> {
        let mut state = self.channel.shared.state.lock();
        state.ack_calls += 1;
        if let Some(error) = state.ack_failure {
            return Err(error);
        }
        state.acked.extend_from_slice(events);
        Ok(())
    }

    fn wait_for_event(&self) -> Result<(), MockError> {
        let shared = &self.channel.shared;
        let mut state = shared.state.lock();
        loop {
            if state.closed {
                return Err(MockError("channel closed"));
            }
            if !state.pending.is_empty() {
                return Ok(());
            }
            if state.spurious_wakeups > 0 {
                state.spurious_wakeups -= 1;
                return Ok(());
            }
            shared.ready.wait(&mut state);
        }
    }

    fn poll_readable(&self) -> Result<bool, MockError> {
        let state = self.channel.shared.state.lock();
        if let Some(error) = state.poll_failure {
            return Err(error);
        }
        if state.closed {
            return Err(MockError("hangup"));
        }
        Ok(!state.pending.is_empty())
    }
}

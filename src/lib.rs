// src/lib.rs

//! Bridge between native consumers and the Android sensor service.
//!
//! A [`SensorManager`] owns the connection to the remote service, recovering
//! from service death on demand, and caches the sensor list per connection
//! generation. [`EventQueue`]s bound to a manager enable sensors and deliver
//! their events through a wait-then-drain protocol. The remote transport is
//! supplied by implementing the traits in [`common::hal_traits`].

pub mod common;
pub mod manager;
pub mod queue;

// Re-export key types for convenience
pub use common::{ManagerConfig, RetryPolicy, SensorError, Status};
pub use manager::SensorManager;
pub use queue::EventQueue;

// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod record;
pub mod status;
pub mod timing;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

// --- Re-export key types/traits for easier access ---

// From config.rs
pub use config::ManagerConfig;

// From error.rs
pub use error::SensorError;

// From hal_traits.rs
pub use hal_traits::{ChannelMode, ChannelRefusal, EventConnection, SensorServer, ServiceLocator, StdTimer, Timer};

// From record.rs
pub use record::SensorRecord;

// From status.rs
pub use status::Status;

// From timing.rs (constants stay under common::timing::*)
pub use timing::RetryPolicy;

// From types.rs
pub use types::{Generation, SensorDescriptor, SensorEvent, SensorHandle, SensorType};

// src/common/config.rs

use super::timing::RetryPolicy;

/// Service name the sensor service registers under.
pub const DEFAULT_SERVICE_NAME: &str = "sensorservice";
/// Package name the manager identifies itself with when talking to the service.
pub const DEFAULT_OP_PACKAGE_NAME: &str = "DroidSensorManager";

/// Settings for a [`SensorManager`](crate::manager::SensorManager).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManagerConfig {
    /// Name passed to the service locator.
    pub service_name: String,
    /// Op package name sent along with sensor list and channel requests.
    pub op_package_name: String,
    /// How long to keep looking for the service before failing.
    pub retry: RetryPolicy,
}

impl ManagerConfig {
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_op_package_name(mut self, name: impl Into<String>) -> Self {
        self.op_package_name = name.into();
        self
    }

    /// Parses a configuration from TOML. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            service_name: DEFAULT_SERVICE_NAME.to_owned(),
            op_package_name: DEFAULT_OP_PACKAGE_NAME.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

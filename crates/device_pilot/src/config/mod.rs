//! Configuration module for device_pilot
//!
//! This module contains:
//! - `device`: On-device artifact paths, locator tuning, dump recovery policy
//! - `timing`: Post-action delays for device operations

mod device;
mod timing;

pub use device::DeviceConfig;
pub use timing::{TimingConfig, TIMING_CONFIG};

//! Timing configuration for device operations

use lazy_static::lazy_static;
use std::env;

/// Post-action delays, in seconds, applied after the corresponding device
/// command has completed. Defaults can be overridden via environment
/// variables so slow devices can be accommodated without code changes.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    pub tap_delay: f64,
    pub key_delay: f64,
    pub text_input_delay: f64,
    pub launch_delay: f64,
    pub stop_delay: f64,
    pub install_delay: f64,
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tap_delay: env_f64("DEVPILOT_TAP_DELAY", 1.0),
            key_delay: env_f64("DEVPILOT_KEY_DELAY", 0.5),
            text_input_delay: env_f64("DEVPILOT_TEXT_INPUT_DELAY", 1.0),
            launch_delay: env_f64("DEVPILOT_LAUNCH_DELAY", 2.0),
            stop_delay: env_f64("DEVPILOT_STOP_DELAY", 2.0),
            install_delay: env_f64("DEVPILOT_INSTALL_DELAY", 2.0),
        }
    }
}

impl TimingConfig {
    /// All delays zeroed. Used by tests driving a scripted channel.
    pub fn immediate() -> Self {
        Self {
            tap_delay: 0.0,
            key_delay: 0.0,
            text_input_delay: 0.0,
            launch_delay: 0.0,
            stop_delay: 0.0,
            install_delay: 0.0,
        }
    }
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}

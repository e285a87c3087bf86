//! Device-level configuration: artifact paths and locator tuning
//!
//! Structural dumps and raster captures land at fixed on-device paths, so
//! these are configuration values rather than literals. Tests point them at
//! isolated paths to avoid cross-test interference.

use std::env;
use std::path::PathBuf;

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// On-device path the UI dump subsystem writes to.
    pub dump_remote_path: String,
    /// Marker expected in the dump command's acknowledgement.
    pub dump_success_marker: String,
    /// Package whose enable/launch/stop cycle nudges a stuck dump subsystem.
    pub trigger_package: String,
    /// Recovery cycles allowed before giving up on the dump. `None` blocks
    /// until the dump succeeds, matching how callers treat a session whose
    /// dump never comes back as broken anyway.
    pub max_dump_recoveries: Option<usize>,
    /// On-device path raster captures are written to.
    pub capture_remote_path: String,
    /// Key events issued to bring a scrollable view back to its top.
    pub scroll_to_top_repeats: usize,
    /// Key events issued per scroll-down step during a search.
    pub scroll_step_repeats: usize,
    /// Keycode used for scrolling up.
    pub scroll_up_keycode: String,
    /// Keycode used for scrolling down.
    pub scroll_down_keycode: String,
    /// Minimum correlation score for a visual match to be accepted.
    pub match_threshold: f64,
    /// Directory pulled artifacts are stored under locally.
    pub local_work_dir: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            dump_remote_path: env_string("DEVPILOT_DUMP_PATH", "/sdcard/window_dump.xml"),
            dump_success_marker: env_string("DEVPILOT_DUMP_MARKER", "dumped"),
            trigger_package: env_string("DEVPILOT_TRIGGER_PACKAGE", "com.android.vending"),
            max_dump_recoveries: None,
            capture_remote_path: env_string("DEVPILOT_CAPTURE_PATH", "/sdcard/capture.png"),
            scroll_to_top_repeats: env_usize("DEVPILOT_SCROLL_TOP_REPEATS", 100),
            scroll_step_repeats: env_usize("DEVPILOT_SCROLL_STEP_REPEATS", 8),
            scroll_up_keycode: "KEYCODE_DPAD_UP".to_string(),
            scroll_down_keycode: "KEYCODE_DPAD_DOWN".to_string(),
            match_threshold: env::var("DEVPILOT_MATCH_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.8),
            local_work_dir: env::temp_dir(),
        }
    }
}

//! device_pilot: remote control and automation for a single Android device
//!
//! This library provides:
//! - A command channel abstraction over ADB (shell execution, file transfer)
//! - UI snapshot acquisition (structural dumps with recovery, raster capture)
//! - A structural locator (scroll-search over the dump tree, stall detection)
//! - A visual locator (reference-image correlation against a capture)
//! - A locate/tap interaction dispatcher
//! - Package lifecycle and remote file utilities
//!
//! # Example
//!
//! ```no_run
//! use device_pilot::{AdbChannel, Device};
//!
//! #[tokio::main]
//! async fn main() -> device_pilot::Result<()> {
//!     let device = Device::new(AdbChannel::new(None));
//!     if device.tap("//node[@text='OK']").await? {
//!         println!("tapped");
//!     }
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Transport
pub mod channel;

// Core functionality
pub mod device;
pub mod files;
pub mod interact;
pub mod locator;
pub mod package;
pub mod snapshot;
pub mod tree;

// Re-export commonly used types and functions
pub use error::{DeviceError, Result};

// Config re-exports
pub use config::{DeviceConfig, TimingConfig, TIMING_CONFIG};

// Channel re-exports
pub use channel::{list_devices, AdbChannel, CommandChannel, ConnectionType, DeviceInfo};

// Device re-exports
pub use device::Device;
pub use interact::Located;
pub use locator::VisualMatch;
pub use package::PackageStatus;
pub use snapshot::CaptureArtifact;
pub use tree::{parse_dump, Point, Query, Rect, UiNode};

//! Element location engines
//!
//! This module provides:
//! - `structural`: scroll-search over the UI dump tree with stall detection
//! - `visual`: template correlation of a reference image against a capture

mod structural;
mod visual;

pub use visual::VisualMatch;

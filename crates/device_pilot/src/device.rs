//! Device facade: one logical session against one command channel
//!
//! All operations run sequentially; the structural dump and raster capture
//! write to fixed on-device paths, so concurrent use of one device from two
//! callers would corrupt each other's snapshots. Callers enforce one
//! in-flight operation per device.

use crate::channel::CommandChannel;
use crate::config::{DeviceConfig, TimingConfig, TIMING_CONFIG};
use crate::error::Result;
use crate::tree::Point;
use std::time::Duration;
use tracing::debug;

pub struct Device<C: CommandChannel> {
    pub(crate) channel: C,
    pub(crate) config: DeviceConfig,
    pub(crate) timing: TimingConfig,
}

impl<C: CommandChannel> Device<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            config: DeviceConfig::default(),
            timing: TIMING_CONFIG.clone(),
        }
    }

    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Run a raw shell command on the device and capture its output.
    pub async fn execute(&self, command: &str) -> Result<String> {
        self.channel.execute(command).await
    }

    pub(crate) async fn pause(&self, seconds: f64) {
        if seconds > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
        }
    }

    /// Issue `repeats` key events for `keycode` in a single shell command.
    pub async fn key_repeat(&self, keycode: &str, repeats: usize) -> Result<()> {
        let keycode = keycode.to_uppercase();
        self.execute(&format!(
            "input keyevent $(printf '{} %.0s' $(seq 1 {}))",
            keycode, repeats
        ))
        .await?;
        self.pause(self.timing.key_delay).await;
        Ok(())
    }

    /// Tap at the given pixel coordinates.
    pub async fn tap_at(&self, point: Point) -> Result<()> {
        debug!("tap at ({}, {})", point.x, point.y);
        self.execute(&format!("input tap {} {}", point.x, point.y))
            .await?;
        self.pause(self.timing.tap_delay).await;
        Ok(())
    }

    /// Type text into the focused field. With `cleared`, the field content
    /// is deleted first (jump to end, then delete backwards).
    pub async fn type_text(&self, content: &str, cleared: bool) -> Result<()> {
        if cleared {
            self.key_repeat("KEYCODE_MOVE_END", 1).await?;
            self.key_repeat("KEYCODE_DEL", 100).await?;
        }
        self.execute(&format!("input text '{}'", content)).await?;
        self.pause(self.timing.text_input_delay).await;
        Ok(())
    }

    /// Back out of whatever is on screen and wake the display: two rounds of
    /// eight back presses, then a wakeup key.
    pub async fn wake_home(&self) -> Result<()> {
        for _ in 0..2 {
            self.key_repeat("KEYCODE_BACK", 8).await?;
        }
        self.key_repeat("KEYCODE_WAKEUP", 1).await?;
        self.execute("sleep 2").await?;
        Ok(())
    }
}

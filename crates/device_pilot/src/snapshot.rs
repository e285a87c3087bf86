//! UI snapshot provider: structural dumps and raster captures
//!
//! The on-device dump subsystem can silently no-op. Acquisition deletes any
//! stale artifact, invokes the dump, and on a missing success marker runs a
//! recovery cycle (enable, launch, then force-stop a trigger package known
//! to make the subsystem responsive) before retrying. By default this blocks
//! until the dump succeeds; `DeviceConfig::max_dump_recoveries` caps it.

use crate::channel::CommandChannel;
use crate::device::Device;
use crate::error::{DeviceError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A pulled raster capture. Owns the local file and removes it on drop, so
/// cleanup happens on every exit path of the matching step.
#[derive(Debug)]
pub struct CaptureArtifact {
    path: PathBuf,
}

impl CaptureArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CaptureArtifact {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

impl<C: CommandChannel> Device<C> {
    /// Acquire a fresh structural dump and return its text, trimmed.
    pub async fn dump_ui(&self) -> Result<String> {
        let dump_path = self.config.dump_remote_path.clone();
        self.execute(&format!("rm -rf {}", dump_path)).await?;

        let mut recoveries = 0usize;
        loop {
            let ack = self.execute("uiautomator dump").await?;
            if ack.contains(&self.config.dump_success_marker) {
                break;
            }

            if let Some(max) = self.config.max_dump_recoveries {
                if recoveries >= max {
                    return Err(DeviceError::DumpUnavailable(recoveries));
                }
            }
            recoveries += 1;
            warn!("dump not acknowledged, recovery cycle {}", recoveries);

            let trigger = self.config.trigger_package.clone();
            self.set_package_enabled(&trigger, true).await?;
            self.launch_package(&trigger).await?;
            self.stop_package(&trigger).await?;
        }

        let text = self.execute(&format!("cat {}", dump_path)).await?;
        Ok(text.trim().to_string())
    }

    /// Capture the screen to the configured remote path and pull it locally.
    /// `None` when the capture never materialized on this side.
    pub async fn capture_screen(&self) -> Result<Option<CaptureArtifact>> {
        let remote = self.config.capture_remote_path.clone();
        self.execute(&format!("screencap -p {}", remote)).await?;

        match self.channel.pull(&remote).await? {
            Some(path) => {
                debug!("capture pulled to {}", path.display());
                Ok(Some(CaptureArtifact { path }))
            }
            None => {
                warn!("capture {} did not materialize locally", remote);
                Ok(None)
            }
        }
    }
}

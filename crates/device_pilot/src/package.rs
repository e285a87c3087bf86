//! Package lifecycle operations

use crate::channel::CommandChannel;
use crate::device::Device;
use crate::error::Result;
use tracing::debug;

/// Installation and runtime state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageStatus {
    pub running: bool,
    pub installed: bool,
}

impl<C: CommandChannel> Device<C> {
    /// Query whether a package is installed and currently running.
    pub async fn package_status(&self, package: &str) -> Result<PackageStatus> {
        let pid = self.execute(&format!("pidof '{}'", package)).await?;
        let path = self.execute(&format!("pm path '{}'", package)).await?;
        Ok(PackageStatus {
            running: !pid.trim().is_empty(),
            installed: !path.trim().is_empty(),
        })
    }

    /// Launch a package via the monkey launcher event.
    pub async fn launch_package(&self, package: &str) -> Result<()> {
        debug!("launching {}", package);
        self.execute(&format!("monkey -p '{}' 1", package)).await?;
        self.pause(self.timing.launch_delay).await;
        Ok(())
    }

    /// Force-stop a package. A package that is not installed is left alone.
    pub async fn stop_package(&self, package: &str) -> Result<()> {
        if self.package_status(package).await?.installed {
            debug!("stopping {}", package);
            self.execute(&format!("am force-stop '{}'", package)).await?;
            self.pause(self.timing.stop_delay).await;
        }
        Ok(())
    }

    /// Enable a package, or disable it for the current user.
    pub async fn set_package_enabled(&self, package: &str, enabled: bool) -> Result<()> {
        let verb = if enabled { "enable" } else { "disable-user --user 0" };
        self.execute(&format!("pm {} '{}'", verb, package)).await?;
        Ok(())
    }

    /// Grant an `android.permission.*` permission to a package.
    pub async fn grant_permission(&self, package: &str, permission: &str) -> Result<()> {
        self.execute(&format!(
            "pm grant {} android.permission.{}",
            package,
            permission.to_uppercase()
        ))
        .await?;
        Ok(())
    }

    /// Install an APK from a local path: push it, stream it into `pm
    /// install`, then remove the pushed copy.
    pub async fn install_package(&self, apk: &std::path::Path) -> Result<()> {
        let size = std::fs::metadata(apk)?.len();
        let name = apk
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "package.apk".to_string());
        let remote = format!("/sdcard/{}", name);

        self.channel.push(apk, &remote).await?;
        self.execute(&format!("cat {} | pm install -S {}", remote, size))
            .await?;
        self.remove_remote(&remote).await?;
        self.pause(self.timing.install_delay).await;
        Ok(())
    }

    /// Stop and uninstall a package.
    pub async fn uninstall_package(&self, package: &str) -> Result<()> {
        self.stop_package(package).await?;
        self.execute(&format!("pm uninstall '{}'", package)).await?;
        Ok(())
    }
}

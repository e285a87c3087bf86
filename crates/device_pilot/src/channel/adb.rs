//! ADB-backed command channel
//!
//! Wraps the `adb` binary for shell execution, file transfer, and connection
//! management against local or remote (TCP/IP) devices.

use crate::error::{DeviceError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;
use uuid::Uuid;

/// Type of ADB connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Usb,
    Remote,
}

/// Information about a connected device
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub device_id: String,
    pub status: String,
    pub connection_type: ConnectionType,
    pub model: Option<String>,
}

/// Command channel backed by the `adb` binary.
pub struct AdbChannel {
    adb_path: String,
    device_id: Option<String>,
    shell_timeout: u64,
    work_dir: PathBuf,
}

impl AdbChannel {
    pub fn new(device_id: Option<String>) -> Self {
        Self {
            adb_path: "adb".to_string(),
            device_id,
            shell_timeout: 120,
            work_dir: std::env::temp_dir(),
        }
    }

    /// Use a custom `adb` binary path.
    pub fn with_adb_path(mut self, adb_path: impl Into<String>) -> Self {
        self.adb_path = adb_path.into();
        self
    }

    /// Per-command timeout in seconds.
    pub fn with_shell_timeout(mut self, seconds: u64) -> Self {
        self.shell_timeout = seconds;
        self
    }

    /// Directory pulled files are written to.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.adb_path);
        if let Some(id) = &self.device_id {
            cmd.arg("-s").arg(id);
        }
        cmd
    }

    async fn run(&self, mut cmd: Command, what: &str) -> Result<std::process::Output> {
        tokio::time::timeout(Duration::from_secs(self.shell_timeout), cmd.output())
            .await
            .map_err(|_| {
                DeviceError::Timeout(format!("{} timeout after {}s", what, self.shell_timeout))
            })?
            .map_err(DeviceError::Io)
    }

    /// Connect to a remote device via TCP/IP. Bare addresses get the default
    /// `:5555` port appended.
    pub async fn connect(&self, address: &str) -> Result<String> {
        let address = if address.contains(':') {
            address.to_string()
        } else {
            format!("{}:5555", address)
        };

        let mut cmd = Command::new(&self.adb_path);
        cmd.arg("connect").arg(&address);
        let output = self.run(cmd, "connect").await?;

        let combined = combined_output(&output);
        if combined.to_lowercase().contains("connected") {
            Ok(format!("Connected to {}", address))
        } else {
            Err(DeviceError::CommandFailed(combined.trim().to_string()))
        }
    }

    /// Disconnect from a remote device, or from all when no address given.
    pub async fn disconnect(&self, address: Option<&str>) -> Result<String> {
        let mut cmd = Command::new(&self.adb_path);
        cmd.arg("disconnect");
        if let Some(addr) = address {
            cmd.arg(addr);
        }
        let output = self.run(cmd, "disconnect").await?;
        let result = combined_output(&output).trim().to_string();
        Ok(if result.is_empty() {
            "Disconnected".to_string()
        } else {
            result
        })
    }

    /// List all connected devices.
    pub async fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        let mut cmd = Command::new(&self.adb_path);
        cmd.arg("devices").arg("-l");
        let output = self.run(cmd, "list devices").await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut devices = Vec::new();

        for line in stdout.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                continue;
            }

            let device_id = parts[0].to_string();
            let connection_type = if device_id.contains(':') {
                ConnectionType::Remote
            } else {
                ConnectionType::Usb
            };
            let model = parts[2..]
                .iter()
                .find_map(|p| p.strip_prefix("model:").map(str::to_string));

            devices.push(DeviceInfo {
                device_id,
                status: parts[1].to_string(),
                connection_type,
                model,
            });
        }

        Ok(devices)
    }

    /// Reboot the device and block until it answers shell commands again.
    pub async fn reboot(&self) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("reboot");
        self.run(cmd, "reboot").await?;

        tokio::time::sleep(Duration::from_secs(4)).await;
        loop {
            let mut cmd = self.command();
            cmd.arg("wait-for-device");
            if self.run(cmd, "wait-for-device").await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        tokio::time::sleep(Duration::from_secs(8)).await;
        Ok(())
    }
}

fn combined_output(output: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[async_trait]
impl super::CommandChannel for AdbChannel {
    async fn execute(&self, command: &str) -> Result<String> {
        debug!("shell: {}", command);
        let mut cmd = self.command();
        cmd.arg("shell").arg(command);
        let output = self.run(cmd, "shell").await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn push(&self, local: &Path, remote: &str) -> Result<()> {
        debug!("push {} -> {}", local.display(), remote);
        let mut cmd = self.command();
        cmd.arg("push").arg(local).arg(remote);
        let output = self.run(cmd, "push").await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(DeviceError::CommandFailed(
                combined_output(&output).trim().to_string(),
            ))
        }
    }

    async fn pull(&self, remote: &str) -> Result<Option<PathBuf>> {
        let name = remote.rsplit('/').next().unwrap_or("pulled");
        let local = self.work_dir.join(format!("{}-{}", Uuid::new_v4(), name));
        debug!("pull {} -> {}", remote, local.display());

        let mut cmd = self.command();
        cmd.arg("pull").arg(remote).arg(&local);
        self.run(cmd, "pull").await?;

        Ok(if local.exists() { Some(local) } else { None })
    }
}

/// Quick helper to list connected devices with default settings.
pub async fn list_devices() -> Result<Vec<DeviceInfo>> {
    AdbChannel::new(None).list_devices().await
}

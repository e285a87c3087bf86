//! Remote filesystem utilities

use crate::channel::CommandChannel;
use crate::device::Device;
use crate::error::Result;
use std::path::{Path, PathBuf};

fn remote_parent(remote: &str) -> &str {
    match remote.rfind('/') {
        Some(0) => "/",
        Some(index) => &remote[..index],
        None => ".",
    }
}

impl<C: CommandChannel> Device<C> {
    /// Create an empty file at `remote`, creating parent directories.
    pub async fn create_remote(&self, remote: &str) -> Result<()> {
        self.execute(&format!(
            "mkdir -p '{}' ; touch '{}'",
            remote_parent(remote),
            remote
        ))
        .await?;
        Ok(())
    }

    /// Recursively remove a remote path.
    pub async fn remove_remote(&self, remote: &str) -> Result<()> {
        self.execute(&format!("rm -rf {}", remote)).await?;
        Ok(())
    }

    /// Expand a remote glob, returning at most `maximum` matching paths, or
    /// `None` when nothing matches.
    pub async fn find_remote(&self, pattern: &str, maximum: usize) -> Result<Option<Vec<String>>> {
        let output = self
            .execute(&format!(
                "find {} -maxdepth 0 2>/dev/null | head -{}",
                pattern, maximum
            ))
            .await?;
        let trimmed = output.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(trimmed.lines().map(str::to_string).collect()))
    }

    /// Push a local file to the device.
    pub async fn push_file(&self, local: &Path, remote: &str) -> Result<()> {
        self.channel.push(local, remote).await
    }

    /// Pull a remote file. `None` when it did not materialize locally.
    pub async fn pull_file(&self, remote: &str) -> Result<Option<PathBuf>> {
        self.channel.pull(remote).await
    }

    /// Push a zip archive and unpack it under `deposit` on the device; the
    /// pushed archive itself is removed afterwards.
    pub async fn unpack(&self, archive: &Path, deposit: &str) -> Result<()> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "archive.zip".to_string());
        let remote = format!("{}/{}", deposit, name);

        self.execute(&format!("mkdir -p '{}'", deposit)).await?;
        self.channel.push(archive, &remote).await?;
        self.execute(&format!("cd '{}' ; unzip -o '{}'", deposit, name))
            .await?;
        self.remove_remote(&remote).await?;
        Ok(())
    }
}

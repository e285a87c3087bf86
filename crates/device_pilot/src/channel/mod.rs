//! Command channel: remote shell execution and file transfer
//!
//! The locators only depend on the [`CommandChannel`] trait, so they can be
//! exercised against a scripted fake without a device attached.

mod adb;

pub use adb::{list_devices, AdbChannel, ConnectionType, DeviceInfo};

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Synchronous-per-call transport to a single device.
///
/// `execute` returns captured standard output. `pull` returns the local path
/// the remote file landed at, or `None` when the remote file did not
/// materialize. Transport failures surface as errors and are never retried
/// at this layer.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    async fn execute(&self, command: &str) -> Result<String>;
    async fn push(&self, local: &Path, remote: &str) -> Result<()>;
    async fn pull(&self, remote: &str) -> Result<Option<PathBuf>>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct Rule {
        needle: String,
        responses: Vec<String>,
        served: usize,
    }

    /// Scripted channel for tests: substring-matched rules map commands to
    /// queued responses (the last response repeats once drained), every
    /// executed command is logged, and pulls are served from local fixture
    /// files copied into a private temp dir.
    pub struct FakeChannel {
        rules: Mutex<Vec<Rule>>,
        log: Mutex<Vec<String>>,
        pull_fixtures: Mutex<HashMap<String, PathBuf>>,
        work_dir: tempfile::TempDir,
    }

    impl FakeChannel {
        pub fn new() -> Self {
            Self {
                rules: Mutex::new(Vec::new()),
                log: Mutex::new(Vec::new()),
                pull_fixtures: Mutex::new(HashMap::new()),
                work_dir: tempfile::tempdir().expect("temp dir"),
            }
        }

        /// Commands containing `needle` reply with `response`.
        pub fn respond(self, needle: &str, response: &str) -> Self {
            self.respond_seq(needle, &[response])
        }

        /// Commands containing `needle` reply with successive entries of
        /// `responses`; the final entry repeats.
        pub fn respond_seq(self, needle: &str, responses: &[&str]) -> Self {
            self.rules.lock().unwrap().push(Rule {
                needle: needle.to_string(),
                responses: responses.iter().map(|s| s.to_string()).collect(),
                served: 0,
            });
            self
        }

        /// Pulls of `remote` serve a copy of the given local fixture.
        pub fn serve_pull(self, remote: &str, fixture: &Path) -> Self {
            self.pull_fixtures
                .lock()
                .unwrap()
                .insert(remote.to_string(), fixture.to_path_buf());
            self
        }

        pub fn commands(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        pub fn count_containing(&self, needle: &str) -> usize {
            self.commands().iter().filter(|c| c.contains(needle)).count()
        }
    }

    #[async_trait]
    impl CommandChannel for FakeChannel {
        async fn execute(&self, command: &str) -> Result<String> {
            self.log.lock().unwrap().push(command.to_string());
            let mut rules = self.rules.lock().unwrap();
            for rule in rules.iter_mut() {
                if command.contains(&rule.needle) {
                    let index = rule.served.min(rule.responses.len() - 1);
                    rule.served += 1;
                    return Ok(rule.responses[index].clone());
                }
            }
            Ok(String::new())
        }

        async fn push(&self, local: &Path, remote: &str) -> Result<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("push {} {}", local.display(), remote));
            Ok(())
        }

        async fn pull(&self, remote: &str) -> Result<Option<PathBuf>> {
            self.log.lock().unwrap().push(format!("pull {}", remote));
            let fixture = self.pull_fixtures.lock().unwrap().get(remote).cloned();
            match fixture {
                Some(source) => {
                    let name = source
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "pulled".to_string());
                    let target = self
                        .work_dir
                        .path()
                        .join(format!("{}-{}", uuid::Uuid::new_v4(), name));
                    std::fs::copy(&source, &target)?;
                    Ok(Some(target))
                }
                None => Ok(None),
            }
        }
    }
}

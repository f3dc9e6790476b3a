// SPDX-License-Identifier: MIT

//! Worker engines the parallel backend fans work out to: `LocalEngine`
//! for a process on the driver's own host, `RemoteEngine` for a host
//! reached over `ssh`/`scp` — both behind one [`Engine`] trait so the
//! dispatcher never branches on which kind it's holding.

use std::path::Path;

use async_trait::async_trait;
use railrna_core::EngineId;
use tokio::process::Command;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Local,
    Remote,
}

/// One addressable worker. `host()` groups engines for per-host copier
/// election; engines sharing a host share a scratch directory.
#[async_trait]
pub trait Engine: Send + Sync {
    fn id(&self) -> &EngineId;
    fn host(&self) -> &str;
    fn kind(&self) -> EngineKind;

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), EngineError>;
    async fn file_exists(&self, path: &Path) -> Result<bool, EngineError>;
    async fn copy_in(&self, local_src: &Path, remote_dest: &Path) -> Result<(), EngineError>;
    async fn make_dir(&self, path: &Path) -> Result<(), EngineError>;

    /// Installs the cleanup guarantee for this engine's scratch directory.
    /// `LocalEngine` uses OS-level process-group teardown (the driver kills
    /// its own children's group on exit); `RemoteEngine` has no such
    /// handle onto a long-lived worker process, so it falls back to the
    /// parent-PID poll-script trick.
    async fn spawn_watchdog(&self, scratch_dir: &Path) -> Result<(), EngineError>;
}

/// A worker running on the driver's own host: file operations are plain
/// `tokio::fs`, and its children live in the driver's own process group.
pub struct LocalEngine {
    id: EngineId,
    host: String,
}

impl LocalEngine {
    pub fn new(id: EngineId, host: impl Into<String>) -> Self {
        Self {
            id,
            host: host.into(),
        }
    }
}

#[async_trait]
impl Engine for LocalEngine {
    fn id(&self) -> &EngineId {
        &self.id
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Local
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), EngineError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|source| EngineError::Io {
                engine: self.id.clone(),
                source,
            })
    }

    async fn file_exists(&self, path: &Path) -> Result<bool, EngineError> {
        Ok(tokio::fs::metadata(path).await.is_ok())
    }

    async fn copy_in(&self, local_src: &Path, remote_dest: &Path) -> Result<(), EngineError> {
        if let Some(parent) = remote_dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| EngineError::Io {
                    engine: self.id.clone(),
                    source,
                })?;
        }
        tokio::fs::copy(local_src, remote_dest)
            .await
            .map_err(|source| EngineError::Io {
                engine: self.id.clone(),
                source,
            })?;
        Ok(())
    }

    async fn make_dir(&self, path: &Path) -> Result<(), EngineError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| EngineError::Io {
                engine: self.id.clone(),
                source,
            })
    }

    /// No poll-script here: on process death the OS reclaims the group the
    /// driver placed its children in. This watchdog only ensures the
    /// scratch directory belongs to a group the driver can kill as a unit;
    /// no separate process is spawned to watch it.
    async fn spawn_watchdog(&self, _scratch_dir: &Path) -> Result<(), EngineError> {
        Ok(())
    }
}

/// A worker reached over the network. Commands run via `ssh`, file
/// transfer via `scp`; this engine outlives the driver's own process
/// group, so it needs the parent-PID poll-script watchdog instead.
pub struct RemoteEngine {
    id: EngineId,
    host: String,
    ssh_user: Option<String>,
}

impl RemoteEngine {
    pub fn new(id: EngineId, host: impl Into<String>, ssh_user: Option<String>) -> Self {
        Self {
            id,
            host: host.into(),
            ssh_user,
        }
    }

    fn target(&self) -> String {
        match &self.ssh_user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    pub(crate) async fn run_remote_command(&self, remote_command: &str) -> Result<(), EngineError> {
        let status = Command::new("ssh")
            .arg(self.target())
            .arg(remote_command)
            .status()
            .await
            .map_err(|source| EngineError::Io {
                engine: self.id.clone(),
                source,
            })?;
        if !status.success() {
            return Err(EngineError::CommandFailed {
                engine: self.id.clone(),
                command: remote_command.to_string(),
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Engine for RemoteEngine {
    fn id(&self) -> &EngineId {
        &self.id
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Remote
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), EngineError> {
        let tmp = std::env::temp_dir().join(format!("railrna-probe-{}", self.id.as_str()));
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|source| EngineError::Io {
                engine: self.id.clone(),
                source,
            })?;
        self.copy_in(&tmp, path).await
    }

    async fn file_exists(&self, path: &Path) -> Result<bool, EngineError> {
        let command = format!("test -e {}", shell_quote(path));
        Ok(self.run_remote_command(&command).await.is_ok())
    }

    async fn copy_in(&self, local_src: &Path, remote_dest: &Path) -> Result<(), EngineError> {
        if let Some(parent) = remote_dest.parent() {
            self.make_dir(parent).await?;
        }
        let status = Command::new("scp")
            .arg(local_src)
            .arg(format!("{}:{}", self.target(), remote_dest.display()))
            .status()
            .await
            .map_err(|source| EngineError::Io {
                engine: self.id.clone(),
                source,
            })?;
        if !status.success() {
            return Err(EngineError::CommandFailed {
                engine: self.id.clone(),
                command: "scp".to_string(),
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }

    async fn make_dir(&self, path: &Path) -> Result<(), EngineError> {
        self.run_remote_command(&format!("mkdir -p {}", shell_quote(path))).await
    }

    async fn spawn_watchdog(&self, scratch_dir: &Path) -> Result<(), EngineError> {
        crate::watchdog::spawn_poll_script(self, scratch_dir).await
    }
}

fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT

//! URL abstraction over the five storage backends the driver can address:
//! a local path, a distributed filesystem (HDFS via `hadoop fs`), an
//! object store (S3 via `s3cmd`), an HTTP endpoint, and an FTP endpoint.
//!
//! Each variant dispatches to exactly one external helper program. This
//! mirrors the dispatch table a mover utility would use: classify first,
//! then hand the whole operation to the one tool that knows that scheme.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::UrlError;

/// Which of the five backends a [`Url`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlVariant {
    Local,
    Dfs,
    ObjectStore,
    Http,
    Ftp,
}

impl UrlVariant {
    /// Classifies a raw URL/path string by scheme prefix. Anything without
    /// a recognized scheme is treated as a local path, matching the
    /// convention that bare paths are always local.
    pub fn classify(raw: &str) -> Self {
        if raw.starts_with("s3://") || raw.starts_with("s3n://") {
            UrlVariant::ObjectStore
        } else if raw.starts_with("hdfs://") {
            UrlVariant::Dfs
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            UrlVariant::Http
        } else if raw.starts_with("ftp://") {
            UrlVariant::Ftp
        } else {
            UrlVariant::Local
        }
    }

    /// True for the two backends fetchable with a plain `curl`/HTTP GET.
    pub fn is_curlable(self) -> bool {
        matches!(self, UrlVariant::Http | UrlVariant::Ftp)
    }
}

/// A URL or path, tagged with the backend that serves it.
///
/// Equality and ordering compare on the raw string, so two `Url`s built
/// from the same text are always equal regardless of how they were
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url {
    raw: String,
    variant: UrlVariant,
}

impl Url {
    /// Parses `raw` into a [`Url`], classifying its backend by scheme.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let variant = UrlVariant::classify(&raw);
        Self { raw, variant }
    }

    pub fn variant(&self) -> UrlVariant {
        self.variant
    }

    pub fn is_local(&self) -> bool {
        self.variant == UrlVariant::Local
    }

    pub fn is_object_store(&self) -> bool {
        self.variant == UrlVariant::ObjectStore
    }

    pub fn is_curlable(&self) -> bool {
        self.variant.is_curlable()
    }

    pub fn is_dfs(&self) -> bool {
        self.variant == UrlVariant::Dfs
    }

    /// The scheme-qualified form (`s3://bucket/key`, `hdfs:///foo`, ...).
    pub fn to_display(&self) -> &str {
        &self.raw
    }

    /// The form each backend's own tooling expects on its command line.
    /// For local paths this is a native filesystem path; for every other
    /// backend it is the same scheme-qualified string as [`Url::to_display`].
    pub fn to_native(&self) -> &str {
        &self.raw
    }

    /// Joins a child path component onto this URL, matching shell `/`
    /// joining semantics used by every backend's CLI tool.
    pub fn join(&self, child: &str) -> Self {
        let mut raw = self.raw.trim_end_matches('/').to_string();
        raw.push('/');
        raw.push_str(child.trim_start_matches('/'));
        Self {
            variant: self.variant,
            raw,
        }
    }

    /// Returns the last path component, e.g. for naming an uploaded file
    /// after its local source.
    pub fn basename(&self) -> &str {
        self.raw.rsplit('/').next().unwrap_or(&self.raw)
    }

    pub fn as_path(&self) -> Option<&Path> {
        if self.is_local() {
            Some(Path::new(&self.raw))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for Url {
    fn from(raw: &str) -> Self {
        Url::parse(raw)
    }
}

impl From<String> for Url {
    fn from(raw: String) -> Self {
        Url::parse(raw)
    }
}

impl From<PathBuf> for Url {
    fn from(path: PathBuf) -> Self {
        Url::parse(path.to_string_lossy().into_owned())
    }
}

/// Backend operations a [`Url`] can be asked to perform, regardless of
/// which of the five storage systems actually serves it.
#[async_trait::async_trait]
pub trait UrlBackend: Send + Sync {
    async fn exists(&self, url: &Url) -> Result<bool, UrlError>;
    async fn is_dir(&self, url: &Url) -> Result<bool, UrlError>;
    /// Copies the local file at `local` up to `url`.
    async fn put(&self, local: &Path, url: &Url) -> Result<(), UrlError>;
    /// Copies `url` down into the local directory `dest_dir`.
    async fn get(&self, url: &Url, dest_dir: &Path) -> Result<(), UrlError>;
    async fn remove_dir(&self, url: &Url) -> Result<(), UrlError>;
}

/// Configuration for the external helpers an [`ExternalUrlBackend`] shells
/// out to. Mirrors the credentials a mover utility needs: an optional
/// object-store config file, an optional public-ACL flag, and the DFS
/// client binary name.
#[derive(Debug, Clone)]
pub struct ExternalToolConfig {
    pub object_store_config: Option<PathBuf>,
    pub object_store_public_acl: bool,
    pub dfs_binary: String,
    pub curl_connect_timeout: Duration,
    pub curl_retries: u32,
    pub command_timeout: Duration,
}

impl Default for ExternalToolConfig {
    fn default() -> Self {
        Self {
            object_store_config: None,
            object_store_public_acl: false,
            dfs_binary: "hadoop".to_string(),
            curl_connect_timeout: Duration::from_secs(60),
            curl_retries: 5,
            command_timeout: Duration::from_secs(3600),
        }
    }
}

/// [`UrlBackend`] that dispatches each operation to exactly one external
/// helper program, keyed on the URL's [`UrlVariant`]: local paths use
/// `std::fs` directly, object-store URLs go through `s3cmd`, DFS URLs go
/// through `hadoop fs`, and HTTP/FTP URLs are fetched with `curl` (they
/// cannot be written to).
pub struct ExternalUrlBackend {
    config: ExternalToolConfig,
}

impl ExternalUrlBackend {
    pub fn new(config: ExternalToolConfig) -> Self {
        Self { config }
    }

    async fn run(&self, mut cmd: Command, description: &str) -> Result<(), UrlError> {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let output = tokio::time::timeout(self.config.command_timeout, cmd.output())
            .await
            .map_err(|_| {
                UrlError::Transport {
                    url: description.to_string(),
                    source: format!(
                        "{description} timed out after {}s",
                        self.config.command_timeout.as_secs()
                    )
                    .into(),
                }
            })?
            .map_err(|e| UrlError::Transport {
                url: description.to_string(),
                source: Box::new(e),
            })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(UrlError::Transport {
                url: description.to_string(),
                source: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )
                .into(),
            })
        }
    }
}

#[async_trait::async_trait]
impl UrlBackend for ExternalUrlBackend {
    async fn exists(&self, url: &Url) -> Result<bool, UrlError> {
        match url.variant() {
            UrlVariant::Local => Ok(Path::new(url.to_native()).exists()),
            UrlVariant::Dfs => {
                let status = Command::new(&self.config.dfs_binary)
                    .args(["fs", "-test", "-e", url.to_native()])
                    .status()
                    .await
                    .map_err(|e| UrlError::Transport {
                        url: url.to_display().to_string(),
                        source: Box::new(e),
                    })?;
                Ok(status.success())
            }
            UrlVariant::ObjectStore => {
                let mut cmd = Command::new("s3cmd");
                if let Some(cfg) = &self.config.object_store_config {
                    cmd.arg("-c").arg(cfg);
                }
                cmd.arg("ls").arg(url.to_native());
                let output = cmd.output().await.map_err(|e| UrlError::Transport {
                    url: url.to_display().to_string(),
                    source: Box::new(e),
                })?;
                Ok(output.status.success() && !output.stdout.is_empty())
            }
            UrlVariant::Http | UrlVariant::Ftp => {
                let output = Command::new("curl")
                    .args(["--head", "--fail", "--silent"])
                    .arg(url.to_native())
                    .output()
                    .await
                    .map_err(|e| UrlError::Transport {
                        url: url.to_display().to_string(),
                        source: Box::new(e),
                    })?;
                Ok(output.status.success())
            }
        }
    }

    async fn is_dir(&self, url: &Url) -> Result<bool, UrlError> {
        match url.variant() {
            UrlVariant::Local => Ok(Path::new(url.to_native()).is_dir()),
            UrlVariant::Dfs => {
                let status = Command::new(&self.config.dfs_binary)
                    .args(["fs", "-test", "-d", url.to_native()])
                    .status()
                    .await
                    .map_err(|e| UrlError::Transport {
                        url: url.to_display().to_string(),
                        source: Box::new(e),
                    })?;
                Ok(status.success())
            }
            UrlVariant::ObjectStore => Ok(url.to_display().ends_with('/')),
            UrlVariant::Http | UrlVariant::Ftp => Err(UrlError::NotSupported(
                "is_dir on http/ftp urls".to_string(),
            )),
        }
    }

    async fn put(&self, local: &Path, url: &Url) -> Result<(), UrlError> {
        if !local.exists() {
            return Err(UrlError::NotFound(local.display().to_string()));
        }
        match url.variant() {
            UrlVariant::Local => {
                if let Some(parent) = Path::new(url.to_native()).parent() {
                    std::fs::create_dir_all(parent).map_err(|e| UrlError::Transport {
                        url: url.to_display().to_string(),
                        source: Box::new(e),
                    })?;
                }
                std::fs::copy(local, url.to_native()).map_err(|e| UrlError::Transport {
                    url: url.to_display().to_string(),
                    source: Box::new(e),
                })?;
                Ok(())
            }
            UrlVariant::ObjectStore => {
                let mut cmd = Command::new("s3cmd");
                if let Some(cfg) = &self.config.object_store_config {
                    cmd.arg("-c").arg(cfg);
                }
                cmd.arg("sync");
                if self.config.object_store_public_acl {
                    cmd.arg("--acl-public");
                }
                cmd.arg(local).arg(url.to_native());
                self.run(cmd, &format!("s3cmd sync to {}", url.to_display()))
                    .await
            }
            UrlVariant::Http | UrlVariant::Ftp => Err(UrlError::NotSupported(
                "uploading to http/ftp urls".to_string(),
            )),
            UrlVariant::Dfs => {
                let dest = url.join(
                    local
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                        .as_str(),
                );
                let mut cmd = Command::new(&self.config.dfs_binary);
                cmd.args(["fs", "-put"]).arg(local).arg(dest.to_native());
                self.run(cmd, &format!("hadoop fs -put to {}", url.to_display()))
                    .await
            }
        }
    }

    async fn get(&self, url: &Url, dest_dir: &Path) -> Result<(), UrlError> {
        std::fs::create_dir_all(dest_dir).map_err(|e| UrlError::Transport {
            url: url.to_display().to_string(),
            source: Box::new(e),
        })?;
        match url.variant() {
            UrlVariant::Local => {
                let dest = dest_dir.join(url.basename());
                std::fs::copy(url.to_native(), &dest).map_err(|e| UrlError::Transport {
                    url: url.to_display().to_string(),
                    source: Box::new(e),
                })?;
                Ok(())
            }
            UrlVariant::ObjectStore => {
                let mut cmd = Command::new("s3cmd");
                if let Some(cfg) = &self.config.object_store_config {
                    cmd.arg("-c").arg(cfg);
                }
                cmd.arg("get").arg(url.to_native()).arg(dest_dir);
                self.run(cmd, &format!("s3cmd get {}", url.to_display()))
                    .await
            }
            UrlVariant::Http | UrlVariant::Ftp => {
                let mut cmd = Command::new("curl");
                cmd.current_dir(dest_dir)
                    .arg("-O")
                    .args(["--retry", &self.config.curl_retries.to_string()])
                    .args([
                        "--connect-timeout",
                        &self.config.curl_connect_timeout.as_secs().to_string(),
                    ])
                    .arg(url.to_native());
                self.run(cmd, &format!("curl get {}", url.to_display()))
                    .await
            }
            UrlVariant::Dfs => {
                let mut cmd = Command::new(&self.config.dfs_binary);
                cmd.args(["fs", "-get"]).arg(url.to_native()).arg(dest_dir);
                self.run(cmd, &format!("hadoop fs -get {}", url.to_display()))
                    .await
            }
        }
    }

    async fn remove_dir(&self, url: &Url) -> Result<(), UrlError> {
        match url.variant() {
            UrlVariant::Local => {
                if Path::new(url.to_native()).exists() {
                    std::fs::remove_dir_all(url.to_native()).map_err(|e| UrlError::Transport {
                        url: url.to_display().to_string(),
                        source: Box::new(e),
                    })?;
                }
                Ok(())
            }
            UrlVariant::Dfs => {
                let mut cmd = Command::new(&self.config.dfs_binary);
                cmd.args(["fs", "-rm", "-r", "-f"]).arg(url.to_native());
                self.run(cmd, &format!("hadoop fs -rm -r {}", url.to_display()))
                    .await
            }
            UrlVariant::ObjectStore => {
                let mut cmd = Command::new("s3cmd");
                if let Some(cfg) = &self.config.object_store_config {
                    cmd.arg("-c").arg(cfg);
                }
                cmd.args(["del", "--recursive", "--force"]).arg(url.to_native());
                self.run(cmd, &format!("s3cmd del {}", url.to_display()))
                    .await
            }
            UrlVariant::Http | UrlVariant::Ftp => Err(UrlError::NotSupported(
                "remove_dir on http/ftp urls".to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;

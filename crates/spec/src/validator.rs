// SPDX-License-Identifier: MIT

//! The config validator: a single pass that accumulates every error before
//! aborting, except the two immediate-raise checks (object-store
//! credentials, missing HTTP client) that would otherwise make the rest of
//! the pass meaningless.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use railrna_core::{Url, UrlBackend, UrlVariant};

use crate::manifest::{parse_manifest, Manifest, ManifestError};
use crate::protostep::{ProtoStep, ProtoStepError};

/// Which execution backend a run targets — determines which `UrlVariant`s
/// are legal for the output location and which executable paths are
/// substituted by known-good worker-image defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Parallel,
    Cluster,
}

/// One external dependency the validator must confirm is runnable: either
/// an aligner/index-builder/compressor binary, or the reference index for
/// a given basename.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub name: String,
    pub user_supplied_path: Option<String>,
}

/// A reference index, identified by basename plus the full set of file
/// extensions that must all exist for the index to be usable.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub basename: Url,
    pub required_extensions: Vec<String>,
}

/// The full set of user-supplied configuration the validator checks.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub backend: Backend,
    pub manifest_text: Option<String>,
    pub manifest_source: String,
    pub output: Url,
    pub force: bool,
    pub preprocess_mode: bool,
    pub num_processes: i64,
    pub max_task_attempts: i64,
    pub gzip_intermediates: bool,
    pub gzip_level: i64,
    pub sort_memory_cap: Option<f64>,
    pub dependencies: Vec<Dependency>,
    pub indexes: Vec<IndexSpec>,
    pub path_dirs: Vec<String>,
    pub uses_object_store: bool,
    pub has_credentials: bool,
    pub has_http_client: bool,
}

/// Every accumulated validation failure. `Display` renders the exact
/// "naming the flag" wording the end-to-end scenarios require.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Manifest file {path} does not exist")]
    ManifestNotFound { path: String },

    #[error("{0}")]
    Manifest(String),

    #[error("{0}")]
    Protostep(String),

    #[error("output location {url} is not a valid destination for the {backend} backend")]
    OutputVariantMismatch { url: String, backend: String },

    #[error("output directory {url} already exists; pass --force to overwrite")]
    OutputExistsWithoutForce { url: String },

    #[error("asset {url} named by the manifest does not exist")]
    AssetMissing { url: String },

    #[error("dependency {name:?} is not executable and no same-named binary was found on PATH")]
    ExecutableMissing { name: String },

    #[error("reference index {basename:?} is missing required file {extension}")]
    IndexFileMissing { basename: String, extension: String },

    #[error("num-processes must be an integer >= 1, but {0} was entered")]
    NumProcesses(i64),

    #[error("max-task-attempts must be an integer greater than 0, but {0} was entered")]
    MaxTaskAttempts(i64),

    #[error("gzip-level must be an integer in [1, 9], but {0} was entered")]
    GzipLevel(i64),

    #[error("sort-memory-cap must be a positive number, but {0} was entered")]
    SortMemoryCap(f64),
}

impl From<ManifestError> for ConfigError {
    fn from(e: ManifestError) -> Self {
        ConfigError::Manifest(e.to_string())
    }
}

impl From<ProtoStepError> for ConfigError {
    fn from(e: ProtoStepError) -> Self {
        ConfigError::Protostep(e.to_string())
    }
}

/// A check that must succeed before the rest of the validator can run at
/// all: without credentials the object-store backend can't even attempt
/// `exists` checks; without a curl-equivalent client HTTP/FTP assets can
/// never be probed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error(
        "no object-store credentials found in the environment or the selected profile; \
         set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY or add a profile section to the config file"
    )]
    MissingCredentials,

    #[error("no HTTP client (curl or equivalent) is available; install curl and retry")]
    MissingHttpClient,
}

/// Outcome of a validator pass: empty `errors` means the config is usable.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigError>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Backend::Local => "local",
            Backend::Parallel => "parallel",
            Backend::Cluster => "cluster",
        };
        write!(f, "{s}")
    }
}

/// Runs the ordered, mostly-accumulating check list of spec §4.2 against a
/// [`RunConfig`], consulting a [`UrlBackend`] for every existence check so
/// the same validator works against local paths, object-store, DFS, and
/// HTTP/FTP assets alike.
pub struct Validator<'a> {
    backend: &'a dyn UrlBackend,
}

impl<'a> Validator<'a> {
    pub fn new(backend: &'a dyn UrlBackend) -> Self {
        Self { backend }
    }

    /// Runs the two immediate-raise checks. Called before [`Validator::validate`]
    /// so the caller can short-circuit before the accumulating pass even starts.
    pub fn check_environment(&self, cfg: &RunConfig) -> Result<(), EnvironmentError> {
        if cfg.uses_object_store && !cfg.has_credentials {
            return Err(EnvironmentError::MissingCredentials);
        }
        let manifest_needs_http = cfg
            .manifest_text
            .as_deref()
            .map(|t| t.contains("http://") || t.contains("https://") || t.contains("ftp://"))
            .unwrap_or(false);
        if (manifest_needs_http || cfg.output.is_curlable()) && !cfg.has_http_client {
            return Err(EnvironmentError::MissingHttpClient);
        }
        Ok(())
    }

    /// Runs the accumulating checks 1-6 of spec §4.2 (credentials are check
    /// 7 but are handled immediately by [`Validator::check_environment`]
    /// before this is ever called).
    pub async fn validate(&self, cfg: &RunConfig, protosteps: &[ProtoStep]) -> (ValidationReport, Option<Arc<Manifest>>) {
        let mut errors = Vec::new();

        // Check 1: output location variant + force/existence.
        let output_ok = match cfg.backend {
            Backend::Cluster => cfg.output.is_object_store(),
            Backend::Local | Backend::Parallel => cfg.output.is_local() || cfg.output.is_object_store(),
        };
        if !output_ok {
            errors.push(ConfigError::OutputVariantMismatch {
                url: cfg.output.to_display().to_string(),
                backend: cfg.backend.to_string(),
            });
        } else if !cfg.force {
            if let Ok(true) = self.backend.exists(&cfg.output).await {
                errors.push(ConfigError::OutputExistsWithoutForce {
                    url: cfg.output.to_display().to_string(),
                });
            }
        }

        // Check 2: manifest reachable, shape, sample-label shape.
        let manifest = match &cfg.manifest_text {
            None => {
                errors.push(ConfigError::ManifestNotFound {
                    path: cfg.manifest_source.clone(),
                });
                None
            }
            Some(text) => {
                let (manifest, manifest_errors) = parse_manifest(text);
                errors.extend(manifest_errors.into_iter().map(ConfigError::from));
                Some(manifest)
            }
        };

        // Check 3 (preprocess mode only): every manifest asset exists.
        if cfg.preprocess_mode {
            if let Some(manifest) = &manifest {
                for url in manifest.all_urls() {
                    match self.backend.exists(url).await {
                        Ok(true) => {}
                        _ => errors.push(ConfigError::AssetMissing {
                            url: url.to_display().to_string(),
                        }),
                    }
                }
            }
        }

        // Check 4: executables on PATH or user-supplied path.
        for dep in &cfg.dependencies {
            let ok = match (&dep.user_supplied_path, cfg.backend) {
                (_, Backend::Cluster) => true, // known-good absolute paths baked into the worker image
                (Some(path), _) => is_executable_file(path),
                (None, _) => on_path(&dep.name, &cfg.path_dirs),
            };
            if !ok {
                errors.push(ConfigError::ExecutableMissing {
                    name: dep.name.clone(),
                });
            }
        }

        // Check 5: index files.
        for index in &cfg.indexes {
            for ext in &index.required_extensions {
                let candidate = Url::parse(format!("{}.{}", index.basename.to_display(), ext));
                match self.backend.exists(&candidate).await {
                    Ok(true) => {}
                    _ => errors.push(ConfigError::IndexFileMissing {
                        basename: index.basename.to_display().to_string(),
                        extension: ext.clone(),
                    }),
                }
            }
        }

        // Check 6: numeric parameters.
        if cfg.num_processes < 1 {
            errors.push(ConfigError::NumProcesses(cfg.num_processes));
        }
        if cfg.max_task_attempts < 1 {
            errors.push(ConfigError::MaxTaskAttempts(cfg.max_task_attempts));
        }
        if cfg.gzip_intermediates && !(1..=9).contains(&cfg.gzip_level) {
            errors.push(ConfigError::GzipLevel(cfg.gzip_level));
        }
        if let Some(cap) = cfg.sort_memory_cap {
            if cap <= 0.0 {
                errors.push(ConfigError::SortMemoryCap(cap));
            }
        }

        // Protostep-level invariants (P <= K, flag mutual exclusion).
        for step in protosteps {
            errors.extend(step.validate().into_iter().map(ConfigError::from));
        }

        (ValidationReport { errors }, manifest.map(Manifest::into_shared))
    }
}

fn is_executable_file(path: &str) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        std::path::Path::new(path).is_file()
    }
}

fn on_path(name: &str, path_dirs: &[String]) -> bool {
    let seen: HashSet<&str> = path_dirs.iter().map(String::as_str).collect();
    seen.iter().any(|dir| {
        let candidate = format!("{dir}/{name}");
        is_executable_file(&candidate)
    })
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

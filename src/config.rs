//! Configuration model for zfsman.
//!
//! A config file is optional. YAML is the default format; a `.json` extension
//! switches to JSON. Environment variables override the file, and CLI flags
//! override both (applied by the binary).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{ZfsError, ZfsResult};
use crate::zfs::{OutcomePolicy, ResourceMode, SuccessDetection, SystemRunner};

pub const CONFIG_ENV: &str = "ZFSMAN_CONFIG";
pub const ZFS_ENV: &str = "ZFSMAN_ZFS";
pub const ZPOOL_ENV: &str = "ZFSMAN_ZPOOL";
pub const MODE_ENV: &str = "ZFSMAN_MODE";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Command line for `zfs`, e.g. `sudo -n /usr/sbin/zfs`.
    pub zfs: Option<String>,
    /// Command line for `zpool`.
    pub zpool: Option<String>,
    /// Upper bound per command; `0` waits forever.
    pub timeout_secs: u64,
    pub success: SuccessDetection,
    /// Extra exact stderr payloads to treat as an empty result.
    pub benign_stderr: Vec<String>,
    pub default_mode: ResourceMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zfs: None,
            zpool: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            success: SuccessDetection::default(),
            benign_stderr: Vec::new(),
            default_mode: ResourceMode::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> ZfsResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            ZfsError::Config(format!("unable to read {}: {err}", path.display()))
        })?;
        Self::parse(&contents, path)
    }

    /// Parse file contents; `origin` picks the format and labels errors.
    pub fn parse(contents: &str, origin: &Path) -> ZfsResult<Self> {
        let is_json = matches!(
            origin.extension().and_then(|ext| ext.to_str()),
            Some(ext) if ext.eq_ignore_ascii_case("json")
        );
        let parsed = if is_json {
            serde_json::from_str::<Self>(contents).map_err(|err| err.to_string())
        } else if contents.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_yaml::from_str::<Self>(contents).map_err(|err| err.to_string())
        };
        parsed.map_err(|err| ZfsError::Config(format!("{}: {err}", origin.display())))
    }

    /// Explicit path, else `ZFSMAN_CONFIG`, else defaults; then env overrides.
    pub fn discover(explicit: Option<&Path>) -> ZfsResult<Self> {
        let path = explicit.map(Path::to_path_buf).or_else(|| {
            std::env::var_os(CONFIG_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        let mut cfg = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::load(&path)?
            }
            None => Self::default(),
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) -> ZfsResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; blank values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> ZfsResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(zfs) = get(ZFS_ENV) {
            self.zfs = Some(zfs);
        }
        if let Some(zpool) = get(ZPOOL_ENV) {
            self.zpool = Some(zpool);
        }
        if let Some(raw) = get(MODE_ENV) {
            self.default_mode = ResourceMode::from_str_ci(&raw)
                .ok_or_else(|| ZfsError::Config(format!("{MODE_ENV}: unknown mode '{raw}'")))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn outcome_policy(&self) -> OutcomePolicy {
        OutcomePolicy::default()
            .with_detection(self.success)
            .with_benign(self.benign_stderr.iter().cloned())
    }

    /// Runner with the configured command lines and bound.
    pub fn runner(&self) -> ZfsResult<SystemRunner> {
        let mut runner = SystemRunner::new().with_timeout(self.timeout());
        if let Some(raw) = &self.zfs {
            runner = runner.with_zfs(split_command(raw)?)?;
        }
        if let Some(raw) = &self.zpool {
            runner = runner.with_zpool(split_command(raw)?)?;
        }
        Ok(runner)
    }
}

/// Shell-style split of a configured command line (quotes honoured, nothing expanded).
pub fn split_command(raw: &str) -> ZfsResult<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ZfsError::Config("command line is empty".into()));
    }
    let parts = shell_words::split(trimmed)
        .map_err(|err| ZfsError::Config(format!("cannot parse command line '{raw}': {err}")))?;
    match parts.first() {
        Some(program) if !program.is_empty() => Ok(parts),
        _ => Err(ZfsError::Config(format!(
            "empty program name in command line '{raw}'"
        ))),
    }
}

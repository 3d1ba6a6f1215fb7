//! Execution of `zfs`/`zpool` commands.
//!
//! Commands run as child processes with a discrete argument vector (no shell).
//! Output is captured to completion before returning; an optional bound turns a
//! hung tool into `ZfsError::Timeout` instead of blocking forever.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ZfsError, ZfsResult};
use crate::zfs::command::CommandSpec;
use crate::zfs::mode::Tool;

/// Stderr that `zfs list` prints when a type filter matches nothing.
pub const NO_DATASETS_MARKER: &str = "no datasets available\n";

pub const KNOWN_ZFS_PATHS: &[&str] = &[
    "/usr/sbin/zfs",
    "/sbin/zfs",
    "/bin/zfs",
    "/usr/local/sbin/zfs",
];
pub const KNOWN_ZPOOL_PATHS: &[&str] = &[
    "/usr/sbin/zpool",
    "/sbin/zpool",
    "/bin/zpool",
    "/usr/local/sbin/zpool",
];

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Seam between the dispatcher and the operating system.
pub trait ProcessRunner {
    /// Run to completion. A non-zero exit is not an error at this level.
    fn run(&self, spec: &CommandSpec) -> ZfsResult<ExecutionResult>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, spec: &CommandSpec) -> ZfsResult<ExecutionResult> {
        (**self).run(spec)
    }
}

/* ---- Outcome classification ---- */

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SuccessDetection {
    /// Any stderr outside the allow-list is a failure, whatever the exit code.
    #[default]
    Stderr,
    /// Exit status 0 is success; stderr is only used as the failure message.
    ExitCode,
}

/// Decides whether an `ExecutionResult` counts as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomePolicy {
    pub detection: SuccessDetection,
    /// Exact stderr payloads treated as an empty, successful result.
    pub benign_stderr: Vec<String>,
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        Self {
            detection: SuccessDetection::Stderr,
            benign_stderr: vec![NO_DATASETS_MARKER.to_string()],
        }
    }
}

impl OutcomePolicy {
    /// Extend the allow-list; the built-in marker is always kept.
    pub fn with_benign<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for s in extra {
            let s = s.into();
            if !self.benign_stderr.contains(&s) {
                self.benign_stderr.push(s);
            }
        }
        self
    }

    pub fn with_detection(mut self, detection: SuccessDetection) -> Self {
        self.detection = detection;
        self
    }

    pub fn is_benign(&self, stderr: &str) -> bool {
        self.benign_stderr.iter().any(|b| b == stderr)
    }

    pub fn check(&self, spec: &CommandSpec, result: &ExecutionResult) -> ZfsResult<()> {
        let failed = match self.detection {
            SuccessDetection::Stderr => {
                !result.stderr.is_empty() && !self.is_benign(&result.stderr)
            }
            SuccessDetection::ExitCode => !result.exited_cleanly(),
        };
        if !failed {
            return Ok(());
        }

        let stderr = if result.stderr.trim().is_empty() {
            match result.exit_code {
                Some(code) => format!("exited with code {code}"),
                None => "terminated by signal".to_string(),
            }
        } else {
            result.stderr.clone()
        };
        warn!(command = %spec, exit_code = ?result.exit_code, "command reported an error");
        Err(ZfsError::CommandFailed {
            command: spec.to_string(),
            stderr,
        })
    }
}

/* ---- System runner ---- */

/// Runs commands on the host, mapping `zfs`/`zpool` to configured command lines.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    zfs: Vec<String>,
    zpool: Vec<String>,
    timeout: Option<Duration>,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRunner {
    /// Probe well-known sbin locations, falling back to a PATH lookup.
    pub fn new() -> Self {
        Self {
            zfs: vec![detect_binary(KNOWN_ZFS_PATHS, "zfs")],
            zpool: vec![detect_binary(KNOWN_ZPOOL_PATHS, "zpool")],
            timeout: None,
        }
    }

    /// Command line used for `zfs` (program followed by leading arguments).
    pub fn with_zfs(mut self, command: Vec<String>) -> ZfsResult<Self> {
        self.zfs = non_empty_command(command, Tool::Zfs)?;
        Ok(self)
    }

    pub fn with_zpool(mut self, command: Vec<String>) -> ZfsResult<Self> {
        self.zpool = non_empty_command(command, Tool::Zpool)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn command_for(&self, tool: Tool) -> &[String] {
        match tool {
            Tool::Zfs => &self.zfs,
            Tool::Zpool => &self.zpool,
        }
    }

    /// Final program + args for a spec.
    fn resolve(&self, spec: &CommandSpec) -> (String, Vec<String>) {
        let prefix: &[String] = match spec.tool() {
            Some(tool) => self.command_for(tool),
            None => &spec.argv()[..spec.argv().len().min(1)],
        };
        let mut full = prefix.iter().cloned().chain(spec.args().iter().cloned());
        let program = full.next().unwrap_or_default();
        (program, full.collect())
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> ZfsResult<ExecutionResult> {
        let (program, args) = self.resolve(spec);
        if program.is_empty() {
            return Err(ZfsError::Config("empty command".into()));
        }
        debug!(command = %spec, program = %program, "running");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| ZfsError::Spawn {
                program: program.clone(),
                source,
            })?;

        runtime.block_on(async {
            let child = tokio::process::Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| ZfsError::Spawn {
                    program: program.clone(),
                    source,
                })?;

            let waited = match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                    Ok(waited) => waited,
                    Err(_) => {
                        // Dropping the future drops the child, which kills it.
                        warn!(command = %spec, ?limit, "command timed out");
                        return Err(ZfsError::Timeout {
                            command: spec.to_string(),
                            timeout: limit,
                        });
                    }
                },
                None => child.wait_with_output().await,
            };
            let output = waited.map_err(|source| ZfsError::Spawn {
                program: program.clone(),
                source,
            })?;

            let result = ExecutionResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
            };
            debug!(
                command = %spec,
                exit_code = ?result.exit_code,
                stdout_bytes = result.stdout.len(),
                stderr_bytes = result.stderr.len(),
                "finished"
            );
            Ok::<_, ZfsError>(result)
        })
    }
}

fn non_empty_command(command: Vec<String>, tool: Tool) -> ZfsResult<Vec<String>> {
    match command.first() {
        Some(program) if !program.trim().is_empty() => Ok(command),
        _ => Err(ZfsError::Config(format!("empty command line for {tool}"))),
    }
}

/// First existing candidate, else the bare name for a PATH lookup.
pub fn detect_binary(candidates: &[&str], fallback: &str) -> String {
    candidates
        .iter()
        .find(|c| Path::new(c).exists())
        .map(|c| (*c).to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/* ---- Tests ---- */

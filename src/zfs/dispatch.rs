//! Mode-aware action dispatcher.
//!
//! Holds the current [`ResourceMode`] and turns requests into
//! build -> run -> classify -> parse pipelines. The dispatcher is the single
//! source of truth for displayed data: a successful mutation is always followed
//! by a fresh listing of the mode that was active when it ran, and the
//! mutation's own stdout is discarded.

use tracing::{debug, info};

use crate::error::{ZfsError, ZfsResult};
use crate::zfs::command::{self, Capability, CommandSpec, UserInput};
use crate::zfs::mode::{Action, ResourceMode};
use crate::zfs::runner::{ExecutionResult, OutcomePolicy, ProcessRunner};
use crate::zfs::table::{self, Table};

/// Everything the shell collected for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    /// Selected resource name; empty when nothing is selected.
    pub target: String,
    pub input: UserInput,
    /// The operator answered yes to a confirmation prompt.
    pub confirmed: bool,
}

impl ActionRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            target: String::new(),
            input: UserInput::None,
            confirmed: false,
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn input(mut self, input: UserInput) -> Self {
        self.input = input;
        self
    }

    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }
}

#[derive(Debug)]
pub struct ActionDispatcher<R> {
    runner: R,
    mode: ResourceMode,
    policy: OutcomePolicy,
}

impl<R: ProcessRunner> ActionDispatcher<R> {
    /// Starts in `ResourceMode::Dataset` with the default outcome policy.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            mode: ResourceMode::default(),
            policy: OutcomePolicy::default(),
        }
    }

    /// Initial mode, set without listing.
    pub fn with_mode(mut self, mode: ResourceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: OutcomePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> ResourceMode {
        self.mode
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Enabled actions for the current mode.
    pub fn capabilities(&self) -> Vec<Capability> {
        command::capabilities(self.mode)
    }

    /// Switch mode and list it. The mode only changes if the listing succeeds.
    pub fn select_mode(&mut self, mode: ResourceMode) -> ZfsResult<Table> {
        let table = self.list(mode)?;
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, "mode selected");
        }
        self.mode = mode;
        Ok(table)
    }

    /// Re-list the current mode.
    pub fn refresh(&self) -> ZfsResult<Table> {
        self.list(self.mode)
    }

    pub fn perform(&mut self, request: &ActionRequest) -> ZfsResult<Table> {
        match request.action {
            Action::List => self.refresh(),
            Action::GetProperties => self.properties(&request.target),
            _ => self.mutate(request),
        }
    }

    /// `get all` for one object, split on double-space runs. Never re-lists.
    pub fn properties(&self, target: &str) -> ZfsResult<Table> {
        let spec = command::build(
            self.mode,
            Action::GetProperties,
            target,
            &UserInput::None,
        )?;
        let output = self.execute(&spec)?;
        Ok(table::parse_double_space(&output.stdout))
    }

    fn list(&self, mode: ResourceMode) -> ZfsResult<Table> {
        let spec = command::list_command(mode);
        let output = self.execute(&spec)?;
        Ok(table::parse_whitespace(&output.stdout))
    }

    fn mutate(&mut self, request: &ActionRequest) -> ZfsResult<Table> {
        let mode = self.mode;
        let action = request.action;
        let cap = command::capability(mode, action).ok_or(ZfsError::Unsupported { mode, action })?;
        let spec = command::build(mode, action, &request.target, &request.input)?;
        if cap.confirm && !request.confirmed {
            return Err(ZfsError::NotConfirmed { action });
        }

        info!(%mode, %action, command = %spec, "running mutating action");
        self.execute(&spec)?;
        self.list(mode)
    }

    fn execute(&self, spec: &CommandSpec) -> ZfsResult<ExecutionResult> {
        let output = self.runner.run(spec)?;
        self.policy.check(spec, &output)?;
        Ok(output)
    }
}

/* ---- Tests ---- */

//! Core of zfsman: capability table, command building, execution and parsing.
//!
//! `command` and `table` are pure; `runner` isolates process execution so the
//! `dispatch` pipeline stays testable with a scripted runner.

pub mod command;
pub mod dispatch;
pub mod mode;
pub mod runner;
pub mod table;

pub use command::{Capability, CommandSpec, UserInput, capabilities, capability, suggested_input};
pub use dispatch::{ActionDispatcher, ActionRequest};
pub use mode::{Action, ResourceMode, Tool};
pub use runner::{
    ExecutionResult, NO_DATASETS_MARKER, OutcomePolicy, ProcessRunner, SuccessDetection,
    SystemRunner,
};
pub use table::{Splitter, Table};

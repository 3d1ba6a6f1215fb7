/*!
Subcommand modules for the `zfsman` binary.

Layout:
  src/cmd/
    mod.rs      (this file)
    list.rs     (ListArgs    + execute_list)
    get.rs      (GetArgs     + execute_get)
    exec.rs     (ExecArgs    + execute_exec)
    actions.rs  (ActionsArgs + execute_actions)
    shared.rs   (config overrides, dispatcher construction, prompts, output)
    format.rs   (boxes / tables / colors for human output)

Conventions:
  - Each subcommand module exposes exactly one public `execute_*` function
    that returns `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and are kept minimal.
  - All process execution goes through the library's `ActionDispatcher`.
*/

pub mod actions;
pub mod exec;
pub mod format;
pub mod get;
pub mod list;
pub mod shared;

pub use actions::{ActionsArgs, execute_actions};
pub use exec::{ExecArgs, execute_exec};
pub use get::{GetArgs, execute_get};
pub use list::{ListArgs, execute_list};

/*!
`exec.rs`

`zfsman exec <MODE> <ACTION> [TARGET] [--name TEXT] [--size SIZE] [--yes] [--interactive] [--json]`

Runs one action from the capability table against the selected object.

  - TARGET is the selected object. With `--interactive` and no TARGET the mode
    is listed and the object is picked from a numbered menu.
  - `--name` / `--size` supply the free-form text. With `--interactive` any
    missing value is prompted for, pre-filled the way the selection suggests
    (`tank/data@` for a snapshot of `tank/data`, and so on).
  - Destroy, promote and rollback need an explicit yes: `--yes`, or an answer
    to the y/N prompt. Without it nothing is run.
  - After a successful mutation the current mode is listed again and that
    listing is what gets printed.

Prompts are written to stderr so `--json` output on stdout stays parseable.

JSON success output:
{
  "status": "ok",
  "mode": "dataset",
  "action": "destroy",
  "target": "tank/data",
  "command": "zfs destroy tank/data",
  "elapsed_ms": 31,
  "columns": [...],
  "rows": [...]
}
*/

use anyhow::Result;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use zfsman::zfs::command::build;
use zfsman::zfs::{
    Action, ActionDispatcher, ActionRequest, Capability, ProcessRunner, ResourceMode, UserInput,
    capability, suggested_input,
};
use zfsman::{Config, ZfsError};

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji};
use crate::cmd::shared::{
    confirm, dispatcher, emit_json, mode_title, output_error, print_table, prompt_line,
    select_name, table_payload,
};

/* -------------------------------------------------------------------------- */
/* Argument Struct                                                            */
/* -------------------------------------------------------------------------- */

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Resource mode the action applies to
    #[arg(value_enum)]
    pub mode: ResourceMode,

    /// Action to run
    #[arg(value_enum)]
    pub action: Action,

    /// Selected object (dataset, snapshot, volume or pool name)
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// New name / snapshot name / clone name, used verbatim
    #[arg(short = 'n', long = "name", value_name = "TEXT")]
    pub name: Option<String>,

    /// Volume size for `volume create` (e.g. 10G)
    #[arg(short = 's', long, value_name = "SIZE")]
    pub size: Option<String>,

    /// Answer yes to the confirmation for destroy / promote / rollback
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Prompt for a missing target or text
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

/* -------------------------------------------------------------------------- */
/* Public Entry Point                                                         */
/* -------------------------------------------------------------------------- */

pub fn execute_exec(args: ExecArgs, cfg: &Config) -> Result<()> {
    let (mode, action) = (args.mode, args.action);
    let Some(cap) = capability(mode, action) else {
        return output_error(
            args.json,
            "Exec Error",
            ZfsError::Unsupported { mode, action }.into(),
        );
    };

    let mut dispatcher = match dispatcher(cfg, mode) {
        Ok(d) => d,
        Err(e) => return output_error(args.json, "Exec Error", e),
    };

    let request = {
        let mut stdin = io::stdin().lock();
        let mut stderr = io::stderr();
        gather_request(&args, &cap, &dispatcher, &mut stdin, &mut stderr)
    };
    let request = match request {
        Ok(req) => req,
        Err(e) => return output_error(args.json, "Exec Error", e),
    };
    let command = build(mode, action, &request.target, &request.input)
        .map(|spec| spec.to_string())
        .unwrap_or_default();

    let started = Instant::now();
    let table = match dispatcher.perform(&request) {
        Ok(table) => table,
        Err(e) => return output_error(args.json, "Exec Error", e.into()),
    };
    let elapsed_ms = started.elapsed().as_millis();

    if args.json {
        let mut payload = table_payload(mode, &table, elapsed_ms);
        if let serde_json::Value::Object(ref mut map) = payload {
            map.insert("action".into(), serde_json::json!(action));
            map.insert("target".into(), serde_json::json!(request.target));
            map.insert("command".into(), serde_json::json!(command));
        }
        emit_json(&payload);
        return Ok(());
    }

    let style = StyleOptions::detect();
    let subject = if request.target.is_empty() {
        action.to_string()
    } else {
        format!("{action} {}", request.target)
    };
    let header = box_header(
        color(
            Role::Success,
            format!("{} Exec Success ({subject})", emoji("success", &style)),
            &style,
        ),
        Some(format!("{command} • {elapsed_ms} ms")),
        &style,
    );
    println!("{header}");
    if action.is_mutating() {
        println!(
            "{}",
            color(Role::Accent, format!("{} now:", mode_title(mode)), &style)
        );
    }
    print_table(&table, &format!("No {mode}s found"), &style);
    Ok(())
}

/* -------------------------------------------------------------------------- */
/* Request Assembly                                                           */
/* -------------------------------------------------------------------------- */

/// Turn flags (plus prompts, when interactive) into a dispatcher request.
///
/// Validation beyond "ask for what is missing" is left to the dispatcher, so
/// a non-interactive call with missing pieces fails there without running
/// anything.
fn gather_request<R, I, W>(
    args: &ExecArgs,
    cap: &Capability,
    dispatcher: &ActionDispatcher<R>,
    input: &mut I,
    out: &mut W,
) -> Result<ActionRequest>
where
    R: ProcessRunner,
    I: BufRead,
    W: Write,
{
    let (mode, action) = (cap.mode, cap.action);

    let mut target = args.target.clone().unwrap_or_default();
    if uses_selection(cap) && target.trim().is_empty() && args.interactive {
        let listing = dispatcher.refresh()?;
        let names = listing.column_values("NAME");
        target = select_name(input, out, &mode.to_string(), &names)?;
    }

    let name = if cap.needs_input() {
        match &args.name {
            Some(name) => Some(name.clone()),
            None if args.interactive => {
                let default = suggested_input(mode, action, &target);
                let label = cap.prompt.unwrap_or("name");
                prompt_line(input, out, label, default.as_deref())?
            }
            None => None,
        }
    } else {
        None
    };

    let size = if cap.needs_size() {
        match &args.size {
            Some(size) => Some(size.clone()),
            None if args.interactive => prompt_line(input, out, "volume size", None)?,
            None => None,
        }
    } else {
        None
    };

    let user_input = match (name, size) {
        (Some(name), Some(size)) => UserInput::Volume { name, size },
        (Some(name), None) if cap.needs_size() => UserInput::Volume {
            name,
            size: String::new(),
        },
        (Some(name), None) => UserInput::Name(name),
        (None, _) => UserInput::None,
    };

    let mut confirmed = args.yes;
    if cap.confirm && !confirmed {
        // Only ask when the command would actually be built.
        if let Ok(spec) = build(mode, action, &target, &user_input) {
            confirmed = confirm(input, out, &format!("Run `{spec}`?"))?;
        }
    }

    Ok(ActionRequest::new(action)
        .target(target)
        .input(user_input)
        .confirmed(confirmed))
}

/// The action reads the selected object, either as its target or to
/// pre-fill its prompt (`tank/data@` when snapshotting `tank/data`).
fn uses_selection(cap: &Capability) -> bool {
    cap.needs_target() || suggested_input(cap.mode, cap.action, "-").is_some()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */

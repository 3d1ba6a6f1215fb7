/*!
shared.rs

Helpers reused by the `list`, `get`, `exec` and `actions` subcommands.

Current contents:
  - GlobalOpts: global CLI overrides layered on top of `Config`
  - dispatcher(): build an `ActionDispatcher` from the effective config
  - prompt_line() / confirm() / select_name(): stdin prompts (written to stderr
    so JSON on stdout stays clean)
  - compose_with_default(): pre-filled prompt semantics
  - output_error() / emit_json() / table_payload(): output plumbing
*/

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use zfsman::zfs::{ActionDispatcher, ResourceMode, SystemRunner, Table};
use zfsman::{Config, ZfsError};

use crate::cmd::format::{Role, StyleOptions, TableOpts, box_header, color, emoji, table};

/* -------------------------------------------------------------------------- */
/* Config / Dispatcher                                                        */
/* -------------------------------------------------------------------------- */

/// Global flags that override the config file and environment.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub zfs: Option<String>,
    pub zpool: Option<String>,
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn load_config(&self) -> Result<Config> {
        let mut cfg = Config::discover(self.config.as_deref())?;
        self.apply(&mut cfg);
        Ok(cfg)
    }

    fn apply(&self, cfg: &mut Config) {
        if let Some(zfs) = self.zfs.as_ref().filter(|s| !s.trim().is_empty()) {
            cfg.zfs = Some(zfs.clone());
        }
        if let Some(zpool) = self.zpool.as_ref().filter(|s| !s.trim().is_empty()) {
            cfg.zpool = Some(zpool.clone());
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
    }
}

pub fn dispatcher(cfg: &Config, mode: ResourceMode) -> Result<ActionDispatcher<SystemRunner>> {
    Ok(ActionDispatcher::new(cfg.runner()?)
        .with_policy(cfg.outcome_policy())
        .with_mode(mode))
}

pub fn mode_title(mode: ResourceMode) -> &'static str {
    match mode {
        ResourceMode::Dataset => "Datasets",
        ResourceMode::Snapshot => "Snapshots",
        ResourceMode::Volume => "Volumes",
        ResourceMode::Pool => "Pools",
    }
}

/* -------------------------------------------------------------------------- */
/* Prompts                                                                    */
/* -------------------------------------------------------------------------- */

/// Resolve a prompt answer against its pre-filled value.
///
/// An empty answer accepts the default. When the default ends in `/` or `@`
/// and the answer carries neither, the answer is appended to it, so typing
/// `daily` at `tank/data@` yields `tank/data@daily`.
pub fn compose_with_default(default: Option<&str>, answer: &str) -> String {
    let answer = answer.trim_end_matches(['\r', '\n']);
    match default {
        Some(def) if answer.trim().is_empty() => def.to_string(),
        Some(def) if (def.ends_with('/') || def.ends_with('@')) && !answer.contains(['/', '@']) => {
            format!("{def}{answer}")
        }
        _ => answer.to_string(),
    }
}

/// Ask for one line of text. Re-asks on empty answers without a default;
/// `None` means input ended.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    default: Option<&str>,
) -> Result<Option<String>> {
    loop {
        match default {
            Some(def) => write!(out, "Enter {label} [{def}]: ")?,
            None => write!(out, "Enter {label}: ")?,
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }
        let value = compose_with_default(default, &line);
        if value.trim().is_empty() {
            writeln!(out, "  (value required)")?;
            continue;
        }
        return Ok(Some(value));
    }
}

/// y/N question; anything but `y`/`yes` (or end of input) is a no.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<bool> {
    write!(out, "{question} [y/N]: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Ok(false);
    }
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Numbered selection; a non-numeric answer is taken as the name itself.
pub fn select_name<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    what: &str,
    names: &[&str],
) -> Result<String> {
    if names.is_empty() {
        anyhow::bail!("no {what} to choose from");
    }
    writeln!(out, "Select a {what}:")?;
    for (i, name) in names.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, name)?;
    }
    write!(out, "Enter number (1-{}): ", names.len())?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();
    if let Ok(idx) = trimmed.parse::<usize>()
        && idx >= 1
        && idx <= names.len()
    {
        return Ok(names[idx - 1].to_string());
    }
    if trimmed.is_empty() {
        anyhow::bail!("invalid selection");
    }
    Ok(trimmed.to_string())
}

/* -------------------------------------------------------------------------- */
/* Output Helpers                                                             */
/* -------------------------------------------------------------------------- */

pub fn emit_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}

pub fn table_payload(mode: ResourceMode, table: &Table, elapsed_ms: u128) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "mode": mode,
        "elapsed_ms": elapsed_ms,
        "columns": table.columns,
        "rows": table.rows,
    })
}

/// Render a parsed table, or a dim placeholder when it is empty.
pub fn print_table(table_data: &Table, empty_msg: &str, style: &StyleOptions) {
    if table_data.is_empty() {
        println!(
            "{}",
            color(
                Role::Dim,
                format!("{} {empty_msg}", emoji("info", style)),
                style
            )
        );
        return;
    }
    let rendered = table(
        table_data.columns.as_slice(),
        &table_data.rows,
        TableOpts {
            max_width: style.term_width,
            ..TableOpts::default()
        },
        style,
    );
    println!("{rendered}");
}

/// Print the error (JSON or boxed) and return it as the command's failure.
pub fn output_error(json: bool, title: &str, err: anyhow::Error) -> Result<()> {
    let kind = err
        .downcast_ref::<ZfsError>()
        .map(|e| e.kind().as_str())
        .unwrap_or("execution");
    let msg = err.to_string();

    if json {
        emit_json(&serde_json::json!({"status":"error","kind":kind,"error":msg}));
    } else {
        let style = StyleOptions::detect();
        let heading = format!("{} {title}", emoji("error", &style));
        let boxed = box_header(heading, Some(color(Role::Error, &msg, &style)), &style);
        println!("{boxed}");
        if kind == "validation" {
            println!(
                "{} {}",
                emoji("info", &style),
                color(Role::Warning, "Nothing was run.", &style)
            );
        }
    }
    Err(err)
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */

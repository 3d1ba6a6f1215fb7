/*!
`list.rs`

`zfsman list [MODE] [--json]`

Lists the objects of one resource mode with the same command the dispatcher
uses for its post-mutation refresh. Without MODE the configured default mode
(`default_mode` / `ZFSMAN_MODE`) is used.

JSON success output:
{
  "status": "ok",
  "mode": "dataset",
  "elapsed_ms": 12,
  "columns": ["NAME", "USED", ...],
  "rows": [["tank", "1.2G", ...], ...]
}
*/

use anyhow::Result;
use clap::Args;
use std::time::Instant;

use zfsman::Config;
use zfsman::zfs::ResourceMode;
use zfsman::zfs::command::list_command;

use crate::cmd::format::{StyleOptions, box_header, emoji};
use crate::cmd::shared::{
    dispatcher, emit_json, mode_title, output_error, print_table, table_payload,
};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource mode to list (defaults to the configured mode)
    #[arg(value_enum)]
    pub mode: Option<ResourceMode>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(args: ListArgs, cfg: &Config) -> Result<()> {
    let mode = args.mode.unwrap_or(cfg.default_mode);
    let started = Instant::now();

    let listing = dispatcher(cfg, mode).and_then(|mut d| Ok(d.select_mode(mode)?));
    let table = match listing {
        Ok(table) => table,
        Err(e) => return output_error(args.json, "List Error", e),
    };
    let elapsed_ms = started.elapsed().as_millis();

    if args.json {
        emit_json(&table_payload(mode, &table, elapsed_ms));
        return Ok(());
    }

    let style = StyleOptions::detect();
    let tag = if mode == ResourceMode::Pool { "pool" } else { "list" };
    let header = box_header(
        format!(
            "{} {} ({})",
            emoji(tag, &style),
            mode_title(mode),
            table.rows.len()
        ),
        Some(format!("{} • {elapsed_ms} ms", list_command(mode))),
        &style,
    );
    println!("{header}");
    print_table(&table, &format!("No {mode}s found"), &style);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        list: ListArgs,
    }

    #[test]
    fn mode_is_optional() {
        let cli = TestCli::try_parse_from(["t"]).unwrap();
        assert_eq!(cli.list.mode, None);
        assert!(!cli.list.json);

        let cli = TestCli::try_parse_from(["t", "snapshot", "--json"]).unwrap();
        assert_eq!(cli.list.mode, Some(ResourceMode::Snapshot));
        assert!(cli.list.json);
    }

    #[test]
    fn unknown_mode_rejected() {
        assert!(TestCli::try_parse_from(["t", "bookmark"]).is_err());
    }
}

/*!
`get.rs`

`zfsman get <MODE> [NAME] [--json]`

Shows every property of one object (`zfs get all` / `zpool get all`). When NAME
is omitted the mode is listed and the object is picked interactively.
Property lookups never change anything, so nothing is re-listed afterwards.

JSON success output:
{
  "status": "ok",
  "mode": "dataset",
  "name": "tank/data",
  "elapsed_ms": 9,
  "columns": ["NAME", "PROPERTY", "VALUE", "SOURCE"],
  "rows": [...]
}
*/

use anyhow::Result;
use clap::Args;
use std::io;
use std::time::Instant;

use zfsman::Config;
use zfsman::zfs::{ActionDispatcher, ProcessRunner, ResourceMode};

use crate::cmd::format::{StyleOptions, box_header, emoji};
use crate::cmd::shared::{
    dispatcher, emit_json, output_error, print_table, select_name, table_payload,
};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Resource mode the object belongs to
    #[arg(value_enum)]
    pub mode: ResourceMode,

    /// Object name (prompts for a selection when omitted)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_get(args: GetArgs, cfg: &Config) -> Result<()> {
    let mode = args.mode;
    let dispatcher = match dispatcher(cfg, mode) {
        Ok(d) => d,
        Err(e) => return output_error(args.json, "Get Error", e),
    };

    let name = match args.name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(name) => name.to_string(),
        None => match pick_object(&dispatcher) {
            Ok(name) => name,
            Err(e) => return output_error(args.json, "Get Error", e),
        },
    };

    let started = Instant::now();
    let props = match dispatcher.properties(&name) {
        Ok(table) => table,
        Err(e) => return output_error(args.json, "Get Error", e.into()),
    };
    let elapsed_ms = started.elapsed().as_millis();

    if args.json {
        let mut payload = table_payload(mode, &props, elapsed_ms);
        if let serde_json::Value::Object(ref mut map) = payload {
            map.insert("name".into(), serde_json::Value::String(name));
        }
        emit_json(&payload);
        return Ok(());
    }

    let style = StyleOptions::detect();
    let header = box_header(
        format!("{} {name}", emoji("props", &style)),
        Some(format!("{mode} • {} properties • {elapsed_ms} ms", props.rows.len())),
        &style,
    );
    println!("{header}");
    print_table(&props, "No properties reported", &style);
    Ok(())
}

/// List the dispatcher's mode and let the operator choose one name.
fn pick_object<R: ProcessRunner>(dispatcher: &ActionDispatcher<R>) -> Result<String> {
    let listing = dispatcher.refresh()?;
    let names = listing.column_values("NAME");
    let what = dispatcher.mode().to_string();
    select_name(&mut io::stdin().lock(), &mut io::stderr(), &what, &names)
}

/*!
`actions.rs`

`zfsman actions [MODE] [--json]`

Prints the capability table: which actions each mode offers, the command
template they run, whether they need confirmation and what text they prompt
for. Nothing is executed. Without MODE every mode is shown.
*/

use anyhow::Result;
use clap::Args;

use zfsman::zfs::{Capability, ResourceMode, capabilities};

use crate::cmd::format::{Role, StyleOptions, TableOpts, box_header, color, emoji, table};
use crate::cmd::shared::{emit_json, mode_title};

#[derive(Args, Debug)]
pub struct ActionsArgs {
    /// Only show this mode
    #[arg(value_enum)]
    pub mode: Option<ResourceMode>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_actions(args: ActionsArgs) -> Result<()> {
    let modes: Vec<ResourceMode> = match args.mode {
        Some(mode) => vec![mode],
        None => ResourceMode::variants().to_vec(),
    };

    if args.json {
        let entries: Vec<serde_json::Value> = modes
            .iter()
            .flat_map(|mode| capabilities(*mode))
            .map(|cap| capability_json(&cap))
            .collect();
        emit_json(&serde_json::json!({"status":"ok","capabilities":entries}));
        return Ok(());
    }

    let style = StyleOptions::detect();
    for (i, mode) in modes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let caps = capabilities(*mode);
        let header = box_header(
            format!("{} {} ({} actions)", emoji("info", &style), mode_title(*mode), caps.len()),
            Some(format!("via {}", mode.tool())),
            &style,
        );
        println!("{header}");
        let rows: Vec<Vec<String>> = caps.iter().map(capability_row).collect();
        let rendered = table(
            &["ACTION", "COMMAND", "CONFIRM", "PROMPT"],
            &rows,
            TableOpts {
                max_width: style.term_width,
                ..TableOpts::default()
            },
            &style,
        );
        println!("{rendered}");
    }
    println!(
        "\n{}",
        color(
            Role::Dim,
            "Run one with: zfsman exec <MODE> <ACTION> [TARGET]",
            &style
        )
    );
    Ok(())
}

fn capability_row(cap: &Capability) -> Vec<String> {
    vec![
        cap.action.to_string(),
        cap.usage(),
        if cap.confirm { "yes".into() } else { "-".into() },
        cap.prompt.unwrap_or("-").to_string(),
    ]
}

fn capability_json(cap: &Capability) -> serde_json::Value {
    serde_json::json!({
        "mode": cap.mode,
        "action": cap.action,
        "tool": cap.tool,
        "usage": cap.usage(),
        "confirm": cap.confirm,
        "prompt": cap.prompt,
        "needs_target": cap.needs_target(),
        "needs_size": cap.needs_size(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zfsman::zfs::{Action, capability};

    #[test]
    fn rows_describe_capability() {
        let cap = capability(ResourceMode::Dataset, Action::Destroy).unwrap();
        let row = capability_row(&cap);
        assert_eq!(row[0], "destroy");
        assert_eq!(row[1], "zfs destroy <target>");
        assert_eq!(row[2], "yes");
        assert_eq!(row[3], "-");
    }

    #[test]
    fn json_entry() {
        let cap = capability(ResourceMode::Volume, Action::Create).unwrap();
        let v = capability_json(&cap);
        assert_eq!(v["mode"], "volume");
        assert_eq!(v["action"], "create");
        assert_eq!(v["tool"], "zfs");
        assert_eq!(v["prompt"], "volume name");
        assert_eq!(v["needs_target"], false);
        assert_eq!(v["needs_size"], true);
    }
}

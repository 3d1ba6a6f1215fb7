use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

use cmd::shared::GlobalOpts;
use cmd::{ActionsArgs, ExecArgs, GetArgs, ListArgs};
use zfsman::Config;
use zfsman::logging::{derive_level, init_logging};

/// zfsman - mode-aware front end for `zfs` / `zpool`
///
/// Command layout:
///   zfsman list    [MODE] [--json]
///   zfsman get     <MODE> [NAME] [--json]
///   zfsman exec    <MODE> <ACTION> [TARGET] [-n TEXT] [-s SIZE] [-y] [-i] [--json]
///   zfsman actions [MODE] [--json]
///
/// Modes:   dataset | snapshot | volume | pool
/// Actions: list | create | rename | duplicate | promote | destroy | rollback | get-properties
///
/// Global flags / env:
///   -v / -vv          Increase verbosity (RUST_LOG overrides)
///   -q / --quiet      Errors only
///   -c / --config     Config file (YAML, or JSON by extension); else ZFSMAN_CONFIG
///   --zfs / --zpool   Command line for the tools (e.g. "sudo -n zfs"); else ZFSMAN_ZFS / ZFSMAN_ZPOOL
///   --timeout SECS    Per-command bound, 0 waits forever
///   ZFSMAN_MODE       Default mode for `list`
///
/// Examples:
///   zfsman list snapshot
///   zfsman get dataset tank/data --json
///   zfsman exec dataset duplicate --name tank/data@daily
///   zfsman exec snapshot rollback tank/data@daily --yes
///   zfsman exec volume create -i
#[derive(Parser, Debug)]
#[command(
    name = "zfsman",
    version,
    author,
    about = "zfsman - list and manage ZFS datasets, snapshots, volumes and pools",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (falls back to ZFSMAN_CONFIG)
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Command line used to run zfs
    #[arg(long, global = true, value_name = "CMD")]
    zfs: Option<String>,

    /// Command line used to run zpool
    #[arg(long, global = true, value_name = "CMD")]
    zpool: Option<String>,

    /// Per-command timeout in seconds (0 disables)
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the objects of a mode
    List(ListArgs),

    /// Show all properties of one object
    Get(GetArgs),

    /// Run an action against the selected object
    Exec(ExecArgs),

    /// Show which actions each mode supports
    Actions(ActionsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = derive_level(cli.verbose, cli.quiet);
    init_logging(level);

    let globals = GlobalOpts {
        config: cli.config,
        zfs: cli.zfs,
        zpool: cli.zpool,
        timeout: cli.timeout,
    };

    match cli.command {
        Commands::List(args) => cmd::execute_list(args, &effective_config(&globals)),
        Commands::Get(args) => cmd::execute_get(args, &effective_config(&globals)),
        Commands::Exec(args) => cmd::execute_exec(args, &effective_config(&globals)),
        Commands::Actions(args) => cmd::execute_actions(args),
    }
}

/// Config file + env + flags. A bad config is fatal before anything runs.
fn effective_config(globals: &GlobalOpts) -> Config {
    match globals.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration: {e:#}");
            std::process::exit(2);
        }
    }
}

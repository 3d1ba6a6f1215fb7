/*!
Resource modes and actions.

Variants:
  dataset / snapshot / volume  (driven through `zfs`)
  pool                         (driven through `zpool`)

Helpers:
  - variants()
  - from_str_ci()
  - tool()
  - list_type()
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of ZFS object the operator is looking at.
#[derive(
    clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// Filesystem datasets
    #[default]
    Dataset,
    /// Point-in-time snapshots (`<parent>@<label>`)
    Snapshot,
    /// Block-device volumes
    Volume,
    /// Storage pools
    Pool,
}

impl ResourceMode {
    /// Return a static slice of all variants (order matters for help display).
    pub const fn variants() -> &'static [ResourceMode] {
        &[
            ResourceMode::Dataset,
            ResourceMode::Snapshot,
            ResourceMode::Volume,
            ResourceMode::Pool,
        ]
    }

    /// Case-insensitive parser not relying on `clap`; accepts plurals.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "dataset" | "datasets" | "filesystem" => Some(ResourceMode::Dataset),
            "snapshot" | "snapshots" => Some(ResourceMode::Snapshot),
            "volume" | "volumes" => Some(ResourceMode::Volume),
            "pool" | "pools" => Some(ResourceMode::Pool),
            _ => None,
        }
    }

    /// Which command-line tool owns this kind of object.
    pub fn tool(&self) -> Tool {
        match self {
            ResourceMode::Pool => Tool::Zpool,
            _ => Tool::Zfs,
        }
    }

    /// Value for `zfs list -t`; pools are listed unfiltered.
    pub fn list_type(&self) -> Option<&'static str> {
        match self {
            ResourceMode::Dataset => Some("filesystem"),
            ResourceMode::Snapshot => Some("snapshot"),
            ResourceMode::Volume => Some("volume"),
            ResourceMode::Pool => None,
        }
    }
}

impl fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceMode::Dataset => "dataset",
            ResourceMode::Snapshot => "snapshot",
            ResourceMode::Volume => "volume",
            ResourceMode::Pool => "pool",
        };
        f.write_str(s)
    }
}

/// Operations the dispatcher knows how to perform.
#[derive(clap::ValueEnum, Serialize, Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    List,
    Create,
    Rename,
    /// Snapshot a dataset/volume, or clone a snapshot
    Duplicate,
    Promote,
    Destroy,
    Rollback,
    /// `get all` for the selected object
    #[value(alias = "props")]
    GetProperties,
}

impl Action {
    pub const fn variants() -> &'static [Action] {
        &[
            Action::List,
            Action::Create,
            Action::Rename,
            Action::Duplicate,
            Action::Promote,
            Action::Destroy,
            Action::Rollback,
            Action::GetProperties,
        ]
    }

    /// Read-only actions never trigger a re-list.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Action::List | Action::GetProperties)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Rename => "rename",
            Action::Duplicate => "duplicate",
            Action::Promote => "promote",
            Action::Destroy => "destroy",
            Action::Rollback => "rollback",
            Action::GetProperties => "get-properties",
        };
        f.write_str(s)
    }
}

/// External binary a command is addressed to.
#[derive(Serialize, Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Zfs,
    Zpool,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Zfs => "zfs",
            Tool::Zpool => "zpool",
        }
    }

    pub fn from_program(s: &str) -> Option<Self> {
        match s {
            "zfs" => Some(Tool::Zfs),
            "zpool" => Some(Tool::Zpool),
            _ => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* --------------------------------- Tests ---------------------------------- */

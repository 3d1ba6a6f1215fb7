#![forbid(unsafe_code)]

//! zfsman: inspect and mutate ZFS datasets, snapshots, volumes and pools by
//! driving the `zfs`/`zpool` command-line tools.
//!
//! The library holds everything but presentation; the `zfsman` binary is a thin
//! terminal shell on top of [`zfs::ActionDispatcher`].

pub mod config;
pub mod error;
pub mod logging;
pub mod zfs;

pub use config::Config;
pub use error::{ErrorKind, ZfsError, ZfsResult};

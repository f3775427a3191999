//! Folder watcher module.
//!
//! Polls a watched remote folder on a fixed interval and emits one event
//! per newly appearing head item. Detection only ever compares the single
//! most recent listed item against the last seen id.

mod config;
mod poller;

pub use config::WatcherConfig;
pub use poller::{Poller, PollerStatus};

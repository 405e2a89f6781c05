//! Sync status tracking and connectivity probing.

mod probe;
mod status;

pub use probe::{check_server, check_server_with};
pub use status::{SyncStatus, SyncStatusMachine};

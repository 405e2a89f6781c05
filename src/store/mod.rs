//! Profile persistence.
//!
//! The profile is written to a local JSON record after every mutation and
//! mirrored to a remote copy. Reads are fail-soft: a missing or corrupted
//! record yields the default profile.

mod gateway;
mod local;
mod remote;

pub use gateway::{MirrorJob, PersistenceError, PersistenceGateway};
pub use local::{ProfileStorage, StorageError, DEFAULT_PROFILE_ID};
pub use remote::{RemoteError, RemoteMirror, SimulatedRemote, DEFAULT_LATENCY};

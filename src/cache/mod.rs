//! Brezza snapshot cache.
//!
//! Holds the last-known server state of the posts collection and serves it
//! to readers between fetches:
//!
//! - **Snapshots** pair a query's three-state lifecycle with the tag set it
//!   depends on and a staleness flag.
//! - **Tags** decouple "what changed" from "which queries must refresh": a
//!   mutation declares the tags it invalidates, the registry maps them back
//!   to cached query keys, and those snapshots go stale.
//! - **Patches** apply a mutation's expected effect before the network
//!   round-trip and hand back an inverse record for exact rollback.

mod keys;
mod lock;
mod patch;
mod query;
mod registry;
mod store;

pub use keys::{QueryKey, Tag};
pub use patch::PatchRecord;
pub use query::{QueryState, Snapshot};
pub use registry::TagRegistry;
pub use store::SnapshotStore;

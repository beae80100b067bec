//! Command handler layer.
//!
//! ## Files
//! - `sync.rs` — fetch, parse, reconcile and write one destination database.
//!
//! ## Principles
//! - Orchestrate and report progress here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod sync;

pub use sync::{run_sync, SyncRequest};

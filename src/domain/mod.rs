//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — preload entries, known hosts, sync report.
//! - `constants.rs` — provenance sentinels, database header, defaults.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! `SyncReport` is the `--json` output. Keep schema-impacting changes
//! synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;

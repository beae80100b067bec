//! Service layer containing parsing, reconciliation and side-effect helpers.
//!
//! ## Service map
//! - `source.rs` — resolve a path or URL to the raw preload document.
//! - `preload.rs` — decode the upstream JSON into entries keyed by hostname.
//! - `known_hosts.rs` — decode the local tab-separated database.
//! - `reconcile.rs` — remove/update/insert set computation (pure).
//! - `writer.rs` — line synthesis, temp file, gzip backup, atomic swap.
//! - `config.rs` — optional TOML settings.
//! - `output.rs` — progress/JSON/error output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized (`source.rs`, `writer.rs`).
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod known_hosts;
pub mod output;
pub mod preload;
pub mod reconcile;
pub mod source;
pub mod writer;

use crate::domain::models::{KnownHosts, SyncReport};
use crate::services::config::ConfigFile;
use crate::services::known_hosts::load_known_hosts;
use crate::services::output::{count_or_none, progress, progress_start};
use crate::services::preload::parse_preload_list;
use crate::services::reconcile;
use crate::services::source::retrieve_source;
use crate::services::writer::{persist, render_lines};
use std::path::Path;

pub struct SyncRequest<'a> {
    pub destination: &'a Path,
    pub source: &'a str,
    pub dry_run: bool,
    pub json: bool,
}

pub fn run_sync(req: &SyncRequest<'_>, config: &ConfigFile) -> anyhow::Result<SyncReport> {
    let json = req.json;

    progress_start(json, format_args!("Retrieving '{}'", req.source));
    let source = retrieve_source(req.source, &config.fetch)?;
    progress(json, format_args!("{} kB", source.bytes.len() / 1024));

    progress_start(json, format_args!("Parsing source file '{}'", source.location));
    let preload = parse_preload_list(&source.bytes)?;
    progress(json, format_args!("{} entries found", preload.len()));
    tracing::info!(source = %source.location, remote = source.remote, entries = preload.len(), "preload list parsed");

    let known = if req.destination.exists() {
        progress_start(json, format_args!("Parsing destination file '{}'", req.destination.display()));
        let known = load_known_hosts(req.destination)?;
        progress(json, format_args!("{} entries found", known.len()));
        known
    } else {
        tracing::info!(destination = %req.destination.display(), "destination does not exist yet");
        KnownHosts::new()
    };

    let plan = reconcile::plan(&preload, &known);
    let inserted = plan.inserted_count(&known);
    let updated = plan.updated_count();
    progress(json, format_args!("Entries to delete: {}", count_or_none(plan.hosts_to_remove.len())));
    progress(json, format_args!("Entries to update: {}", count_or_none(plan.hosts_to_update.len())));
    progress(json, format_args!("Entries to insert: {}", count_or_none(inserted)));

    let mut report = SyncReport {
        source: source.location.clone(),
        destination: req.destination.display().to_string(),
        preload_entries: preload.len(),
        known_hosts: known.len(),
        removed: plan.hosts_to_remove.len(),
        updated,
        inserted,
        written: false,
        dry_run: req.dry_run,
        backup: None,
    };

    if plan.is_noop() {
        progress(json, "Destination file is up to date");
        return Ok(report);
    }
    if req.dry_run {
        progress(json, "Dry run, destination file left untouched");
        return Ok(report);
    }

    let lines = render_lines(
        &known,
        &plan.hosts_to_remove,
        &plan.hosts_to_update,
        &plan.entries_to_write,
    );
    progress_start(json, format_args!("Updating destination file '{}'", req.destination.display()));
    let backup = persist(req.destination, &lines, config.output.backup)?;
    progress(json, "done");
    if let Some(path) = &backup {
        progress(json, format_args!("Previous version saved to '{}'", path.display()));
    }
    tracing::info!(lines = lines.len(), backup = ?backup, "destination updated");

    report.written = true;
    report.backup = backup.map(|p| p.display().to_string());
    Ok(report)
}

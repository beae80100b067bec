//! Output side of a sync: line synthesis, temp file, backup and swap.
//!
//! The destination is only ever touched by [`replace_file_atomically`], so a
//! failure anywhere earlier leaves it exactly as it was.

use crate::domain::constants::{DATABASE_HEADER, TEMP_FILE_PREFIX};
use crate::domain::models::{KnownHost, KnownHosts, PreloadEntry};
use crate::error::HstsError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Retained rows in file order, then new/updated rows sorted by hostname.
pub fn render_lines(
    known: &KnownHosts,
    hosts_to_remove: &BTreeSet<String>,
    hosts_to_update: &BTreeSet<String>,
    entries_to_write: &[&PreloadEntry],
) -> Vec<String> {
    let retained = known.iter().filter(|h| {
        !hosts_to_remove.contains(&h.hostname) && !hosts_to_update.contains(&h.hostname)
    });
    let mut fresh: Vec<KnownHost> = entries_to_write
        .iter()
        .map(|e| KnownHost::from_preload(e))
        .collect();
    fresh.sort_by(|a, b| a.hostname.cmp(&b.hostname));

    DATABASE_HEADER
        .iter()
        .map(|l| l.to_string())
        .chain(retained.map(KnownHost::to_string))
        .chain(fresh.iter().map(KnownHost::to_string))
        .collect()
}

fn target_dir(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Writes `lines` to a fresh temp file next to `destination`.
///
/// The returned path deletes the file when dropped, which covers every
/// error path between here and the final rename.
pub fn write_temp_file(destination: &Path, lines: &[String]) -> anyhow::Result<TempPath> {
    let dir = target_dir(destination);
    fs::create_dir_all(&dir).map_err(|e| HstsError::write(&dir, e))?;
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile_in(&dir)
        .map_err(|e| HstsError::write(&dir, e))?;
    tracing::debug!(path = %temp.path().display(), "created temp file");

    let written = (|| -> io::Result<()> {
        let mut w = BufWriter::new(temp.as_file_mut());
        for line in lines {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
        w.flush()?;
        drop(w);
        temp.as_file().sync_all()
    })();
    if let Err(e) = written {
        return Err(HstsError::write(temp.path(), e).into());
    }
    Ok(temp.into_temp_path())
}

fn backup_candidate(destination: &Path, n: u32) -> PathBuf {
    let mut name: OsString = destination.as_os_str().to_owned();
    if n == 0 {
        name.push(".bak.gz");
    } else {
        name.push(format!(".bak.{}.gz", n));
    }
    PathBuf::from(name)
}

/// Copies `destination` gzip-compressed to the first free name among
/// `<dest>.bak.gz`, `<dest>.bak.1.gz`, `<dest>.bak.2.gz`, ...
///
/// A name is taken when anything occupies it, dangling symlinks included.
pub fn backup_existing(destination: &Path) -> anyhow::Result<PathBuf> {
    let mut opened = None;
    for n in 0..=u32::MAX {
        let candidate = backup_candidate(destination, n);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(f) => {
                opened = Some((candidate, f));
                break;
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(HstsError::write(&candidate, e).into()),
        }
    }
    let Some((path, file)) = opened else {
        return Err(HstsError::write(destination, "no free backup name").into());
    };

    let copied = (|| -> io::Result<()> {
        let mut src = File::open(destination)?;
        let mut enc = GzEncoder::new(BufWriter::new(file), Compression::default());
        io::copy(&mut src, &mut enc)?;
        enc.finish()?.flush()
    })();
    if let Err(e) = copied {
        let _ = fs::remove_file(&path);
        return Err(HstsError::write(&path, e).into());
    }
    Ok(path)
}

/// Moves `temp` over `destination`, preferring an atomic rename.
///
/// Only when rename is unsupported for the pair (cross-device, busy mount
/// point) is the content copied over the destination and the temp removed. Any other rename
/// failure is returned with the destination untouched.
pub fn replace_file_atomically(temp: &Path, destination: &Path) -> anyhow::Result<()> {
    match fs::rename(temp, destination) {
        Ok(()) => Ok(()),
        Err(e) if rename_unsupported(&e) => {
            tracing::warn!(
                error = %e,
                "atomic move not possible, replacing {} in place",
                destination.display()
            );
            fs::copy(temp, destination).map_err(|e| HstsError::write(destination, e))?;
            fs::remove_file(temp).map_err(|e| HstsError::write(temp, e))?;
            Ok(())
        }
        Err(e) => Err(HstsError::write(destination, e).into()),
    }
}

// EXDEV, plus EBUSY for bind-mounted destinations.
fn rename_unsupported(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::CrossesDevices | io::ErrorKind::ResourceBusy
    )
}

#[cfg(unix)]
fn sync_directory(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Temp-write, optional backup, swap. Returns the backup path if one was made.
pub fn persist(destination: &Path, lines: &[String], backup: bool) -> anyhow::Result<Option<PathBuf>> {
    let temp = write_temp_file(destination, lines)?;
    let backup_path = if backup && destination.exists() {
        Some(backup_existing(destination)?)
    } else {
        None
    };
    replace_file_atomically(&temp, destination)?;
    // Nothing left at the temp path after the swap.
    let _ = temp.keep();
    let dir = target_dir(destination);
    sync_directory(&dir).map_err(|e| HstsError::write(&dir, e))?;
    Ok(backup_path)
}

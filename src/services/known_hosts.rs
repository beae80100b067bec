use crate::domain::models::{KnownHost, KnownHosts};
use crate::error::HstsError;
use anyhow::Context;
use std::path::Path;

pub fn load_known_hosts(path: &Path) -> anyhow::Result<KnownHosts> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read known hosts database: {}", path.display()))?;
    let content = String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        HstsError::KnownHostsFormat {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: format!("{}: not valid UTF-8", path.display()),
        }
    })?;
    parse_known_hosts(&content)
}

pub fn parse_known_hosts(content: &str) -> anyhow::Result<KnownHosts> {
    let mut hosts = KnownHosts::new();
    for (i, line) in content.lines().enumerate() {
        let parsed = parse_line(line).map_err(|message| HstsError::KnownHostsFormat {
            line: i + 1,
            message,
        })?;
        if let Some(host) = parsed {
            hosts.insert(host)?;
        }
    }
    Ok(hosts)
}

/// Returns `Ok(None)` for comments, blank lines and rows without exactly five fields.
pub fn parse_line(line: &str) -> Result<Option<KnownHost>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let fields = line.split_whitespace().count();
    if fields != 5 {
        tracing::debug!(fields, "skipping known hosts row: {}", line);
        return Ok(None);
    }
    line.parse::<KnownHost>().map(Some)
}

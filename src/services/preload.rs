use crate::domain::models::{PreloadEntries, PreloadEntry, PreloadList};
use crate::error::HstsError;

/// Drops whole-line `//` comments, which Chromium keeps in the upstream file.
fn strip_line_comments(raw: &str) -> String {
    raw.lines()
        .filter(|l| !l.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse_preload_list(bytes: &[u8]) -> anyhow::Result<PreloadEntries> {
    let raw = std::str::from_utf8(bytes)
        .map_err(|e| HstsError::PreloadFormat(format!("not valid UTF-8: {}", e)))?;
    let list: PreloadList = serde_json::from_str(&strip_line_comments(raw))
        .map_err(|e| HstsError::PreloadFormat(e.to_string()))?;
    tracing::debug!(
        pinsets = list.pinsets.len(),
        entries = list.entries.len(),
        "decoded preload list"
    );

    let mut out = PreloadEntries::new();
    for (i, raw) in list.entries.into_iter().enumerate() {
        let name = match raw.name {
            Some(n) if !n.is_empty() => n,
            _ => {
                return Err(
                    HstsError::PreloadFormat(format!("entry #{} has no name", i + 1)).into(),
                )
            }
        };
        out.insert(
            name.clone(),
            PreloadEntry {
                name,
                policy: raw.policy,
                include_subdomains: raw.include_subdomains,
                include_subdomains_for_pinning: raw.include_subdomains_for_pinning,
                mode: raw.mode,
                pins: raw.pins,
                expect_ct: raw.expect_ct,
                expect_ct_report_uri: raw.expect_ct_report_uri,
            },
        );
    }
    Ok(out)
}

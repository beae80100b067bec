//! Set arithmetic between the upstream preload list and the local database.
//!
//! Only rows carrying the preload provenance sentinels are ever candidates
//! for removal or update; hand-maintained rows pass through untouched.

use crate::domain::constants::FORCE_HTTPS_MODE;
use crate::domain::models::{KnownHost, KnownHosts, PreloadEntries, PreloadEntry};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of reconciling one preload snapshot against one database snapshot.
#[derive(Debug, Default)]
pub struct Plan<'a> {
    pub hosts_to_remove: BTreeSet<String>,
    pub hosts_to_update: BTreeSet<String>,
    pub entries_to_write: Vec<&'a PreloadEntry>,
}

impl Plan<'_> {
    pub fn is_noop(&self) -> bool {
        self.entries_to_write.is_empty() && self.hosts_to_remove.is_empty()
    }

    /// Entries whose host is brand new to the database.
    pub fn inserted_count(&self, known: &KnownHosts) -> usize {
        self.entries_to_write
            .iter()
            .filter(|e| !known.contains(&e.name))
            .count()
    }

    /// Entries replacing an existing preload-origin row.
    pub fn updated_count(&self) -> usize {
        self.entries_to_write
            .iter()
            .filter(|e| self.hosts_to_update.contains(&e.name))
            .count()
    }
}

pub fn preload_origin_hosts(known: &KnownHosts) -> BTreeMap<&str, &KnownHost> {
    known
        .iter()
        .filter(|h| h.is_preload_origin())
        .map(|h| (h.hostname.as_str(), h))
        .collect()
}

/// Preload-origin hosts that upstream no longer lists, whatever their mode.
pub fn hosts_to_remove<'a, P, K>(preload_names: P, preload_origin_names: K) -> BTreeSet<String>
where
    P: IntoIterator<Item = &'a str>,
    K: IntoIterator<Item = &'a str>,
{
    let upstream: BTreeSet<&str> = preload_names.into_iter().collect();
    preload_origin_names
        .into_iter()
        .filter(|h| !upstream.contains(h))
        .map(str::to_string)
        .collect()
}

pub fn hosts_to_update(
    preload: &PreloadEntries,
    preload_origin: &BTreeMap<&str, &KnownHost>,
) -> BTreeSet<String> {
    preload_origin
        .values()
        .filter(|known| {
            preload
                .get(&known.hostname)
                .map(|p| p.effective_include_subdomains() != known.include_subdomains)
                .unwrap_or(false)
        })
        .map(|known| known.hostname.clone())
        .collect()
}

pub fn entries_to_insert<'a>(
    preload: &'a PreloadEntries,
    known: &KnownHosts,
    hosts_to_update: &BTreeSet<String>,
) -> Vec<&'a PreloadEntry> {
    preload
        .values()
        .filter(|p| is_force_https(p))
        .filter(|p| !known.contains(&p.name) || hosts_to_update.contains(&p.name))
        .collect()
}

fn is_force_https(entry: &PreloadEntry) -> bool {
    entry
        .mode
        .as_deref()
        .map(|m| m.eq_ignore_ascii_case(FORCE_HTTPS_MODE))
        .unwrap_or(false)
}

pub fn plan<'a>(preload: &'a PreloadEntries, known: &KnownHosts) -> Plan<'a> {
    let origin = preload_origin_hosts(known);
    let hosts_to_remove = hosts_to_remove(
        preload.keys().map(String::as_str),
        origin.keys().copied(),
    );
    let hosts_to_update = hosts_to_update(preload, &origin);
    let entries_to_write = entries_to_insert(preload, known, &hosts_to_update);
    tracing::debug!(
        preload_origin = origin.len(),
        remove = hosts_to_remove.len(),
        update = hosts_to_update.len(),
        write = entries_to_write.len(),
        "reconciled"
    );
    Plan {
        hosts_to_remove,
        hosts_to_update,
        entries_to_write,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::PRELOAD_CREATED;

    fn preload(name: &str, mode: Option<&str>, subdomains: bool) -> PreloadEntry {
        PreloadEntry {
            name: name.to_string(),
            policy: Some("test".to_string()),
            include_subdomains: subdomains,
            include_subdomains_for_pinning: false,
            mode: mode.map(str::to_string),
            pins: None,
            expect_ct: None,
            expect_ct_report_uri: None,
        }
    }

    fn known(name: &str, subdomains: bool, created: i32, max_age: i32) -> KnownHost {
        KnownHost {
            hostname: name.to_string(),
            port: 0,
            include_subdomains: subdomains,
            created,
            max_age,
        }
    }

    fn preload_map(entries: Vec<PreloadEntry>) -> PreloadEntries {
        entries.into_iter().map(|e| (e.name.clone(), e)).collect()
    }

    fn known_hosts(rows: Vec<KnownHost>) -> KnownHosts {
        let mut hosts = KnownHosts::new();
        for row in rows {
            hosts.insert(row).unwrap();
        }
        hosts
    }

    fn fixture() -> (PreloadEntries, KnownHosts) {
        let p = preload_map(vec![
            preload("hstspreload.org", Some("force-https"), true),
            preload("example.org", Some("force-https"), false),
            preload("example.edu", Some("force-https"), true),
        ]);
        let k = known_hosts(vec![
            known("example.com", false, PRELOAD_CREATED, 0),
            known("example.net", true, 1_580_000_000, 31_536_000),
            known("example.edu", false, PRELOAD_CREATED, 0),
            known("github.com", true, 1_590_000_000, 31_536_000),
        ]);
        (p, k)
    }

    #[test]
    fn preload_origin_requires_both_sentinels() {
        let k = known_hosts(vec![
            known("a.example", false, PRELOAD_CREATED, 0),
            known("b.example", false, PRELOAD_CREATED, 10),
            known("c.example", false, 1000, 0),
        ]);
        let origin = preload_origin_hosts(&k);
        assert_eq!(origin.keys().copied().collect::<Vec<_>>(), ["a.example"]);
    }

    #[test]
    fn removes_only_vanished_preload_origin_hosts() {
        let (p, k) = fixture();
        let origin = preload_origin_hosts(&k);
        let removed = hosts_to_remove(p.keys().map(String::as_str), origin.keys().copied());
        assert_eq!(removed.into_iter().collect::<Vec<_>>(), ["example.com"]);
    }

    #[test]
    fn updates_preload_origin_hosts_with_flag_mismatch() {
        let (p, k) = fixture();
        let origin = preload_origin_hosts(&k);
        let updated = hosts_to_update(&p, &origin);
        assert_eq!(updated.into_iter().collect::<Vec<_>>(), ["example.edu"]);
    }

    #[test]
    fn pinning_flag_counts_towards_subdomains() {
        let mut entry = preload("pin.example", Some("force-https"), false);
        entry.include_subdomains_for_pinning = true;
        let p = preload_map(vec![entry]);
        let k = known_hosts(vec![known("pin.example", true, PRELOAD_CREATED, 0)]);
        assert!(hosts_to_update(&p, &preload_origin_hosts(&k)).is_empty());
    }

    #[test]
    fn remove_and_update_are_disjoint() {
        let (p, k) = fixture();
        let plan = plan(&p, &k);
        assert!(plan.hosts_to_remove.is_disjoint(&plan.hosts_to_update));
    }

    #[test]
    fn inserts_new_and_updated_force_https_entries() {
        let (p, k) = fixture();
        let plan = plan(&p, &k);
        let names: Vec<&str> = plan.entries_to_write.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["example.edu", "example.org", "hstspreload.org"]);
        assert_eq!(plan.inserted_count(&k), 2);
        assert_eq!(plan.updated_count(), 1);
        assert!(!plan.is_noop());
    }

    #[test]
    fn mode_match_is_case_insensitive() {
        let p = preload_map(vec![
            preload("upper.example", Some("FORCE-HTTPS"), false),
            preload("none.example", None, false),
            preload("other.example", Some("report-only"), false),
        ]);
        let entries = entries_to_insert(&p, &KnownHosts::new(), &BTreeSet::new());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "upper.example");
    }

    #[test]
    fn hand_maintained_rows_are_never_candidates() {
        let p = preload_map(vec![preload("manual.example", Some("force-https"), true)]);
        let k = known_hosts(vec![known("manual.example", false, 1000, 500)]);
        let plan = plan(&p, &k);
        assert!(plan.is_noop());
        assert!(plan.hosts_to_update.is_empty());
    }

    #[test]
    fn non_force_https_preload_origin_row_is_kept_indefinitely() {
        // Removal only checks presence upstream, so a row whose upstream mode
        // is not force-https is neither removed nor rewritten.
        let p = preload_map(vec![preload("stale.example", None, false)]);
        let k = known_hosts(vec![known("stale.example", false, PRELOAD_CREATED, 0)]);
        let plan = plan(&p, &k);
        assert!(plan.hosts_to_remove.is_empty());
        assert!(plan.hosts_to_update.is_empty());
        assert!(plan.is_noop());
    }

    #[test]
    fn unchanged_entry_is_noop() {
        let p = preload_map(vec![preload("f.example", Some("force-https"), true)]);
        let k = known_hosts(vec![known("f.example", true, PRELOAD_CREATED, 0)]);
        assert!(plan(&p, &k).is_noop());
    }

    #[test]
    fn empty_database_inserts_everything_force_https() {
        let (p, _) = fixture();
        let k = KnownHosts::new();
        let plan = plan(&p, &k);
        assert!(plan.hosts_to_remove.is_empty());
        assert!(plan.hosts_to_update.is_empty());
        assert_eq!(plan.inserted_count(&k), 3);
    }
}

use crate::domain::constants::{PRELOAD_CREATED, PRELOAD_MAX_AGE};
use crate::error::HstsError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonError {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Top-level shape of `transport_security_state_static.json`.
#[derive(Debug, Deserialize)]
pub struct PreloadList {
    #[serde(default)]
    pub pinsets: Vec<Pinset>,
    pub entries: Vec<RawPreloadEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Pinset {
    pub name: Option<String>,
    #[serde(default)]
    pub static_spki_hashes: Vec<String>,
    #[serde(default)]
    pub bad_static_spki_hashes: Vec<String>,
    pub report_uri: Option<String>,
}

/// Entry as decoded from JSON, before `name` has been checked.
#[derive(Debug, Deserialize)]
pub struct RawPreloadEntry {
    pub name: Option<String>,
    pub policy: Option<String>,
    #[serde(default)]
    pub include_subdomains: bool,
    #[serde(default)]
    pub include_subdomains_for_pinning: bool,
    pub mode: Option<String>,
    pub pins: Option<String>,
    pub expect_ct: Option<bool>,
    pub expect_ct_report_uri: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PreloadEntry {
    pub name: String,
    pub policy: Option<String>,
    pub include_subdomains: bool,
    pub include_subdomains_for_pinning: bool,
    pub mode: Option<String>,
    pub pins: Option<String>,
    pub expect_ct: Option<bool>,
    pub expect_ct_report_uri: Option<String>,
}

impl PreloadEntry {
    /// Subdomain flag as wget sees it.
    pub fn effective_include_subdomains(&self) -> bool {
        self.include_subdomains || self.include_subdomains_for_pinning
    }
}

/// Preload entries keyed by hostname; a repeated name overwrites the earlier one.
pub type PreloadEntries = BTreeMap<String, PreloadEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownHost {
    pub hostname: String,
    pub port: i32,
    pub include_subdomains: bool,
    pub created: i32,
    pub max_age: i32,
}

impl KnownHost {
    pub fn from_preload(entry: &PreloadEntry) -> Self {
        Self {
            hostname: entry.name.clone(),
            port: 0,
            include_subdomains: entry.effective_include_subdomains(),
            created: PRELOAD_CREATED,
            max_age: PRELOAD_MAX_AGE,
        }
    }

    pub fn is_preload_origin(&self) -> bool {
        self.created == PRELOAD_CREATED && self.max_age == PRELOAD_MAX_AGE
    }
}

impl fmt::Display for KnownHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.hostname,
            self.port,
            if self.include_subdomains { 1 } else { 0 },
            self.created,
            self.max_age
        )
    }
}

/// One database row: exactly five whitespace-separated fields.
impl FromStr for KnownHost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let &[hostname, port, flag, created, max_age] = fields.as_slice() else {
            return Err(format!("expected 5 fields, found {}", fields.len()));
        };
        Ok(Self {
            hostname: hostname.to_string(),
            port: parse_field("port", port)?,
            include_subdomains: flag == "1",
            created: parse_field("created", created)?,
            max_age: parse_field("max-age", max_age)?,
        })
    }
}

fn parse_field(field: &str, raw: &str) -> Result<i32, String> {
    raw.parse()
        .map_err(|e| format!("invalid {} {:?}: {}", field, raw, e))
}

/// Known hosts in file order, unique by hostname.
#[derive(Debug, Clone, Default)]
pub struct KnownHosts {
    hosts: Vec<KnownHost>,
    index: HashMap<String, usize>,
}

impl KnownHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, host: KnownHost) -> Result<(), HstsError> {
        if self.index.contains_key(&host.hostname) {
            return Err(HstsError::DuplicateKey(host.hostname));
        }
        self.index.insert(host.hostname.clone(), self.hosts.len());
        self.hosts.push(host);
        Ok(())
    }

    pub fn get(&self, hostname: &str) -> Option<&KnownHost> {
        self.index.get(hostname).map(|&i| &self.hosts[i])
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.get(hostname).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownHost> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub source: String,
    pub destination: String,
    pub preload_entries: usize,
    pub known_hosts: usize,
    pub removed: usize,
    pub updated: usize,
    pub inserted: usize,
    pub written: bool,
    pub dry_run: bool,
    pub backup: Option<String>,
}

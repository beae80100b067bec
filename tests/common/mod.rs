#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str = "# HSTS 1.0 Known Hosts database for GNU Wget.
# Edit at your own risk.
# <hostname>\t<port>\t<incl. subdomains>\t<created>\t<max-age>
";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");
        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("update-wget-hsts");
        cmd.env("HOME", &self.home).env_remove("RUST_LOG");
        cmd
    }

    pub fn destination(&self) -> PathBuf {
        self.work.join("wget-hsts")
    }

    pub fn write_destination(&self, rows: &str) {
        fs::write(self.destination(), format!("{}{}", HEADER, rows)).expect("write destination");
    }

    pub fn read_destination(&self) -> String {
        fs::read_to_string(self.destination()).expect("read destination")
    }

    /// Data rows of the destination, header comments stripped.
    pub fn rows(&self) -> Vec<String> {
        self.read_destination()
            .lines()
            .filter(|l| !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    pub fn write_source(&self, entries: Value) -> PathBuf {
        let path = self.work.join("transport_security_state_static.json");
        let doc = serde_json::json!({ "pinsets": [], "entries": entries });
        fs::write(
            &path,
            format!(
                "// Generated fixture.\n{}",
                serde_json::to_string_pretty(&doc).expect("serialize source")
            ),
        )
        .expect("write source");
        path
    }

    pub fn backups(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.work)
            .expect("read work dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("wget-hsts.bak"))
            .collect();
        names.sort();
        names
    }

    pub fn run_json(&self, source: &Path) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .arg(&self.destination())
            .arg(source)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, source: &Path) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .arg(&self.destination())
            .arg(source)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }
}

use crate::domain::constants::CHROMIUM_PRELOAD_URL;
use clap::Parser;
use std::path::PathBuf;

fn typical_usage() -> String {
    format!(
        "Typical usage: {} ~/.wget-hsts {}",
        env!("CARGO_PKG_NAME"),
        CHROMIUM_PRELOAD_URL
    )
}

#[derive(Parser, Debug)]
#[command(
    name = "update-wget-hsts",
    version,
    about = "Import preloaded HTTP Strict Transport Security (HSTS) domains into GNU Wget.",
    after_help = typical_usage()
)]
pub struct Cli {
    #[arg(help = "The 'wget-hsts' file to write/update")]
    pub destination: Option<PathBuf>,
    #[arg(help = "The 'transport_security_state_static.json' file, or a URL pointing to it")]
    pub source: Option<String>,
    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, help = "Compute changes without writing anything")]
    pub dry_run: bool,
    #[arg(long, help = "Configuration file (default: ~/.config/update-wget-hsts/config.toml)")]
    pub config: Option<PathBuf>,
    #[arg(short, long, help = "Enable debug logging on stderr")]
    pub verbose: bool,
}

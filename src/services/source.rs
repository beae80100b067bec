use crate::error::HstsError;
use crate::services::config::FetchConfig;
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONNECTION, CONTENT_ENCODING};
use std::io::{self, Read};
use std::path::PathBuf;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Raw preload document plus where it came from.
#[derive(Debug)]
pub struct SourceData {
    pub location: String,
    pub remote: bool,
    pub bytes: Vec<u8>,
}

fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn local_path(source: &str) -> PathBuf {
    PathBuf::from(source.strip_prefix("file://").unwrap_or(source))
}

pub fn retrieve_source(source: &str, fetch: &FetchConfig) -> anyhow::Result<SourceData> {
    if is_remote(source) {
        let client = http_client(fetch).map_err(|e| HstsError::fetch(source, e))?;
        let bytes = fetch_remote(&client, source, fetch)?;
        return Ok(SourceData {
            location: source.to_string(),
            remote: true,
            bytes,
        });
    }

    let path = local_path(source);
    let raw = std::fs::read(&path).map_err(|e| HstsError::fetch(source, e))?;
    let bytes = if raw.starts_with(&GZIP_MAGIC) {
        tracing::debug!(path = %path.display(), "source is gzip-compressed");
        gunzip(&raw).map_err(|e| HstsError::fetch(source, e))?
    } else {
        raw
    };
    Ok(SourceData {
        location: path.display().to_string(),
        remote: false,
        bytes,
    })
}

fn http_client(fetch: &FetchConfig) -> reqwest::Result<Client> {
    Client::builder().user_agent(fetch.user_agent.as_str()).build()
}

fn fetch_remote(client: &Client, url: &str, fetch: &FetchConfig) -> anyhow::Result<Vec<u8>> {
    let mut req = client
        .get(url)
        .header(ACCEPT, fetch.accept.as_str())
        .header(CONNECTION, "close");
    if fetch.request_gzip {
        req = req.header(ACCEPT_ENCODING, "gzip");
    }
    tracing::debug!(url, request_gzip = fetch.request_gzip, "sending request");

    let resp = req
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| HstsError::fetch(url, e))?;
    tracing::debug!(status = %resp.status(), headers = ?resp.headers(), "response received");
    let encoding = resp
        .headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.bytes().map_err(|e| HstsError::fetch(url, e))?;
    decode_body(encoding.as_deref(), &body).map_err(|e| HstsError::fetch(url, e).into())
}

/// Undoes the transfer encoding announced by the server.
pub fn decode_body(content_encoding: Option<&str>, body: &[u8]) -> io::Result<Vec<u8>> {
    match content_encoding {
        Some(enc) if enc.trim().eq_ignore_ascii_case("gzip") => gunzip(body),
        _ => Ok(body.to_vec()),
    }
}

fn gunzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

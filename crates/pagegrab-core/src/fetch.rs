//! HTTP GET for pages and resources.
//!
//! Uses the curl crate (libcurl). Page bodies are collected in memory; resource
//! bodies are streamed to a writer by the transfer queue.

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;

use crate::config::PagegrabConfig;

/// Connection settings shared by page fetches and resource transfers.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirections: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions::from(&PagegrabConfig::default())
    }
}

impl From<&PagegrabConfig> for FetchOptions {
    fn from(cfg: &PagegrabConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_redirections: cfg.max_redirections,
        }
    }
}

impl FetchOptions {
    /// Builds an easy handle for `url` with redirects and timeouts applied.
    pub(crate) fn easy(&self, url: &str) -> Result<curl::easy::Easy> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        Ok(easy)
    }
}

/// A page body together with the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Effective URL after redirects.
    pub url: String,
    pub body: String,
}

/// GETs `url` and returns the body decoded as UTF-8 (lossy).
///
/// Non-2xx responses are errors.
pub fn fetch_page(url: &str, opts: &FetchOptions) -> Result<FetchedDocument> {
    let mut body: Vec<u8> = Vec::new();
    let mut easy = opts.easy(url)?;
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform().context("GET request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }
    let effective = easy
        .effective_url()
        .ok()
        .flatten()
        .unwrap_or(url)
        .to_string();

    tracing::debug!(url = %effective, bytes = body.len(), "fetched page");
    Ok(FetchedDocument {
        url: effective,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// GETs `url`, streaming the body into `out`. Returns the number of bytes written.
pub fn fetch_to_writer<W: Write>(url: &str, opts: &FetchOptions, out: &mut W) -> Result<u64> {
    let mut written: u64 = 0;
    let mut write_err: Option<std::io::Error> = None;
    let mut easy = opts.easy(url)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match out.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_err {
        return Err(e).context("failed to write response body");
    }
    performed.context("GET request failed")?;

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }
    Ok(written)
}

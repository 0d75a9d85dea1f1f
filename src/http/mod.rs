use crate::config::Config;
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub fn build_client(cfg: &Config) -> Result<Client> {
    let mut default_headers = HeaderMap::new();
    let ua = HeaderValue::from_str(&cfg.user_agent)
        .map_err(|e| Error::Config(format!("invalid user agent: {}", e)))?;
    default_headers.insert(USER_AGENT, ua);
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let builder = Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls();
    Ok(builder.build()?)
}

/// Join a relative endpoint path (e.g. `v0/maxitem.json`) onto the base URL.
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| Error::InvalidArgument(format!("bad endpoint path {:?}: {}", path, e)))
}

/// Percent-encode a value for use as a single path segment.
pub fn encode_path_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Issue one GET and decode its body. Non-2xx statuses become [`Error::Http`].
/// An empty body decodes as JSON null.
pub fn get_json(client: &Client, url: &Url) -> Result<Value> {
    debug!("GET {}", url);
    let res = client.get(url.clone()).send()?;
    let status = res.status();
    if !status.is_success() {
        let text = res.text().unwrap_or_default();
        let message = if text.trim().is_empty() {
            format!("GET {} failed", url)
        } else {
            format!("GET {} failed: {}", url, text.trim())
        };
        return Err(Error::Http {
            status: Some(status),
            message,
        });
    }
    let bytes = res.bytes()?;
    decode_body(&bytes)
}

pub fn decode_body(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}

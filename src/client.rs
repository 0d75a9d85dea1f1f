use crate::config::Config;
use crate::error::{Error, Result};
use crate::http;
use crate::limiter::RateLimiter;
use crate::types::{IntoItemId, Item, Mode, Payload, Updates, User};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use url::Url;

/// Blocking client for the Hacker News API.
///
/// Owns one HTTP session and one [`RateLimiter`]; every request issued through the client,
/// whatever the endpoint, passes through that limiter. Clients built with [`HnClient::new`]
/// each get their own limiter; clones share the original's limiter, and
/// [`HnClient::with_limiter`] shares one explicitly.
#[derive(Debug, Clone)]
pub struct HnClient {
    session: reqwest::blocking::Client,
    base_url: Url,
    limiter: Arc<RateLimiter>,
}

impl HnClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::from_millis(cfg.min_interval_ms));
        Self::with_limiter(cfg, limiter)
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    /// Build a client that spends from an existing limiter's budget.
    pub fn with_limiter(cfg: &Config, limiter: Arc<RateLimiter>) -> Result<Self> {
        let session = http::build_client(cfg)?;
        info!(
            "Hacker News client ready; base={} min_interval={:?}",
            cfg.api_url,
            limiter.min_interval()
        );
        Ok(Self {
            session,
            base_url: cfg.api_url.clone(),
            limiter,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    fn request(&self, path: &str) -> Result<Value> {
        let url = http::endpoint(&self.base_url, path)?;
        self.limiter.call(|| http::get_json(&self.session, &url))
    }

    /// Fetch an item. Malformed or negative ids fail before any request is made.
    pub fn get_item<I: IntoItemId>(&self, id: I, mode: Mode) -> Result<Payload<Item>> {
        let id = id.into_item_id()?;
        let data = self
            .request(&format!("v0/item/{}.json", id))
            .inspect_err(|e| warn!("item request for {} failed: {}", id, e))?;
        let missing = || Error::not_found("item", id);
        let map = require_fields(mapping(data, missing)?, missing)?;
        shape(map, mode)
    }

    pub fn item<I: IntoItemId>(&self, id: I) -> Result<Item> {
        self.get_item(id, Mode::Typed).and_then(into_typed)
    }

    /// Fetch a user profile. Names are case-sensitive.
    pub fn get_user(&self, name: &str, mode: Mode) -> Result<Payload<User>> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("user name is empty".into()));
        }
        let path = format!("v0/user/{}.json", http::encode_path_segment(name));
        let data = self
            .request(&path)
            .inspect_err(|e| warn!("user request for {} failed: {}", name, e))?;
        let missing = || Error::not_found("user", name);
        let map = require_fields(mapping(data, missing)?, missing)?;
        shape(map, mode)
    }

    pub fn user(&self, name: &str) -> Result<User> {
        self.get_user(name, Mode::Typed).and_then(into_typed)
    }

    /// Ids of the current top stories, in rank order.
    pub fn get_top_stories(&self) -> Result<Vec<u64>> {
        let data = self
            .request("v0/topstories.json")
            .inspect_err(|e| warn!("top stories request failed: {}", e))?;
        Ok(serde_json::from_value(data)?)
    }

    pub fn get_max_item(&self) -> Result<u64> {
        let data = self
            .request("v0/maxitem.json")
            .inspect_err(|e| warn!("max item request failed: {}", e))?;
        Ok(serde_json::from_value(data)?)
    }

    /// Recently changed items and profiles. An empty mapping is returned as is.
    pub fn get_recent_updates(&self, mode: Mode) -> Result<Payload<Updates>> {
        let data = self
            .request("v0/updates.json")
            .inspect_err(|e| warn!("updates request failed: {}", e))?;
        shape(mapping(data, || Error::not_found("updates", "feed"))?, mode)
    }

    pub fn recent_updates(&self) -> Result<Updates> {
        self.get_recent_updates(Mode::Typed).and_then(into_typed)
    }
}

/// Decode a body that must be a JSON object; null means the entity is missing.
fn mapping<F>(data: Value, missing: F) -> Result<Map<String, Value>>
where
    F: FnOnce() -> Error,
{
    if data.is_null() {
        return Err(missing());
    }
    Ok(serde_json::from_value(data)?)
}

// Items and users always carry at least an id; an empty object means nothing is stored.
fn require_fields<F>(map: Map<String, Value>, missing: F) -> Result<Map<String, Value>>
where
    F: FnOnce() -> Error,
{
    if map.is_empty() {
        return Err(missing());
    }
    Ok(map)
}

fn shape<T: DeserializeOwned>(map: Map<String, Value>, mode: Mode) -> Result<Payload<T>> {
    match mode {
        Mode::Raw => Ok(Payload::Raw(map)),
        Mode::Typed => Ok(Payload::Typed(serde_json::from_value(Value::Object(map))?)),
    }
}

fn into_typed<T: DeserializeOwned>(payload: Payload<T>) -> Result<T> {
    match payload {
        Payload::Typed(v) => Ok(v),
        Payload::Raw(map) => Ok(serde_json::from_value(Value::Object(map))?),
    }
}

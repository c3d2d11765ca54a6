// src/fetch.rs
//
// Where official results come from.
//
// - `ResultSource` is the seam between the proxy and the volatile upstream page.
// - `TuLoteroSource` is the real one: a single GET, then `specs::tulotero`.
// - `ProxyClient` is the other end: what the CLI uses to ask a running proxy.
//   It only returns numbers; recording them is the caller's business.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::consts::{FETCH_TIMEOUT_SECS, NUMBERS_PER_BET, STARS_PER_BET, UPSTREAM_URL, USER_AGENT};
use crate::config::options::ClientOptions;
use crate::settlement::coerce_numbers;
use crate::specs::tulotero;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialResult {
    #[serde(rename = "winNums")]
    pub win_nums: Vec<u32>,
    #[serde(rename = "winStars")]
    pub win_stars: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(OfficialResult),
    /// Page fetched, but no usable combination in it.
    NotFound,
    /// Network, status or body error.
    Failure(String),
}

#[async_trait]
pub trait ResultSource: Send + Sync {
    /// `fecha` is whatever the caller asked for; sources normalize it themselves.
    async fn fetch_official_result(&self, fecha: Option<&str>) -> FetchOutcome;
}

/* ---------------- Upstream ---------------- */

pub struct TuLoteroSource {
    client: reqwest::Client,
    url: String,
}

impl TuLoteroSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, url: url.into() }
    }
}

impl Default for TuLoteroSource {
    fn default() -> Self {
        Self::new(UPSTREAM_URL, Duration::from_secs(FETCH_TIMEOUT_SECS))
    }
}

#[async_trait]
impl ResultSource for TuLoteroSource {
    async fn fetch_official_result(&self, fecha: Option<&str>) -> FetchOutcome {
        let resp = match self.client.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Failure(e.to_string()),
        };
        if !resp.status().is_success() {
            return FetchOutcome::Failure(format!("upstream status {}", resp.status()));
        }
        let html = match resp.text().await {
            Ok(t) => t,
            Err(e) => return FetchOutcome::Failure(e.to_string()),
        };
        tracing::debug!(bytes = html.len(), "upstream page received");

        match tulotero::parse_results_page(&html, fecha) {
            Some(r) => FetchOutcome::Found(r),
            None => FetchOutcome::NotFound,
        }
    }
}

/* ---------------- Proxy client ---------------- */

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No se pudo contactar con el proxy: {0}")]
    Http(#[from] reqwest::Error),
    #[error("El proxy respondió con estado {0}")]
    Status(u16),
    #[error("El proxy no encontró resultados")]
    NotFound,
    #[error("El proxy devolvió un error: {0}")]
    Upstream(String),
    #[error("Respuesta del proxy no válida: {0}")]
    Decode(String),
}

/// What a proxy hands back on success.
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyResult {
    pub win_nums: Vec<u32>,
    pub win_stars: Vec<u32>,
    pub source: Option<String>,
    pub matched_fecha: Option<String>,
}

pub struct ProxyClient {
    client: reqwest::blocking::Client,
    opts: ClientOptions,
}

impl ProxyClient {
    pub fn new(opts: ClientOptions) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(opts.timeout)
            .build()?;
        Ok(Self { client, opts })
    }

    /// One request, no retries.
    pub fn fetch(&self, fecha: Option<&str>) -> Result<ProxyResult, FetchError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(k) = self.opts.key.as_deref() {
            query.push(("key", k));
        }
        if let Some(f) = fecha.filter(|f| !f.trim().is_empty()) {
            query.push(("fecha", f.trim()));
        }

        let mut req = self.client.get(&self.opts.url).query(&query);
        if let Some(k) = self.opts.key.as_deref() {
            req = req.header("x-api-key", k);
        }
        logd!("Proxy client: GET {} fecha={:?}", self.opts.url, fecha);

        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body: Value = resp.json()?;
        decode_proxy_body(&body)
    }
}

fn decode_proxy_body(body: &Value) -> Result<ProxyResult, FetchError> {
    if let Some(err) = body.get("error").and_then(Value::as_str) {
        return Err(match err {
            "not_found" => FetchError::NotFound,
            other => FetchError::Upstream(other.to_string()),
        });
    }

    let list = |k: &str| -> Result<Vec<u32>, FetchError> {
        let arr = body
            .get(k)
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Decode(format!("falta {k}")))?;
        Ok(coerce_numbers(arr))
    };
    let win_nums = list("winNums")?;
    let win_stars = list("winStars")?;
    if win_nums.len() < NUMBERS_PER_BET || win_stars.len() < STARS_PER_BET {
        return Err(FetchError::Decode(format!("{:?} / {:?}", win_nums, win_stars)));
    }

    let text = |k: &str| body.get(k).and_then(Value::as_str).map(str::to_string);
    Ok(ProxyResult {
        win_nums,
        win_stars,
        source: text("source"),
        matched_fecha: text("matchedFecha"),
    })
}

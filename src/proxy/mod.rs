// src/proxy/mod.rs
//! Result-fetch proxy.
//!
//! ```text
//! GET /fetch?fecha=YYYY-MM-DD&key=…   (date= is an alias, key also via x-api-key)
//!   200 {"winNums":[..5],"winStars":[..2],"source":"tulotero","matchedFecha":…}
//!   200 {"error":"not_found"}
//!   502 {"error":"fetch_failed"}
//!   401 {"error":"unauthorized"}        (only when key enforcement is on)
//! GET /healthz → ok
//! ```
//!
//! Only successful answers are cached, keyed by `result:<date>` or `latest`.
pub mod cache;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, Request, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::consts::{CACHE_LATEST_KEY, PROXY_PATH, UPSTREAM_SOURCE};
use crate::config::options::ProxyOptions;
use crate::core::dates::normalize_date;
use crate::fetch::{FetchOutcome, ResultSource, TuLoteroSource};
use cache::TtlCache;

#[derive(Clone)]
pub struct ProxyState {
    source: Arc<dyn ResultSource>,
    cache: Arc<Mutex<TtlCache<Value>>>,
    opts: Arc<ProxyOptions>,
}

impl ProxyState {
    pub fn new(source: Arc<dyn ResultSource>, opts: ProxyOptions) -> Self {
        Self {
            source,
            cache: Arc::new(Mutex::new(TtlCache::new(opts.cache_ttl))),
            opts: Arc::new(opts),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FetchQuery {
    fecha: Option<String>,
    date: Option<String>,
    key: Option<String>,
}

pub fn cache_key(fecha: Option<&str>) -> String {
    match fecha.map(normalize_date).filter(|f| !f.is_empty()) {
        Some(f) => format!("result:{f}"),
        None => s!(CACHE_LATEST_KEY),
    }
}

fn error_body(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

async fn fetch_result(
    State(st): State<ProxyState>,
    Query(q): Query<FetchQuery>,
    headers: HeaderMap,
) -> Response {
    let key = q.key.clone().or_else(|| {
        headers.get("x-api-key").and_then(|v| v.to_str().ok()).map(str::to_string)
    });
    if st.opts.require_key {
        if let Some(expected) = st.opts.key.as_deref() {
            if key.as_deref() != Some(expected) {
                tracing::warn!("rejected request with bad key");
                return error_body(StatusCode::UNAUTHORIZED, "unauthorized");
            }
        }
    }
    tracing::debug!(has_key = key.is_some(), "fetch request");

    let fecha = q.fecha.or(q.date).map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
    let ck = cache_key(fecha.as_deref());

    if let Some(hit) = st.cache.lock().await.get(&ck) {
        tracing::debug!(key = %ck, "served from cache");
        return Json(hit).into_response();
    }

    match st.source.fetch_official_result(fecha.as_deref()).await {
        FetchOutcome::Found(r) => {
            let body = json!({
                "winNums": r.win_nums,
                "winStars": r.win_stars,
                "source": UPSTREAM_SOURCE,
                "matchedFecha": fecha,
            });
            st.cache.lock().await.insert(ck, body.clone());
            tracing::info!(nums = ?r.win_nums, stars = ?r.win_stars, "result fetched");
            Json(body).into_response()
        }
        FetchOutcome::NotFound => {
            tracing::info!(fecha = ?fecha, "no result in upstream page");
            Json(json!({ "error": "not_found" })).into_response()
        }
        FetchOutcome::Failure(reason) => {
            tracing::error!(%reason, "upstream fetch failed");
            error_body(StatusCode::BAD_GATEWAY, "fetch_failed")
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// `*` allows everyone; otherwise a comma list of exact origins.
fn allowed_origin(config: &str, origin: Option<&str>) -> Option<String> {
    let config = config.trim();
    if config == "*" {
        return Some(s!("*"));
    }
    let origin = origin?;
    config
        .split(',')
        .map(str::trim)
        .any(|o| o == origin)
        .then(|| origin.to_string())
}

async fn cors(State(st): State<ProxyState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    if let Some(allow) = allowed_origin(&st.opts.allowed_origins, origin.as_deref()) {
        let h = resp.headers_mut();
        if let Ok(v) = HeaderValue::from_str(&allow) {
            h.insert(ACCESS_CONTROL_ALLOW_ORIGIN, v);
        }
        h.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, OPTIONS"));
        h.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("x-api-key, content-type"));
    }
    resp
}

pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route(PROXY_PATH, get(fetch_result))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(opts: ProxyOptions) -> std::io::Result<()> {
    let source = Arc::new(TuLoteroSource::new(opts.upstream_url.clone(), opts.fetch_timeout));
    let addr = opts.bind_addr();
    let ttl: Duration = opts.cache_ttl;
    let app = build_router(ProxyState::new(source, opts));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, ttl_secs = ttl.as_secs(), "pena-proxy listening");
    axum::serve(listener, app).await
}

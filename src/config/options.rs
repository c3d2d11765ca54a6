// src/config/options.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;

fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

pub fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/* ---------------- Store ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    dir: PathBuf,
    file_stem: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(STORE_DIR),
            file_stem: s!(STORAGE_KEY),
        }
    }
}

impl StoreOptions {
    /// Defaults, with `PENA_STORE` pointing at the document file when set.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(p) = env_string("PENA_STORE") {
            opts.set_path(&p);
        }
        opts
    }

    /// `<dir>/<storage key>.json`
    pub fn document_path(&self) -> PathBuf {
        self.dir.join(join!(&self.file_stem, ".json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// Accepts either a directory (keeps the storage key) or a file path.
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        if crate::file::looks_like_dir_hint(p) || p.is_dir() {
            self.dir = p.to_path_buf();
            return;
        }
        if let Some(parent) = p.parent() {
            self.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.file_stem = stem.to_string_lossy().into_owned();
        }
    }
}

/* ---------------- Proxy server ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyOptions {
    pub port: u16,
    pub key: Option<String>,
    /// Reject requests whose key does not match `key`.
    pub require_key: bool,
    pub cache_ttl: Duration,
    pub allowed_origins: String,
    pub upstream_url: String,
    pub fetch_timeout: Duration,
    pub log_json: bool,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            port: PROXY_PORT,
            key: None,
            require_key: false,
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            allowed_origins: s!("*"),
            upstream_url: s!(UPSTREAM_URL),
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            log_json: false,
        }
    }
}

impl ProxyOptions {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            port: env_u64("PORT", d.port as u64).try_into().unwrap_or(d.port),
            key: env_string("PROXY_KEY"),
            require_key: env_bool("PROXY_REQUIRE_KEY", d.require_key),
            cache_ttl: Duration::from_secs(env_u64("CACHE_TTL", CACHE_TTL_SECS)),
            allowed_origins: env_string("ALLOWED_ORIGINS").unwrap_or(d.allowed_origins),
            upstream_url: env_string("UPSTREAM_URL").unwrap_or(d.upstream_url),
            fetch_timeout: Duration::from_secs(env_u64("FETCH_TIMEOUT", FETCH_TIMEOUT_SECS)),
            log_json: env_bool("PENA_LOG_JSON", d.log_json),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/* ---------------- Proxy client ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    pub url: String,
    pub key: Option<String>,
    pub timeout: Duration,
}

impl ClientOptions {
    /// Explicit values win over the ones stored in the document.
    pub fn resolve(
        flag_url: Option<&str>,
        flag_key: Option<&str>,
        stored: &crate::model::ProxySettings,
    ) -> Self {
        let url = flag_url
            .map(str::to_string)
            .or_else(|| stored.url.clone())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| format!("http://127.0.0.1:{PROXY_PORT}{PROXY_PATH}"));
        let key = flag_key
            .map(str::to_string)
            .or_else(|| stored.key.clone())
            .filter(|k| !k.trim().is_empty());
        Self { url, key, timeout: Duration::from_secs(FETCH_TIMEOUT_SECS) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProxySettings;

    #[test]
    fn document_path_uses_storage_key() {
        let opts = StoreOptions::default();
        assert!(opts.document_path().ends_with("pena_euromillones_v1.json"));
    }

    #[test]
    fn set_path_splits_dir_and_stem() {
        let mut opts = StoreOptions::default();
        opts.set_path("data/mine.json");
        assert_eq!(opts.dir(), Path::new("data"));
        assert!(opts.document_path().ends_with("mine.json"));
    }

    #[test]
    fn client_flags_override_stored_settings() {
        let stored = ProxySettings { url: Some(s!("http://a/fetch")), key: Some(s!("k1")) };
        let c = ClientOptions::resolve(Some("http://b/fetch"), None, &stored);
        assert_eq!(c.url, "http://b/fetch");
        assert_eq!(c.key.as_deref(), Some("k1"));

        let c = ClientOptions::resolve(None, None, &ProxySettings::default());
        assert_eq!(c.url, "http://127.0.0.1:3003/fetch");
        assert!(c.key.is_none());
    }
}

// src/log.rs
//
// Two sinks: the CLI appends to `.store/debug.log`, the proxy writes to stdout
// (JSON lines when asked). Level comes from `PENA_LOG`, default `info`.
// `logf!`/`logd!`/`loge!` are shorthands over `tracing`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::file::ensure_directory;

pub const LOG_ENV: &str = "PENA_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Append to `path`, timestamps as elapsed time since start.
/// Silently does nothing if the file cannot be opened or a subscriber is already set.
pub fn init_file(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if ensure_directory(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = fmt()
        .with_env_filter(filter())
        .with_timer(fmt::time::uptime())
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

/// Stdout, plain or JSON.
pub fn init_stdout(json: bool) {
    let builder = fmt().with_env_filter(filter()).with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}

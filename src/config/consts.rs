// src/config/consts.rs

// Local store
pub const STORE_DIR: &str = ".store";
pub const STORAGE_KEY: &str = "pena_euromillones_v1";
pub const LOG_FILE: &str = "debug.log";
pub const DOCUMENT_VERSION: u32 = 1;

// Pool defaults
pub const DEFAULT_BET_COST: f64 = 2.5;
pub const DEFAULT_NEXT_DRAW_WEEKS: u32 = 8;
/// Upper bound on how far ahead `next_eligible_draw` looks.
pub const MAX_NEXT_DRAW_WEEKS: u32 = 104;

// Bet shape
pub const NUMBERS_PER_BET: usize = 5;
pub const STARS_PER_BET: usize = 2;

// Prefix for ids of fixed bets copied into a draw
pub const FIXED_BET_ID_PREFIX: &str = "fija-";

// Export
pub const ELIGIBLE_CSV_PREFIX: &str = "elegibles_";
pub const BACKUP_PREFIX: &str = "copia_pena_";

// Proxy
pub const PROXY_PORT: u16 = 3003;
pub const PROXY_PATH: &str = "/fetch";
pub const CACHE_TTL_SECS: u64 = 600;
pub const FETCH_TIMEOUT_SECS: u64 = 10;
pub const UPSTREAM_URL: &str = "https://tulotero.es/resultados-euromillones/";
pub const UPSTREAM_SOURCE: &str = "tulotero";
pub const USER_AGENT: &str = "tulotero-proxy/1.0 (+https://example.com)";
pub const CACHE_LATEST_KEY: &str = "latest";

//! Application-wide constants

/// Snapshot freshness window (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_STORAGE_DIR: &str = ".menugate";
pub const DEFAULT_STORAGE_KEY: &str = "menu_catalog";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Route path delimiter; only one level of nesting is modelled.
pub const PATH_DELIMITER: char = '/';

/// Where a route guard sends users who hit a hidden page.
pub const DEFAULT_GUARD_REDIRECT: &str = "/";

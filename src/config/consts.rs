// src/config/consts.rs

// Browser
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const QUERY_TIMEOUT_SECS: u64 = 10;
pub const QUERY_POLL_MS: u64 = 50;

// Retry budgets
pub const WIDGET_BACKOFF_MS: u64 = 10;
pub const CLICK_BACKOFF_MS: u64 = 100;
pub const CLICK_ATTEMPTS: u32 = 100;
pub const RECONCILE_BACKOFF_MS: u64 = 100;
pub const RECONCILE_ATTEMPTS: u32 = 100;
pub const WALK_ATTEMPTS: u32 = 10;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "collated";

// Logging
pub const LOG_DIR: &str = ".collate";
pub const LOG_FILE: &str = "debug.log";

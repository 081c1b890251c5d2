// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Once;

use env_logger::{Builder, Env, Target};

use crate::config::consts::{LOG_DIR, LOG_FILE};

static INIT: Once = Once::new();

/// Install the process-wide logger (idempotent).
///
/// Lines go to `.collate/debug.log`; stderr is used when that file can't be
/// opened. The level comes from `RUST_LOG` and defaults to `info`.
pub fn init() {
    INIT.call_once(|| {
        let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
        builder
            .format_timestamp_millis()
            // WebDriver transport chatter
            .filter_module("fantoccini", ::log::LevelFilter::Warn)
            .filter_module("hyper", ::log::LevelFilter::Warn)
            .filter_module("hyper_util", ::log::LevelFilter::Warn);

        let path = Path::new(LOG_DIR).join(LOG_FILE);
        let file = fs::create_dir_all(LOG_DIR)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));

        match file {
            Ok(f) => { builder.target(Target::Pipe(Box::new(f))); }
            Err(_) => { builder.target(Target::Stderr); }
        }

        // A test harness or embedding app may have installed one already.
        let _ = builder.try_init();
    });
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::log::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}

/// Warn-level logging (recoverable anomalies)
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::log::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::log::error!($($arg)*)
    };
}

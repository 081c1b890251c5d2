// src/core/mod.rs

pub mod document;
pub mod fake;
pub mod sanitize;
#[cfg(feature = "webdriver")]
pub mod browser;

pub use document::{DocError, Document, Query};
pub use fake::FakePage;

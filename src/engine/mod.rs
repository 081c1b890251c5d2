// src/engine/mod.rs
//! Traversal-and-consistency engine.
//!
//! `Collator` drives a [`Document`](crate::core::Document) through every
//! (table 1 row, table 2 row) pair, reconciling each table against the row
//! that filtered it before trusting its numbers.

use std::time::Duration;

use crate::config::consts::*;

pub mod error;
pub mod optimize;
pub mod retry;
pub mod table;
pub mod traverse;
pub mod types;
pub mod widget;

pub use error::CollateError;
pub use optimize::{pick_middle, pick_outer};
pub use retry::{retry, RetryPolicy};
pub use table::{ResultRow, ResultTable, RowLocator};
pub use traverse::Collator;
pub use types::{AxisPermutation, Cursor, LeafCounts, NestedCounts};
pub use widget::{CategoryOption, SelectionWidget};

/// Retry budgets for every waiting point in a collation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tuning {
    /// Locating widgets, option lists and table containers.
    pub element: RetryPolicy,
    /// Committing a widget option.
    pub click: RetryPolicy,
    /// Waiting for a table to add up to its parent row.
    pub reconcile: RetryPolicy,
    /// Full passes over one table level before giving up on a mismatch.
    pub walk: RetryPolicy,
    /// Overrides the layout's row-element offset.
    pub row_offset: Option<usize>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            element: RetryPolicy::unbounded(Duration::from_millis(WIDGET_BACKOFF_MS)),
            click: RetryPolicy::capped(CLICK_ATTEMPTS, Duration::from_millis(CLICK_BACKOFF_MS)),
            reconcile: RetryPolicy::capped(RECONCILE_ATTEMPTS, Duration::from_millis(RECONCILE_BACKOFF_MS)),
            walk: RetryPolicy::capped(WALK_ATTEMPTS, Duration::ZERO),
            row_offset: None,
        }
    }
}

impl Tuning {
    /// Same backoffs, every loop capped at `n` attempts.
    pub fn with_attempt_cap(self, n: u32) -> Self {
        Self {
            element: self.element.with_cap(n),
            click: self.click.with_cap(n),
            reconcile: self.reconcile.with_cap(n),
            walk: self.walk.with_cap(n),
            ..self
        }
    }

    /// No sleeping, small caps. For in-memory pages.
    pub fn fast() -> Self {
        Self {
            element: RetryPolicy::capped(20, Duration::ZERO),
            click: RetryPolicy::capped(20, Duration::ZERO),
            reconcile: RetryPolicy::capped(20, Duration::ZERO),
            walk: RetryPolicy::capped(5, Duration::ZERO),
            row_offset: None,
        }
    }
}

// src/specs/mod.rs
//! # Page “specs” module
//!
//! Everything that knows **what a TRAC cross-tab page looks like**: which queries
//! locate the three selection widgets and the three result tables, how many
//! leading row elements are blank or header rows, and how a table's visible
//! text turns into `(category, count)` rows.
//!
//! ## What lives here
//! - **Layout constants** per widget/table style (`layout`): queries and the
//!   row-element offset. The two styles differ only in these constants and in
//!   whether a row is clicked directly or through an inner link.
//! - **Pure text parsing** of table contents (`rows`): structural lines (blank,
//!   headers, `All`/`Total` aggregates) are dropped, counts lose their digit
//!   separators.
//!
//! ## What does **not** live here
//! - Retrying, waiting or clicking. That's `engine`.
//! - Knowing which URL uses which layout. That's `config::registry`.
//!
//! ## Testing notes
//! Parsing is offline and deterministic; see the unit tests in `rows`.
pub mod layout;
pub mod rows;

pub use layout::{LayoutKind, LayoutSpec};
pub use rows::{parse_line, parse_lines, ParsedLine};

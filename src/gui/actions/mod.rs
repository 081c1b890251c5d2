// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{collate, list_axes, copy, export, poll}.

mod collate; // src/gui/actions/collate.rs
mod copy;    // src/gui/actions/copy.rs
mod export;  // src/gui/actions/export.rs

pub use collate::{collate, list_axes, poll};
pub use copy::copy;
pub use export::export;

use crate::runner::Collated;

/// What a background worker hands back to the UI thread.
pub enum Outcome {
    Collated(Result<Collated, String>),
    Axes(Result<Vec<String>, String>),
}

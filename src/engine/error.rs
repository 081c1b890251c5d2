// src/engine/error.rs
use crate::core::DocError;

#[derive(Debug, thiserror::Error)]
pub enum CollateError {
    #[error("axis {axis:?} is not offered by widget {widget}")]
    AxisNotFound { axis: String, widget: usize },

    #[error("{what}: not found after {attempts} attempts")]
    ElementNotFound { what: String, attempts: u32 },

    #[error("{what}: element kept going stale ({attempts} attempts)")]
    StaleReference { what: String, attempts: u32 },

    #[error("table {table} rows sum to {observed}, expected {expected} ({attempts} attempts)")]
    Reconciliation { table: usize, expected: u64, observed: u64, attempts: u32 },

    #[error("level {level} walk collected {observed}, expected {expected} ({passes} passes)")]
    WalkMismatch { level: usize, expected: u64, observed: u64, passes: u32 },

    #[error("could not click row {row} ({name:?}) of table {table} at cursor {cursor}")]
    RowClick {
        table: usize,
        row: usize,
        name: String,
        cursor: String,
        #[source]
        source: Box<CollateError>,
    },

    #[error("axis optimization failed")]
    Optimize(#[source] Box<CollateError>),

    #[error("URL is not recognized: {0}")]
    UrlNotRecognized(String),

    #[error("URL is not supported: {0}")]
    UrlNotSupported(String),

    #[error("invalid axes: {0}")]
    InvalidAxes(String),

    #[error(transparent)]
    Document(#[from] DocError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CollateError {
    /// Another attempt at the same step might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CollateError::ElementNotFound { .. } | CollateError::StaleReference { .. } => true,
            CollateError::Document(e) => e.is_transient(),
            _ => false,
        }
    }
}

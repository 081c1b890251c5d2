// src/progress.rs
/// Lightweight progress reporting used by long-running operations (collation/export).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start of a table-1 walk with its row count.
    fn begin(&mut self, _total: usize) {}

    /// A table-1 row was selected; `children` rows follow in table 2.
    fn row_begin(&mut self, _name: &str, _children: usize) {}

    /// One (table 1 row, table 2 row) pair was collected.
    fn cell_done(&mut self, _outer: &str, _inner: &str) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

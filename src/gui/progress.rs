// src/gui/progress.rs
use std::sync::{ Arc, Mutex };

use crate::core::sanitize::shorten;
use crate::progress::Progress;

/// Mirrors collation progress into the status line shared with the UI thread.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    outer_done: usize,
    outer_total: usize,
    inner_done: usize,
    inner_total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, outer_done: 0, outer_total: 0, inner_done: 0, inner_total: 0 }
    }

    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.outer_total = total;
        self.outer_done = 0;
    }

    fn row_begin(&mut self, name: &str, children: usize) {
        self.outer_done += 1;
        self.inner_total = children;
        self.inner_done = 0;
        self.set_status(format!(
            "Table 1: {} ({}/{})",
            shorten(name).trim_end(), self.outer_done, self.outer_total
        ));
    }

    fn cell_done(&mut self, outer: &str, inner: &str) {
        self.inner_done += 1;
        self.set_status(format!(
            "Table 1: {} ({}/{})  Table 2: {} ({}/{})",
            shorten(outer).trim_end(), self.outer_done, self.outer_total,
            shorten(inner).trim_end(), self.inner_done, self.inner_total
        ));
    }

    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }

    fn finish(&mut self) {
        if self.outer_total == 0 {
            self.set_status(s!("Collation finished"));
        } else {
            self.set_status(format!("Collation finished ({}/{})", self.outer_done, self.outer_total));
        }
    }
}

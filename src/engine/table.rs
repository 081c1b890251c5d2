// src/engine/table.rs
//! Result tables and their rows.
//!
//! A table caches the rows it parsed the last time it was recalculated and
//! nothing else. Rows carry a locator (table, element index) that is resolved
//! against the live page at click time.

use super::error::CollateError;
use super::retry::{retry, RetryPolicy};
use crate::core::{DocError, Document};
use crate::specs::{parse_lines, LayoutKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowLocator {
    pub table: usize,
    pub kind: LayoutKind,
    /// Index among the table's row elements, offset rows included.
    pub element_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub value: u64,
    /// Rank among data rows at the last recalculation.
    pub position: usize,
    pub locator: RowLocator,
}

impl ResultRow {
    /// One click attempt against a freshly located row element.
    pub fn try_click<D: Document>(&self, doc: &mut D) -> Result<(), DocError> {
        let spec = self.locator.kind.spec();
        let table = doc.find_nth(None, spec.table, self.locator.table)?;
        let row = doc.find_nth(Some(&table), spec.row, self.locator.element_index)?;
        match spec.click_target {
            Some(target) => {
                let link = doc.find(Some(&row), target)?;
                doc.click(&link)
            }
            None => doc.click(&row),
        }
    }

    /// Click under `policy`. Every attempt re-locates the table's row elements,
    /// since a stale row means the whole table re-rendered.
    pub fn click<D: Document>(
        &self,
        doc: &mut D,
        policy: &RetryPolicy,
    ) -> Result<(), CollateError> {
        let what = format!("row {} of table {}", self.position, self.locator.table + 1);
        retry(policy, &what, |_| self.try_click(doc))
    }
}

#[derive(Clone, Debug)]
pub struct ResultTable {
    index: usize,
    kind: LayoutKind,
    row_offset: usize,
    rows: Option<Vec<ResultRow>>,
    anomalies: usize,
}

impl ResultTable {
    pub fn new(index: usize, kind: LayoutKind, row_offset: Option<usize>) -> Self {
        Self {
            index,
            kind,
            row_offset: row_offset.unwrap_or(kind.spec().row_offset),
            rows: None,
            anomalies: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Rows, computing them on first access only.
    pub fn rows<D: Document>(
        &mut self,
        doc: &mut D,
        policy: &RetryPolicy,
    ) -> Result<&[ResultRow], CollateError> {
        if self.rows.is_none() {
            self.recalculate(doc, policy)?;
        }
        Ok(self.cached())
    }

    /// Rows as of the last recalculation; empty if there was none.
    pub fn cached(&self) -> &[ResultRow] {
        self.rows.as_deref().unwrap_or(&[])
    }

    /// Sum of cached row values.
    pub fn total(&self) -> u64 {
        self.cached().iter().map(|r| r.value).sum()
    }

    /// Forget cached rows; an ancestor selection changed.
    pub fn invalidate(&mut self) {
        self.rows = None;
    }

    /// Element/text count disagreements seen so far.
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    /// Re-read the table from the page.
    ///
    /// Text lines are the authority on names and values. Line `i` maps to row
    /// element `row_offset + i`; when element and line counts disagree the
    /// longer side is cut from the end and the disagreement logged.
    pub fn recalculate<D: Document>(
        &mut self,
        doc: &mut D,
        policy: &RetryPolicy,
    ) -> Result<&[ResultRow], CollateError> {
        let spec = self.kind.spec();
        let index = self.index;

        let (lines, elements) = retry(policy, &format!("table {}", index + 1), |_| {
            let container = doc.find_nth(None, spec.table, index)?;
            let lines = parse_lines(&doc.text(&container)?);
            let elements = if lines.is_empty() {
                0
            } else {
                doc.find_all(Some(&container), spec.row)?.len()
            };
            Ok((lines, elements))
        })?;

        let available = elements.saturating_sub(self.row_offset);
        if available != lines.len() {
            self.anomalies += 1;
            logw!(
                "table {}: {} text rows vs {} row elements; keeping {}",
                index + 1, lines.len(), available, available.min(lines.len())
            );
        }

        let keep = available.min(lines.len());
        let rows = lines
            .into_iter()
            .take(keep)
            .enumerate()
            .map(|(position, line)| ResultRow {
                name: line.name,
                value: line.value,
                position,
                locator: RowLocator {
                    table: index,
                    kind: self.kind,
                    element_index: self.row_offset + position,
                },
            })
            .collect();
        self.rows = Some(rows);
        Ok(self.cached())
    }

    /// Re-read until text lines and row elements agree, for a table with no
    /// parent row to reconcile against.
    ///
    /// Reads that disagree are discarded and not counted. Once `settle` runs
    /// out the last read is kept, truncated, as one anomaly.
    pub fn settle<D: Document>(
        &mut self,
        doc: &mut D,
        element: &RetryPolicy,
        settle: &RetryPolicy,
    ) -> Result<&[ResultRow], CollateError> {
        let before = self.anomalies;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.recalculate(doc, element)?;
            if self.anomalies == before {
                break;
            }
            if settle.exhausted(attempt) {
                logw!("table {} never settled after {attempt} reads; keeping the last", self.index + 1);
                break;
            }
            self.anomalies = before;
            logd!("table {}: text and row elements disagree (read {attempt})", self.index + 1);
            settle.pause();
        }
        Ok(self.cached())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FakePage;
    use std::time::Duration;

    fn page(kind: LayoutKind) -> FakePage {
        FakePage::builder(kind)
            .axis("Decision", &["Granted", "Denied"])
            .axis("Age", &["Under 18", "18 and over"])
            .axis("Absentia", &["Yes", "No"])
            .record(&["Granted", "Under 18", "No"], 1200)
            .record(&["Denied", "18 and over", "Yes"], 35)
            .build()
    }

    const POLICY: RetryPolicy = RetryPolicy::capped(3, Duration::ZERO);

    #[test]
    fn rows_map_onto_elements_past_the_offset() {
        for kind in LayoutKind::ALL {
            let mut doc = page(kind);
            let mut t = ResultTable::new(0, kind, None);
            let rows = t.rows(&mut doc, &POLICY).unwrap().to_vec();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].name, "Granted");
            assert_eq!(rows[0].value, 1200);
            assert_eq!(rows[1].locator.element_index, kind.spec().row_offset + 1);
            assert_eq!(t.total(), 1235);
            assert_eq!(t.anomalies(), 0);
        }
    }

    #[test]
    fn stray_row_elements_are_truncated_and_counted() {
        let mut doc = page(LayoutKind::Object).extra_row_elements(0, 2);
        let mut t = ResultTable::new(0, LayoutKind::Object, None);
        assert_eq!(t.recalculate(&mut doc, &POLICY).unwrap().len(), 2);
        assert_eq!(t.anomalies(), 1);
    }

    #[test]
    fn rows_are_lazy_until_invalidated() {
        let mut doc = page(LayoutKind::Link);
        let mut t = ResultTable::new(0, LayoutKind::Link, None);
        assert!(t.cached().is_empty());
        t.rows(&mut doc, &POLICY).unwrap();
        let q = doc.queries();
        t.rows(&mut doc, &POLICY).unwrap();
        assert_eq!(doc.queries(), q);

        t.invalidate();
        assert!(t.cached().is_empty());
        t.rows(&mut doc, &POLICY).unwrap();
        assert!(doc.queries() > q);
    }

    #[test]
    fn clicking_a_row_filters_the_next_table() {
        let mut doc = page(LayoutKind::Link);
        let mut t1 = ResultTable::new(0, LayoutKind::Link, None);
        let denied = t1.rows(&mut doc, &POLICY).unwrap()[1].clone();
        denied.try_click(&mut doc).unwrap();

        let mut t2 = ResultTable::new(1, LayoutKind::Link, None);
        let rows = t2.recalculate(&mut doc, &POLICY).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "18 and over");
        assert_eq!(rows[0].value, 35);
    }

    #[test]
    fn settling_skips_reads_that_lag_behind_the_rows() {
        let mut doc = page(LayoutKind::Object).lag(1, 1);
        let mut t1 = ResultTable::new(0, LayoutKind::Object, None);
        let denied = t1.rows(&mut doc, &POLICY).unwrap()[1].clone();
        denied.click(&mut doc, &POLICY).unwrap();

        // first read still shows both ages over a single row element
        let mut t2 = ResultTable::new(1, LayoutKind::Object, None);
        let rows = t2.settle(&mut doc, &POLICY, &POLICY).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "18 and over");
        assert_eq!(t2.anomalies(), 0);
    }

    #[test]
    fn settling_gives_up_on_stray_elements_as_one_anomaly() {
        let mut doc = page(LayoutKind::Object).extra_row_elements(0, 1);
        let mut t = ResultTable::new(0, LayoutKind::Object, None);
        let q = doc.queries();
        assert_eq!(t.settle(&mut doc, &POLICY, &POLICY).unwrap().len(), 2);
        assert_eq!(t.anomalies(), 1);
        // three reads, each a container lookup plus a row lookup
        assert_eq!(doc.queries() - q, 6);
    }

    #[test]
    fn row_click_retries_stale_elements_within_the_policy() {
        let mut doc = page(LayoutKind::Link).fail_clicks(2);
        let mut t1 = ResultTable::new(0, LayoutKind::Link, None);
        let granted = t1.rows(&mut doc, &POLICY).unwrap()[0].clone();
        granted.click(&mut doc, &POLICY).unwrap();

        let mut doc = page(LayoutKind::Link).fail_clicks(3);
        let err = granted.click(&mut doc, &POLICY).unwrap_err();
        assert!(matches!(err, CollateError::StaleReference { attempts: 3, .. }));
    }

    #[test]
    fn missing_table_exhausts_the_policy() {
        let mut doc = page(LayoutKind::Object).hide_tables();
        let mut t = ResultTable::new(2, LayoutKind::Object, None);
        let err = t.recalculate(&mut doc, &POLICY).unwrap_err();
        assert!(matches!(err, CollateError::ElementNotFound { attempts: 3, .. }));
    }
}

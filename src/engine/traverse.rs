// src/engine/traverse.rs
//! The collator: widgets, tables and the reconciling walk over them.

use std::collections::BTreeMap;

use super::error::CollateError;
use super::table::{ResultRow, ResultTable};
use super::types::{AxisPermutation, Cursor, LeafCounts, NestedCounts};
use super::widget::{CategoryOption, SelectionWidget};
use super::Tuning;
use crate::core::Document;
use crate::progress::Progress;
use crate::specs::LayoutKind;

/// Owns the page session for the whole collation.
pub struct Collator<D: Document> {
    pub(super) doc: D,
    kind: LayoutKind,
    pub(super) tuning: Tuning,
    widgets: Vec<SelectionWidget>,
    pub(super) tables: [ResultTable; 3],
    cursor: Option<Cursor>,
}

impl<D: Document> Collator<D> {
    /// Load `url` and attach to its widgets.
    pub fn open(
        mut doc: D,
        url: &str,
        kind: LayoutKind,
        tuning: Tuning,
    ) -> Result<Self, CollateError> {
        logf!("Opening {url} ({kind} layout)");
        doc.navigate(url)?;
        Self::attach(doc, kind, tuning)
    }

    /// Attach to a page that is already loaded.
    pub fn attach(mut doc: D, kind: LayoutKind, tuning: Tuning) -> Result<Self, CollateError> {
        let mut widgets = Vec::with_capacity(3);
        for i in 0..3 {
            widgets.push(SelectionWidget::attach(&mut doc, i, kind, &tuning)?);
        }
        let tables = [0, 1, 2].map(|i| ResultTable::new(i, kind, tuning.row_offset));
        Ok(Self { doc, kind, tuning, widgets, tables, cursor: None })
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Options widget `i` offered when last read.
    pub fn widget_options(&self, i: usize) -> &[CategoryOption] {
        self.widgets.get(i).map(|w| w.options()).unwrap_or(&[])
    }

    /// Axis widget `i` was last committed to.
    pub fn committed(&self, i: usize) -> Option<&str> {
        self.widgets.get(i).and_then(SelectionWidget::committed)
    }

    /// Last (table 1 row, table 2 row) position visited. Kept after a failure.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn into_document(self) -> D {
        self.doc
    }

    /// Total element/text disagreements absorbed so far, all tables.
    pub fn anomalies(&self) -> usize {
        self.tables.iter().map(ResultTable::anomalies).sum()
    }

    /// Every axis must be offered by every widget. Nothing is clicked.
    pub fn validate_axes(&self, axes: &[String; 3]) -> Result<(), CollateError> {
        for axis in axes {
            for w in &self.widgets {
                if !w.offers(axis) {
                    return Err(CollateError::AxisNotFound { axis: axis.clone(), widget: w.index() });
                }
            }
        }
        Ok(())
    }

    /// Commit widget `i` to `axes[i]`, in widget order.
    pub fn commit_axes(&mut self, axes: &[String; 3]) -> Result<(), CollateError> {
        for (i, axis) in axes.iter().enumerate() {
            self.commit(i, axis)?;
        }
        Ok(())
    }

    pub(super) fn commit(&mut self, widget: usize, axis: &str) -> Result<(), CollateError> {
        let Self { doc, tuning, widgets, tables, .. } = self;
        widgets[widget].commit(doc, axis, tuning)?;
        for t in &mut tables[widget..] {
            t.invalidate();
        }
        Ok(())
    }

    /// Validate, commit `axes` in `assignment` order, then walk.
    /// The result is keyed in widget order.
    pub fn run_traversal(
        &mut self,
        assignment: &AxisPermutation,
        axes: &[String; 3],
        progress: &mut dyn Progress,
    ) -> Result<NestedCounts, CollateError> {
        self.validate_axes(axes)?;
        let ordered = assignment.apply(axes);
        logf!("Committing axes {ordered:?}");
        self.commit_axes(&ordered)?;
        self.traverse(progress)
    }

    /// Walk every (table 1 row, table 2 row) pair with the widgets as they are.
    ///
    /// Table 1 is read until its text and row elements agree. Each level is
    /// then re-walked until what was collected adds up to what the level
    /// above reported, within the walk budget.
    pub fn traverse(&mut self, progress: &mut dyn Progress) -> Result<NestedCounts, CollateError> {
        self.cursor = None;
        self.settle(0)?;
        let expected = self.tables[0].total();
        logf!("Table 1: {} rows, total {expected}", self.tables[0].cached().len());

        let mut pass = 0u32;
        loop {
            pass += 1;
            let mut counts = NestedCounts::new();
            let observed = self.walk_outer(&mut counts, progress)?;
            if observed == expected {
                progress.finish();
                logf!("Collated {} × {} pairs", counts.len(), counts.values().map(BTreeMap::len).sum::<usize>());
                return Ok(counts);
            }
            if self.tuning.walk.exhausted(pass) {
                progress.finish();
                return Err(CollateError::WalkMismatch { level: 1, expected, observed, passes: pass });
            }
            logw!("Table 1 walk collected {observed}, expected {expected}; walking again");
            self.settle(0)?;
        }
    }

    fn walk_outer(
        &mut self,
        counts: &mut NestedCounts,
        progress: &mut dyn Progress,
    ) -> Result<u64, CollateError> {
        progress.begin(self.tables[0].cached().len());
        let mut observed = 0;
        let mut i = 0;
        while i < self.tables[0].cached().len() {
            self.cursor = Some(Cursor { t1: i, t2: None });
            let row = self.click_row_at(0, i)?;
            self.tables[1].invalidate();
            self.tables[2].invalidate();
            self.reconcile(1, row.value)?;
            progress.row_begin(&row.name, self.tables[1].cached().len());

            let children = counts.entry(row.name.clone()).or_default();
            observed += self.walk_inner(i, &row, children, progress)?;
            i += 1;
        }
        Ok(observed)
    }

    fn walk_inner(
        &mut self,
        i: usize,
        parent: &ResultRow,
        children: &mut BTreeMap<String, LeafCounts>,
        progress: &mut dyn Progress,
    ) -> Result<u64, CollateError> {
        let mut pass = 0u32;
        loop {
            pass += 1;
            children.clear();
            let mut observed = 0;
            let mut j = 0;
            while j < self.tables[1].cached().len() {
                self.cursor = Some(Cursor { t1: i, t2: Some(j) });
                let row = self.click_row_at(1, j)?;
                self.tables[2].invalidate();
                self.reconcile(2, row.value)?;

                let leaves: LeafCounts = self.tables[2]
                    .cached()
                    .iter()
                    .map(|r| (r.name.clone(), r.value))
                    .collect();
                observed += self.tables[2].total();
                // a repeated name replaces the earlier read
                children.insert(row.name.clone(), leaves);
                progress.cell_done(&parent.name, &row.name);
                j += 1;
            }

            if observed == parent.value {
                return Ok(observed);
            }
            if self.tuning.walk.exhausted(pass) {
                return Err(CollateError::WalkMismatch {
                    level: 2, expected: parent.value, observed, passes: pass,
                });
            }
            logw!("{:?}: table 2 walk collected {observed}, expected {}; walking again", parent.name, parent.value);
            self.reconcile(1, parent.value)?;
        }
    }

    /// Click row `idx` of table `t` under the click budget. A budget that runs
    /// out gets one recalculation and one more budget; a second failure aborts.
    pub(super) fn click_row_at(&mut self, t: usize, idx: usize) -> Result<ResultRow, CollateError> {
        match self.click_cached(t, idx) {
            Ok(row) => return Ok(row),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => logw!("table {} row {idx}: {e}; recalculating", t + 1),
        }
        self.recalc(t)?;
        self.click_cached(t, idx).map_err(|source| {
            let name = self.tables[t].cached().get(idx).map(|r| r.name.clone()).unwrap_or_default();
            let cursor = self.cursor.map(|c| c.to_string()).unwrap_or_default();
            CollateError::RowClick { table: t + 1, row: idx, name, cursor, source: Box::new(source) }
        })
    }

    fn click_cached(&mut self, t: usize, idx: usize) -> Result<ResultRow, CollateError> {
        let row = self.tables[t]
            .cached()
            .get(idx)
            .cloned()
            .ok_or_else(|| CollateError::ElementNotFound {
                what: format!("row {idx} of table {}", t + 1),
                attempts: 1,
            })?;
        row.click(&mut self.doc, &self.tuning.click)?;
        Ok(row)
    }

    pub(super) fn recalc(&mut self, t: usize) -> Result<(), CollateError> {
        let Self { doc, tables, tuning, .. } = self;
        tables[t].recalculate(doc, &tuning.element)?;
        Ok(())
    }

    /// Re-read table `t` until it is well-formed, under the reconcile budget.
    pub(super) fn settle(&mut self, t: usize) -> Result<(), CollateError> {
        let Self { doc, tables, tuning, .. } = self;
        tables[t].settle(doc, &tuning.element, &tuning.reconcile)?;
        Ok(())
    }

    /// Re-read table `t` until its rows add up to `expected`.
    pub(super) fn reconcile(&mut self, t: usize, expected: u64) -> Result<(), CollateError> {
        let policy = self.tuning.reconcile;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.recalc(t)?;
            let observed = self.tables[t].total();
            if observed == expected {
                return Ok(());
            }
            if policy.exhausted(attempt) {
                return Err(CollateError::Reconciliation { table: t + 1, expected, observed, attempts: attempt });
            }
            logd!("table {}: sum {observed} != {expected} (attempt {attempt})", t + 1);
            policy.pause();
        }
    }
}

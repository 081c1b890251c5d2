// src/engine/optimize.rs
//! Axis ordering that minimizes page interactions.
//!
//! Outer axis: fewest table-1 rows. Middle axis: fewest table-2 rows on
//! average over the outer axis' rows. Inner axis: the remaining one.

use super::error::CollateError;
use super::traverse::Collator;
use super::types::AxisPermutation;
use crate::core::Document;

/// Index of the smallest cardinality; first wins ties.
pub fn pick_outer(cardinalities: &[usize; 3]) -> usize {
    let mut best = 0;
    for (i, &c) in cardinalities.iter().enumerate() {
        if c < cardinalities[best] {
            best = i;
        }
    }
    best
}

/// Axis of the candidate with the smallest average; first wins ties.
pub fn pick_middle(candidates: &[(usize, f64)]) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for &(axis, avg) in candidates {
        if best.is_none_or(|(_, b)| avg < b) {
            best = Some((axis, avg));
        }
    }
    best.map_or(0, |(axis, _)| axis)
}

impl<D: Document> Collator<D> {
    /// Probe the page and return the widget order to traverse `axes` in.
    ///
    /// Leaves the widgets committed to the outer and middle probes. Any failure
    /// while probing aborts; there is no fallback to the given order.
    pub fn optimize_axes(&mut self, axes: &[String; 3]) -> Result<AxisPermutation, CollateError> {
        self.validate_axes(axes)?;
        let perm = self.probe(axes).map_err(|e| CollateError::Optimize(Box::new(e)))?;
        logf!("Optimized axis order: {:?}", perm.apply(axes));
        Ok(perm)
    }

    fn probe(&mut self, axes: &[String; 3]) -> Result<AxisPermutation, CollateError> {
        let mut cards = [0usize; 3];
        for (c, axis) in axes.iter().enumerate() {
            self.commit(0, axis)?;
            self.settle(0)?;
            cards[c] = self.tables[0].cached().len();
            logd!("probe: {axis:?} has {} table-1 rows", cards[c]);
        }
        let outer = pick_outer(&cards);

        self.commit(0, &axes[outer])?;
        self.settle(0)?;

        let mut averages = Vec::with_capacity(2);
        for c in (0..3).filter(|&c| c != outer) {
            self.commit(1, &axes[c])?;
            let avg = self.average_children()?;
            logd!("probe: {:?} averages {avg:.2} table-2 rows", axes[c]);
            averages.push((c, avg));
        }
        let middle = pick_middle(&averages);
        let inner = 3 - outer - middle;

        AxisPermutation::new([outer, middle, inner])
    }

    /// Average table-2 row count over every table-1 row. A click that runs out
    /// of budget aborts the probe.
    fn average_children(&mut self) -> Result<f64, CollateError> {
        let rows = self.tables[0].cached().to_vec();
        if rows.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0usize;
        for row in &rows {
            row.click(&mut self.doc, &self.tuning.click)?;
            self.tables[1].invalidate();
            self.tables[2].invalidate();
            self.reconcile(1, row.value)?;
            total += self.tables[1].cached().len();
        }
        Ok(total as f64 / rows.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_is_first_minimum() {
        assert_eq!(pick_outer(&[10, 3, 7]), 1);
        assert_eq!(pick_outer(&[4, 9, 4]), 0);
        assert_eq!(pick_outer(&[5, 5, 5]), 0);
    }

    #[test]
    fn middle_tie_goes_to_first_candidate() {
        assert_eq!(pick_middle(&[(0, 2.5), (2, 2.5)]), 0);
        assert_eq!(pick_middle(&[(2, 2.5), (0, 2.5)]), 2);
        assert_eq!(pick_middle(&[(0, 4.0), (1, 1.5)]), 1);
    }
}

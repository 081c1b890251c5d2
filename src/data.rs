// src/data.rs
//
// Table shapes handed to the GUI and to export.
//
// - DataSet: headers + string rows, the common currency of copy/export/display.
// - CrossTab: the collated counts re-keyed into the user's axis order, with
//             every (axis 1, axis 2) combination present, sorted, and a Total
//             column.

use std::collections::BTreeSet;

use crate::engine::{AxisPermutation, NestedCounts};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossTab {
    /// Axis names in the user's order.
    pub axes: [String; 3],
    /// (axis 1 value, axis 2 value), sorted, full product.
    pub index: Vec<(String, String)>,
    /// Axis 3 values, sorted.
    pub columns: Vec<String>,
    /// `cells[row][col]`, zero where nothing was collected.
    pub cells: Vec<Vec<u64>>,
}

impl CrossTab {
    /// Re-key `counts` (collected in widget order) into user axis order.
    ///
    /// Widget position `p` showed the user's axis `perm.source(p)`.
    pub fn assemble(counts: &NestedCounts, axes: &[String; 3], perm: &AxisPermutation) -> Self {
        let mut entries: Vec<([&str; 3], u64)> = Vec::new();
        for (k0, mid) in counts {
            for (k1, leaves) in mid {
                for (k2, &v) in leaves {
                    let keys = [k0.as_str(), k1.as_str(), k2.as_str()];
                    let mut user = [""; 3];
                    for (pos, key) in keys.into_iter().enumerate() {
                        user[perm.source(pos)] = key;
                    }
                    entries.push((user, v));
                }
            }
        }

        let mut outer: BTreeSet<&str> = BTreeSet::new();
        let mut middle: BTreeSet<&str> = BTreeSet::new();
        let mut cols: BTreeSet<&str> = BTreeSet::new();
        for ([a, b, c], _) in &entries {
            outer.insert(*a);
            middle.insert(*b);
            cols.insert(*c);
        }
        // pairs collected without leaves still get their categories
        for (k0, mid) in counts {
            for k1 in mid.keys() {
                let mut user = [""; 3];
                user[perm.source(0)] = k0.as_str();
                user[perm.source(1)] = k1.as_str();
                if !user[0].is_empty() { outer.insert(user[0]); }
                if !user[1].is_empty() { middle.insert(user[1]); }
                if !user[2].is_empty() { cols.insert(user[2]); }
            }
        }

        let index: Vec<(String, String)> = outer
            .iter()
            .flat_map(|a| middle.iter().map(move |b| (s!(*a), s!(*b))))
            .collect();
        let columns: Vec<String> = cols.iter().map(|c| s!(*c)).collect();

        let mut cells = vec![vec![0u64; columns.len()]; index.len()];
        for ([a, b, c], v) in entries {
            let (Some(r), Some(col)) = (
                index.iter().position(|(x, y)| x == a && y == b),
                columns.iter().position(|x| x == c),
            ) else {
                continue;
            };
            cells[r][col] += v;
        }

        Self { axes: axes.clone(), index, columns, cells }
    }

    pub fn get(&self, a: &str, b: &str, c: &str) -> u64 {
        let row = self.index.iter().position(|(x, y)| x == a && y == b);
        let col = self.columns.iter().position(|x| x == c);
        match (row, col) {
            (Some(r), Some(c)) => self.cells[r][c],
            _ => 0,
        }
    }

    pub fn row_total(&self, row: usize) -> u64 {
        self.cells.get(row).map_or(0, |r| r.iter().sum())
    }

    pub fn grand_total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// `axis 1, axis 2, <axis 3 values...>, Total`
    pub fn to_dataset(&self) -> DataSet {
        let mut headers = vec![self.axes[0].clone(), self.axes[1].clone()];
        headers.extend(self.columns.iter().cloned());
        headers.push(s!("Total"));

        let rows = self
            .index
            .iter()
            .enumerate()
            .map(|(i, (a, b))| {
                let mut row = vec![a.clone(), b.clone()];
                row.extend(self.cells[i].iter().map(u64::to_string));
                row.push(self.row_total(i).to_string());
                row
            })
            .collect();

        DataSet { headers: Some(headers), rows }
    }
}

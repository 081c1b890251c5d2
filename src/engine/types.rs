// src/engine/types.rs
use std::collections::BTreeMap;
use std::fmt;

use super::error::CollateError;

/// Third-axis category → count.
pub type LeafCounts = BTreeMap<String, u64>;

/// first category → second category → third category → count.
pub type NestedCounts = BTreeMap<String, BTreeMap<String, LeafCounts>>;

/// Position in the (table 1 row, table 2 row) walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub t1: usize,
    pub t2: Option<usize>,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.t2 {
            Some(j) => write!(f, "({}, {})", self.t1, j),
            None => write!(f, "({}, -)", self.t1),
        }
    }
}

/// Which user axis each widget position shows.
///
/// `source(p)` is the index into the user's axis list committed to widget `p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AxisPermutation(pub [usize; 3]);

impl AxisPermutation {
    pub const IDENTITY: AxisPermutation = AxisPermutation([0, 1, 2]);

    pub fn new(order: [usize; 3]) -> Result<Self, CollateError> {
        let mut seen = [false; 3];
        for &i in &order {
            match seen.get_mut(i) {
                Some(s) if !*s => *s = true,
                _ => {
                    return Err(CollateError::InvalidAxes(format!(
                        "{order:?} is not a permutation of 0, 1, 2"
                    )));
                }
            }
        }
        Ok(Self(order))
    }

    pub fn source(&self, position: usize) -> usize {
        self.0[position]
    }

    /// Widget position the user's axis `user_axis` ended up at.
    pub fn position_of(&self, user_axis: usize) -> usize {
        self.0.iter().position(|&s| s == user_axis).unwrap_or(user_axis)
    }

    /// Reorder user-ordered items into widget order.
    pub fn apply<T: Clone>(&self, user: &[T; 3]) -> [T; 3] {
        self.0.map(|s| user[s].clone())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for AxisPermutation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_round_trips_positions() {
        let p = AxisPermutation::new([2, 0, 1]).unwrap();
        let axes = [s!("X"), s!("Y"), s!("Z")];
        assert_eq!(p.apply(&axes), [s!("Z"), s!("X"), s!("Y")]);
        for user in 0..3 {
            assert_eq!(p.source(p.position_of(user)), user);
        }
    }

    #[test]
    fn rejects_non_permutations() {
        assert!(AxisPermutation::new([0, 0, 1]).is_err());
        assert!(AxisPermutation::new([0, 1, 3]).is_err());
    }
}

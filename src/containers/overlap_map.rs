//! C5: the read-mostly container used for variable pairs `(A, goal)` where
//! `A` is not the hypothesis source - built lazily and read via
//! [`OverlapMap::slimest`] during transitive-cover construction.

use log::debug;

use crate::boundary::{self, statement_overlap_index};
use crate::rules;
use crate::statement::Statement;

#[derive(Default)]
pub struct OverlapMap {
    staged: Vec<Statement>,
    normalized: Vec<Statement>,
    initiated: bool,
}

impl OverlapMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statements(statements: Vec<Statement>) -> Self {
        let mut map = OverlapMap {
            staged: statements,
            normalized: Vec::new(),
            initiated: false,
        };
        map.initiate();
        map
    }

    /// Stage a raw statement. Invalidates normalization until the next
    /// `initiate`; a `None` result from whatever produced `statement` is a
    /// no-op, matching the source's "adding None never changes the model".
    pub fn add(&mut self, statement: Option<Statement>) -> bool {
        match statement {
            None => false,
            Some(st) => {
                self.staged.push(st);
                self.initiated = false;
                true
            }
        }
    }

    /// Idempotent normalization: applies `strengthen_multi` over every
    /// occupied boundary segment.
    pub fn initiate(&mut self) {
        if self.initiated {
            return;
        }

        let map = boundary::build(&self.staged);
        self.normalized.clear();
        for window in map.boundaries.windows(2) {
            let (point, next_point) = (window[0], window[1]);
            let here = map.statements_at(point);
            if here.is_empty() {
                continue;
            }
            if let Some(st) = rules::strengthen_multi(point, next_point, here) {
                self.normalized.push(st);
            }
        }
        self.normalized.sort();
        self.initiated = true;
        debug!(
            "OverlapMap::initiate: {} staged -> {} normalized",
            self.staged.len(),
            self.normalized.len()
        );
    }

    /// `JoinMulti` over every normalized statement overlapping `[begin, end]`.
    pub fn slimest(&self, begin: f64, end: f64) -> Option<Statement> {
        match statement_overlap_index(&self.normalized, begin, end) {
            None => None,
            Some((left, right)) => rules::join_multi(&self.normalized[left..right]),
        }
    }

    pub fn get_statements(&self) -> &[Statement] {
        &self.normalized
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality::Mono;

    fn st(b: f64, e: f64, by: f64, ey: f64) -> Statement {
        Statement::new(b, e, Mono, by, ey)
    }

    #[test]
    fn initiate_is_idempotent() {
        let mut map = OverlapMap::from_statements(vec![st(0.0, 2.0, 0.0, 1.0)]);
        let first_len = map.get_statements().len();
        map.initiate();
        assert_eq!(map.get_statements().len(), first_len);
    }

    #[test]
    fn add_none_is_a_no_op() {
        let mut map = OverlapMap::new();
        assert!(!map.add(None));
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn slimest_joins_overlapping_normalized_statements() {
        let mut map = OverlapMap::new();
        map.add(Some(st(0.0, 1.0, 0.0, 1.0)));
        map.add(Some(st(1.0, 2.0, 1.0, 2.0)));
        map.initiate();
        let result = map.slimest(0.0, 2.0).unwrap();
        assert_eq!(result.begin, 0.0);
        assert_eq!(result.end, 2.0);
    }

    #[test]
    fn slimest_with_no_overlap_is_no_conclusion() {
        let map = OverlapMap::from_statements(vec![st(0.0, 1.0, 0.0, 1.0)]);
        assert!(map.slimest(10.0, 20.0).is_none());
    }
}

//! C6: the container used for every `(A, B)` pair on the path to a
//! hypothesis that is not itself the hypothesis pair, or the pair ending at
//! the hypothesis target. Built eagerly: normalize, then run
//! [`boundary::strengthen_height_sides`] once to a fixed point.
//!
//! The transitive-build walk that consumes this container
//! (`interval_height_and_transitives` in the source) needs simultaneous
//! mutable access to the sibling `OverlapMap`s and the `DynamicList`'s
//! search-window state, which a method on this type cannot get without a
//! back-reference into its owning `Solver`. It lives on `Solver` instead
//! (see `Solver::build_transitives`); this container only owns and exposes
//! its own normalized list.

use crate::boundary::{self, strengthen_height_sides};
use crate::rules;
use crate::statement::Statement;

pub struct StaticList {
    normalized: Vec<Statement>,
}

impl StaticList {
    pub fn new(statements: &[Statement]) -> Self {
        let map = boundary::build(statements);
        let mut normalized = Vec::new();
        for window in map.boundaries.windows(2) {
            let (point, next_point) = (window[0], window[1]);
            let here = map.statements_at(point);
            if here.is_empty() {
                continue;
            }
            if let Some(st) = rules::strengthen_multi(point, next_point, here) {
                normalized.push(st);
            }
        }
        normalized.sort();
        strengthen_height_sides(&mut normalized);
        StaticList { normalized }
    }

    pub fn get_statements(&self) -> &[Statement] {
        &self.normalized
    }

    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
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
    fn normalizes_overlapping_statements_into_sorted_segments() {
        let list = StaticList::new(&[st(0.0, 2.0, 0.0, 2.0), st(1.0, 3.0, 1.0, 3.0)]);
        let statements = list.get_statements();
        assert!(statements.windows(2).all(|w| w[0].begin <= w[1].begin));
    }

    #[test]
    fn empty_input_yields_empty_list() {
        let list = StaticList::new(&[]);
        assert!(list.is_empty());
    }
}

//! C7: the container for the hypothesis pair `(influencing, influenced)`
//! itself. Unlike [`crate::containers::static_list::StaticList`] and
//! [`crate::containers::overlap_map::OverlapMap`] it is solved directly
//! twice per [`crate::solver::Solver::solve`] call - once before the
//! transitive cover is built, once after - narrowing a bounded search window
//! (`x_min`/`x_max`, `ov_min`/`ov_max`) so that only the statements actually
//! needed to cover the hypothesis's y-range get normalized.

use std::collections::HashSet;

use log::debug;

use crate::boundary::{self, BoundaryMap};
use crate::quality::Quality;
use crate::rules;
use crate::statement::Statement;

#[derive(Default, Clone, Copy)]
struct SearchDirection {
    left: bool,
    right: bool,
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
struct CorrectBounds {
    lower: bool,
    upper: bool,
}

impl CorrectBounds {
    fn is_empty(&self) -> bool {
        !self.lower && !self.upper
    }
}

/// §4.7's direction/correction table, keyed on `statement`'s quality and
/// which of the hypothesis's y-bounds it violates.
fn search_direction(statement: &Statement, lower_y: f64, upper_y: f64) -> (SearchDirection, CorrectBounds) {
    let mut direction = SearchDirection::default();
    let mut bounds = CorrectBounds::default();

    match statement.quality {
        Quality::Mono => {
            if statement.begin_y < lower_y {
                direction.right = true;
                bounds.lower = true;
            }
            if statement.end_y > upper_y {
                direction.left = true;
                bounds.upper = true;
            }
        }
        Quality::Anti => {
            if statement.begin_y < lower_y {
                direction.left = true;
                bounds.lower = true;
            }
            if statement.end_y > upper_y {
                direction.right = true;
                bounds.upper = true;
            }
        }
        Quality::Cons if statement.begin_y < lower_y || statement.end_y > upper_y => {
            direction.left = true;
            direction.right = true;
            bounds.lower = true;
            bounds.upper = true;
        }
        _ => {}
    }

    (direction, bounds)
}

pub struct DynamicList {
    hypothesis: Statement,
    staged: HashSet<Statement>,
    normalized: Vec<Statement>,
    x_min: f64,
    x_max: f64,
    ov_min: usize,
    ov_max: usize,
}

impl DynamicList {
    pub fn new(hypothesis: Statement, statements: impl IntoIterator<Item = Statement>) -> Self {
        DynamicList {
            hypothesis,
            staged: statements.into_iter().collect(),
            normalized: Vec::new(),
            x_min: f64::NEG_INFINITY,
            x_max: f64::INFINITY,
            ov_min: 0,
            ov_max: 0,
        }
    }

    /// Stage a raw statement. `None` is a no-op, matching every other
    /// container's `add`.
    pub fn add(&mut self, statement: Option<Statement>) -> bool {
        match statement {
            None => false,
            Some(st) => self.staged.insert(st),
        }
    }

    /// Drop the working normalization so a second `solve` can reconsider it
    /// alongside whatever the transitive cover staged in the meantime. The
    /// staged set already holds the re-normalized phase-one statements (see
    /// `build_necessary_statements`), so nothing needs restaging here.
    pub fn reset(&mut self) {
        self.normalized.clear();
    }

    pub fn solve(&mut self) -> bool {
        if self.staged.is_empty() {
            return false;
        }

        let statements: Vec<Statement> = self.staged.drain().collect();
        let map = boundary::build(&statements);
        self.build_necessary_statements(&map);
        let result = self.check_slimest_enveloping();
        debug!("DynamicList::solve: {}", result);
        result
    }

    fn build_necessary_statements(&mut self, map: &BoundaryMap) {
        let (lower, upper) = (self.hypothesis.begin, self.hypothesis.end);
        let (lower_y, upper_y) = (self.hypothesis.begin_y, self.hypothesis.end_y);

        let (begin, raw_end) = boundary::overlap_index(&map.boundaries, lower, upper);
        // `raw_end` is an exclusive bisect result and can reach
        // `boundaries.len()`; clamp to the last valid segment start so
        // `boundaries[i + 1]` never runs off the end, and use the clamped
        // value everywhere below so `ov_max` stays in step with how many
        // segments actually get pushed onto `normalized`.
        let end = if map.boundaries.is_empty() {
            0
        } else {
            raw_end.min(map.boundaries.len() - 1)
        };

        let mut exceeding: Vec<Statement> = Vec::new();
        for i in begin..end {
            let point = map.boundaries[i];
            let here = map.statements_at(point);
            if here.is_empty() {
                continue;
            }
            let next_point = map.boundaries[i + 1];
            if let Some(st) = rules::strengthen_multi(point, next_point, here) {
                if st.exceeds_height(lower_y, upper_y) {
                    exceeding.push(st);
                }
                self.normalized.push(st);
                self.staged.insert(st);
            }
        }

        self.ov_min = 0;
        self.ov_max = end.saturating_sub(begin);

        if exceeding.is_empty() {
            return;
        }

        let (dir_left, mut bounds_left) = search_direction(&exceeding[0], lower_y, upper_y);
        let (dir_right, mut bounds_right) = search_direction(&exceeding[exceeding.len() - 1], lower_y, upper_y);

        if exceeding[0] == self.normalized[0] && dir_left.left {
            for i in (0..begin).rev() {
                let point = map.boundaries[i];
                let here = map.statements_at(point);
                if here.is_empty() {
                    continue;
                }
                let next_point = map.boundaries[i + 1];
                if next_point < self.x_min {
                    break;
                }
                if let Some(st) = rules::strengthen_multi(point, next_point, here) {
                    self.normalized.insert(0, st);
                    self.staged.insert(st);
                    self.ov_min += 1;
                    self.ov_max += 1;

                    if bounds_left.upper && st.end_y <= upper_y {
                        bounds_left.upper = false;
                    }
                    if bounds_left.lower && st.begin_y >= lower_y {
                        bounds_left.lower = false;
                    }
                    if bounds_left.is_empty() {
                        self.x_min = st.end;
                    }
                }
            }
        }

        if exceeding[exceeding.len() - 1] == *self.normalized.last().unwrap() && dir_right.right {
            for i in end..map.boundaries.len().saturating_sub(1) {
                let point = map.boundaries[i];
                let here = map.statements_at(point);
                if here.is_empty() {
                    continue;
                }
                let next_point = map.boundaries[i + 1];
                if point > self.x_max {
                    break;
                }
                if let Some(st) = rules::strengthen_multi(point, next_point, here) {
                    self.normalized.push(st);
                    self.staged.insert(st);

                    if bounds_right.upper && st.end_y <= upper_y {
                        bounds_right.upper = false;
                    }
                    if bounds_right.lower && st.begin_y >= lower_y {
                        bounds_right.lower = false;
                    }
                    if bounds_right.is_empty() {
                        self.x_max = st.begin;
                    }
                }
            }
        }

        boundary::strengthen_height_sides(&mut self.normalized);
    }

    /// `JoinMulti` over `N[ov_min..ov_max]`, then `Fact` against the
    /// hypothesis. A successful result is appended to `normalized` purely for
    /// inspection afterwards; it plays no further role in solving.
    fn check_slimest_enveloping(&mut self) -> bool {
        if self.ov_min >= self.ov_max || self.ov_max > self.normalized.len() {
            return false;
        }

        let joined = rules::join_multi(&self.normalized[self.ov_min..self.ov_max]);
        let proven = rules::fact(&self.hypothesis, joined);
        if proven {
            if let Some(st) = joined {
                self.normalized.push(st);
            }
        }
        proven
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
    use crate::quality::Quality::{Cons, Mono};

    fn st(b: f64, e: f64, q: Quality, by: f64, ey: f64) -> Statement {
        Statement::new(b, e, q, by, ey)
    }

    #[test]
    fn solves_when_evidence_already_envelops_and_is_strong_enough() {
        let hypothesis = st(0.0, 5.0, Mono, 1.0, 4.0);
        let mut list = DynamicList::new(hypothesis, vec![st(-1.0, 6.0, Cons, 1.0, 4.0)]);
        assert!(list.solve());
    }

    #[test]
    fn fails_when_evidence_does_not_cover_the_hypothesis_x_range() {
        let hypothesis = st(0.0, 5.0, Mono, 1.0, 4.0);
        let mut list = DynamicList::new(hypothesis, vec![st(1.0, 4.0, Cons, 1.0, 4.0)]);
        assert!(!list.solve());
    }

    #[test]
    fn empty_staged_set_is_not_proven() {
        let hypothesis = st(0.0, 5.0, Mono, 1.0, 4.0);
        let mut list = DynamicList::new(hypothesis, vec![]);
        assert!(!list.solve());
    }

    #[test]
    fn reset_clears_normalization_but_keeps_staged_evidence_for_a_second_pass() {
        let hypothesis = st(0.0, 5.0, Mono, 1.0, 4.0);
        let mut list = DynamicList::new(hypothesis, vec![st(1.0, 4.0, Cons, 1.0, 4.0)]);
        assert!(!list.solve());
        list.reset();
        assert!(list.is_empty());
        list.add(Some(st(-1.0, 6.0, Cons, 1.0, 4.0)));
        assert!(list.solve());
    }
}

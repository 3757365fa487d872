//! Shared boundary-sweep utility used by every statement container: turn a
//! set of statements into a sorted list of distinct x-endpoints plus a map
//! from each endpoint to the statements covering the segment starting there.

use rustc_hash::FxHashMap;

use crate::quality::Quality;
use crate::rules;
use crate::statement::Statement;
use ordered_float::OrderedFloat;

/// Sorted boundaries plus the per-boundary overlap sets built by
/// [`build`].
pub struct BoundaryMap {
    pub boundaries: Vec<f64>,
    pub overlap: FxHashMap<OrderedFloat<f64>, Vec<Statement>>,
}

impl BoundaryMap {
    pub fn statements_at(&self, boundary: f64) -> &[Statement] {
        self.overlap
            .get(&OrderedFloat(boundary))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Build a [`BoundaryMap`] over `statements`.
///
/// For every statement, both its endpoints become boundaries. A sweep over
/// the sorted boundaries carries forward the set of statements still "open"
/// (whose range has not yet ended), so that after the sweep
/// `overlap[boundary]` lists exactly the statements whose x-range strictly
/// contains `boundary` as the left edge of a segment - i.e. every statement
/// covering `[boundary, next_boundary]`.
pub fn build(statements: &[Statement]) -> BoundaryMap {
    let mut overlap: FxHashMap<OrderedFloat<f64>, Vec<Statement>> = FxHashMap::default();
    let mut boundary_set: Vec<f64> = Vec::new();

    for &st in statements {
        for bound in [st.begin, st.end] {
            let key = OrderedFloat(bound);
            if !overlap.contains_key(&key) {
                overlap.insert(key, Vec::new());
                boundary_set.push(bound);
            }
        }
        let begin_entry = overlap.get_mut(&OrderedFloat(st.begin)).unwrap();
        if !begin_entry.contains(&st) {
            begin_entry.push(st);
        }
        let end_entry = overlap.get_mut(&OrderedFloat(st.end)).unwrap();
        if !end_entry.contains(&st) {
            end_entry.push(st);
        }
    }

    boundary_set.sort_by(|a, b| OrderedFloat(*a).cmp(&OrderedFloat(*b)));
    boundary_set.dedup_by_key(|b| OrderedFloat(*b));

    // Sweep left to right. `open` carries the statements known to cover the
    // segment ending at the current boundary; at each boundary, statements
    // that close here are dropped and the rest are folded into this
    // boundary's entry before becoming the `open` set for the next step.
    let mut open: Vec<Statement> = Vec::new();
    for &bound in &boundary_set {
        let key = OrderedFloat(bound);

        let closing_here: Vec<Statement> = {
            let entry = overlap.get(&key).unwrap();
            open.iter().filter(|st| entry.contains(st)).copied().collect()
        };
        open.retain(|st| !closing_here.contains(st));

        let entry = overlap.get_mut(&key).unwrap();
        entry.retain(|st| !closing_here.contains(st));
        for st in &open {
            if !entry.contains(st) {
                entry.push(*st);
            }
        }

        for &st in entry.iter() {
            if !open.contains(&st) {
                open.push(st);
            }
        }
    }

    BoundaryMap {
        boundaries: boundary_set,
        overlap,
    }
}

/// Find the `[left, right)` index range into `boundaries` covering
/// `[begin, end]`, widening one step to the left so that the segment
/// starting just before `begin` is still included.
pub fn overlap_index(boundaries: &[f64], begin: f64, end: f64) -> (usize, usize) {
    let mut left = boundaries.partition_point(|&b| b < begin);
    if left > 0 {
        left -= 1;
    }
    let right = boundaries.partition_point(|&b| b <= end);
    (left, right)
}

/// Find the `[left, right)` index range into a *sorted normalized statement
/// list* (not a boundary list) whose members overlap `[begin, end]`.
///
/// Mirrors a bisect around a synthetic `(begin, begin, Cons, 0, 0)` probe
/// followed by a linear widen in both directions - the synthetic probe's
/// `Cons` quality sorts before any real statement sharing the same `begin`,
/// so the bisect lands just left of the first candidate.
pub fn statement_overlap_index(statements: &[Statement], begin: f64, end: f64) -> Option<(usize, usize)> {
    let probe = Statement::new(begin, begin, Quality::Cons, 0.0, 0.0);
    let index = statements.partition_point(|s| *s < probe);

    let mut lower = index;
    if index > 0 {
        for i in (0..index).rev() {
            if !statements[i].overlaps(begin, end) {
                break;
            }
            lower = i;
        }
    }

    let mut upper: Option<usize> = if index > 0 { Some(index - 1) } else { None };
    for (i, st) in statements.iter().enumerate().skip(index) {
        if st.begin > end {
            break;
        }
        upper = Some(i);
    }

    match upper {
        Some(upper) if upper >= lower => Some((lower, upper + 1)),
        _ => None,
    }
}

/// Fixed-point left/right sweep applying `strengthen_right`/`strengthen_left`
/// to shrink each statement's y-range using its immediate neighbors, until no
/// further tightening is possible.
pub fn strengthen_height_sides(statements: &mut Vec<Statement>) {
    let mut i = 0usize;
    while i < statements.len() {
        let mut changed = false;
        if i + 1 < statements.len() {
            if let Some(result) = rules::strengthen_left(&statements[i], &statements[i + 1]) {
                statements[i + 1] = result;
                changed = true;
            }
        }
        if i > 0 {
            if let Some(result) = rules::strengthen_right(&statements[i - 1], &statements[i]) {
                statements[i - 1] = result;
                changed = true;
            }
        }
        if changed {
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality::Mono;

    fn st(b: f64, e: f64) -> Statement {
        Statement::new(b, e, Mono, 0.0, 1.0)
    }

    #[test]
    fn boundaries_are_sorted_and_deduped() {
        let map = build(&[st(0.0, 2.0), st(1.0, 3.0), st(2.0, 4.0)]);
        assert_eq!(map.boundaries, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn segment_lists_statements_covering_it() {
        let a = st(0.0, 2.0);
        let b = st(1.0, 3.0);
        let map = build(&[a, b]);
        // [1, 2] is covered by both a and b.
        assert!(map.statements_at(1.0).contains(&a));
        assert!(map.statements_at(1.0).contains(&b));
        // [3, ...] only the right endpoint of b, nothing opens there.
        assert!(map.statements_at(3.0).is_empty() || !map.statements_at(3.0).contains(&a));
    }

    #[test]
    fn overlap_index_widens_one_step_left() {
        let boundaries = vec![0.0, 1.0, 2.0, 3.0];
        let (left, right) = overlap_index(&boundaries, 1.5, 2.5);
        assert_eq!(left, 0);
        assert_eq!(right, 3);
    }
}

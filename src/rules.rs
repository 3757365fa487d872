//! The six pure inference rules of the qualitative calculus. None of these
//! touch containers, the dependency graph, or I/O - each is a free function
//! over `Statement` values that returns `Option<Statement>` ("no conclusion"
//! being the normal, expected outcome for most inputs).

use log::trace;

use crate::quality::Quality;
use crate::statement::Statement;

/// Extend an x-range by joining two contiguous (or overlapping) statements,
/// left-to-right: `a.begin <= b.begin <= a.end <= b.end`.
pub fn join(a: &Statement, b: &Statement) -> Option<Statement> {
    if !(a.begin <= b.begin && b.begin <= a.end && a.end <= b.end) {
        trace!("join: {} / {} not contiguous left-to-right", a, b);
        return None;
    }

    let begin = a.begin.min(b.begin);
    let end = a.end.max(b.end);
    let begin_y = a.begin_y.min(b.begin_y);
    let end_y = a.end_y.max(b.end_y);
    let quality = a.quality.add(b.quality);

    Some(Statement::new(begin, end, quality, begin_y, end_y))
}

/// Reduce `join` along a contiguous chain of statements, in x-order.
/// "No conclusion" if the list is empty or any adjacent pair has a gap.
pub fn join_multi(statements: &[Statement]) -> Option<Statement> {
    let mut iter = statements.iter();
    let first = *iter.next()?;

    let mut acc = first;
    let mut prev = first;
    for &next in iter {
        if prev.distance_to(&next) > 0.0 {
            trace!("join_multi: gap between {} and {}", prev, next);
            return None;
        }
        acc = join(&acc, &next)?;
        prev = next;
    }
    Some(acc)
}

/// Tighten `b`'s y-range using `a`'s quality, when `b`'s x-start lies inside
/// `a`'s x-range. Rejects the result unless it is strictly stronger than `b`.
pub fn strengthen_left(a: &Statement, b: &Statement) -> Option<Statement> {
    if !(a.begin <= b.begin && b.begin <= a.end) {
        return None;
    }

    let (x, y) = (a.begin_y, a.end_y);
    let (lo, hi) = (b.begin_y, b.end_y);

    let candidate = match b.quality {
        Quality::Cons if x < hi => Some(Statement::new(
            b.begin,
            b.end,
            Quality::Cons,
            x.max(lo),
            y.min(hi),
        )),
        Quality::Mono if lo < x && x < hi => Some(Statement::new(b.begin, b.end, Quality::Mono, x, hi)),
        Quality::Anti if lo < y && y < hi => Some(Statement::new(b.begin, b.end, Quality::Anti, lo, y)),
        _ => None,
    }?;

    if candidate.stronger_as(b, None) {
        trace!("strengthen_left: {} tightened by {} -> {}", b, a, candidate);
        Some(candidate)
    } else {
        None
    }
}

/// Symmetric to `strengthen_left`: tighten `a` using `b` when `a`'s x-end
/// lies inside `b`'s x-range.
pub fn strengthen_right(a: &Statement, b: &Statement) -> Option<Statement> {
    if !(b.begin <= a.end && a.end <= b.end) {
        return None;
    }

    let (x, y) = (a.begin_y, a.end_y);
    let (lo, hi) = (b.begin_y, b.end_y);

    // Mirrors the source's nested if/elif exactly: the Anti case only
    // applies in the complementary branch to Cons/Mono, not alongside them.
    let candidate = if x < hi {
        match a.quality {
            Quality::Cons => Some(Statement::new(a.begin, a.end, Quality::Cons, x.max(lo), y.min(hi))),
            Quality::Mono if hi < y => Some(Statement::new(a.begin, a.end, Quality::Mono, x, hi)),
            _ => None,
        }
    } else if a.quality == Quality::Anti && x < lo && lo < y {
        Some(Statement::new(a.begin, a.end, Quality::Anti, lo, y))
    } else {
        None
    }?;

    if candidate.stronger_as(a, None) {
        trace!("strengthen_right: {} tightened by {} -> {}", a, b, candidate);
        Some(candidate)
    } else {
        None
    }
}

/// Canonical refinement over a set of statements that all cover `[p, q]`:
/// the tightest shared y-range, with quality reduced by `min`.
///
/// Every statement in `statements` is assumed to overlap `[p, q]`; the
/// result spans exactly `[p, q]`, one per occupied boundary segment.
pub fn strengthen_multi(p: f64, q: f64, statements: &[Statement]) -> Option<Statement> {
    let mut iter = statements.iter();
    let first = iter.next()?;

    let mut begin_y = first.begin_y;
    let mut end_y = first.end_y;
    let mut quality = first.quality;
    for st in iter {
        begin_y = begin_y.max(st.begin_y);
        end_y = end_y.min(st.end_y);
        quality = quality.min(st.quality);
    }

    Some(Statement::new(p, q, quality, begin_y, end_y))
}

/// Compose `a: X -> Y` with `b: Y -> Z` into a single `X -> Z` statement.
/// Requires `a`'s y-range to be contained in `b`'s x-range.
pub fn transitivity(a: &Statement, b: &Statement) -> Option<Statement> {
    if !(a.begin_y >= b.begin && a.end_y <= b.end) {
        trace!("transitivity: {} y-range not covered by {}", a, b);
        return None;
    }

    Some(Statement::new(
        a.begin,
        a.end,
        a.quality.times(b.quality),
        b.begin_y,
        b.end_y,
    ))
}

/// Is hypothesis `h` proven by statement `s`?
///
/// `s` must envelop `h`'s x-range, have a y-range contained in `h`'s, and a
/// quality at least as strong as `h`'s.
pub fn fact(h: &Statement, s: Option<Statement>) -> bool {
    match s {
        None => false,
        Some(s) => {
            s.enveloping(h.begin, h.end)
                && s.begin_y >= h.begin_y
                && s.end_y <= h.end_y
                && s.quality.stronger_as(h.quality)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality::*;

    fn st(b: f64, e: f64, q: Quality, by: f64, ey: f64) -> Statement {
        Statement::new(b, e, q, by, ey)
    }

    #[test]
    fn join_extends_and_adds_quality() {
        let a = st(0.0, 2.0, Mono, 0.0, 1.0);
        let b = st(1.0, 3.0, Anti, 0.5, 2.0);
        let joined = join(&a, &b).unwrap();
        assert_eq!(joined.begin, 0.0);
        assert_eq!(joined.end, 3.0);
        assert_eq!(joined.begin_y, 0.0);
        assert_eq!(joined.end_y, 2.0);
        assert_eq!(joined.quality, Arb);
    }

    #[test]
    fn join_rejects_out_of_order_pairs() {
        let a = st(2.0, 4.0, Mono, 0.0, 1.0);
        let b = st(0.0, 1.0, Mono, 0.0, 1.0);
        assert!(join(&a, &b).is_none());
    }

    #[test]
    fn join_multi_chains_three_statements() {
        let a = st(0.0, 1.0, Mono, 0.0, 1.0);
        let b = st(1.0, 2.0, Mono, 1.0, 2.0);
        let c = st(2.0, 3.0, Mono, 2.0, 3.0);
        let result = join_multi(&[a, b, c]).unwrap();
        assert_eq!(result.begin, 0.0);
        assert_eq!(result.end, 3.0);
        assert_eq!(result.quality, Mono);
    }

    #[test]
    fn join_multi_rejects_gaps() {
        let a = st(0.0, 1.0, Mono, 0.0, 1.0);
        let c = st(2.0, 3.0, Mono, 2.0, 3.0);
        assert!(join_multi(&[a, c]).is_none());
    }

    #[test]
    fn join_multi_empty_is_no_conclusion() {
        assert!(join_multi(&[]).is_none());
    }

    #[test]
    fn strengthen_multi_takes_tightest_common_band() {
        let a = st(0.0, 5.0, Mono, 0.0, 4.0);
        let b = st(0.0, 5.0, Mono, 1.0, 3.0);
        let result = strengthen_multi(0.0, 5.0, &[a, b]).unwrap();
        assert_eq!(result.begin_y, 1.0);
        assert_eq!(result.end_y, 3.0);
        assert_eq!(result.quality, Mono);
    }

    #[test]
    fn transitivity_requires_covered_y_range() {
        let a = st(0.0, 1.0, Mono, 0.0, 1.0);
        let b = st(0.5, 2.0, Mono, 10.0, 20.0);
        assert!(transitivity(&a, &b).is_none());
    }

    #[test]
    fn transitivity_composes_quality_and_takes_outer_ranges() {
        let a = st(0.0, 1.0, Anti, 0.0, 1.0);
        let b = st(-1.0, 2.0, Anti, 5.0, 6.0);
        let result = transitivity(&a, &b).unwrap();
        assert_eq!(result.begin, 0.0);
        assert_eq!(result.end, 1.0);
        assert_eq!(result.begin_y, 5.0);
        assert_eq!(result.end_y, 6.0);
        assert_eq!(result.quality, Mono);
    }

    #[test]
    fn fact_requires_envelope_and_strength() {
        let h = st(0.0, 5.0, Mono, 2.0, 3.0);
        let strong = st(-1.0, 6.0, Cons, 2.0, 3.0);
        assert!(fact(&h, Some(strong)));

        let too_narrow_x = st(1.0, 4.0, Cons, 2.0, 3.0);
        assert!(!fact(&h, Some(too_narrow_x)));

        assert!(!fact(&h, None));
    }
}

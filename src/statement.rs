use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::error::{Axis, InfluenceError};
use crate::quality::Quality;

/// Immutable record of the form "while x is in `[begin, end]`, y is known to
/// lie in `[begin_y, end_y]` with relationship `quality`".
///
/// `Statement` is value-typed and `Copy`: containers freely duplicate it
/// rather than share references, matching the solver's single-threaded,
/// lock-free ownership model.
#[derive(Copy, Clone, Debug)]
pub struct Statement {
    pub begin: f64,
    pub end: f64,
    pub quality: Quality,
    pub begin_y: f64,
    pub end_y: f64,
}

impl Statement {
    /// Build a statement, trusting the caller that both ranges are already
    /// ordered. Used internally by the rule engine, which only ever produces
    /// ordered ranges from ordered inputs.
    pub fn new(begin: f64, end: f64, quality: Quality, begin_y: f64, end_y: f64) -> Self {
        debug_assert!(begin <= end, "unordered x-range ({}, {})", begin, end);
        debug_assert!(begin_y <= end_y, "unordered y-range ({}, {})", begin_y, end_y);
        Statement {
            begin,
            end,
            quality,
            begin_y,
            end_y,
        }
    }

    /// Build a statement from caller-supplied (possibly unordered) bounds,
    /// the public entry point for the 5-tuple wire format.
    pub fn try_new(
        begin: f64,
        end: f64,
        quality: Quality,
        begin_y: f64,
        end_y: f64,
    ) -> Result<Self, InfluenceError> {
        if begin > end {
            return Err(InfluenceError::BadRange {
                axis: Axis::X,
                begin,
                end,
            });
        }
        if begin_y > end_y {
            return Err(InfluenceError::BadRange {
                axis: Axis::Y,
                begin: begin_y,
                end: end_y,
            });
        }
        Ok(Statement::new(begin, end, quality, begin_y, end_y))
    }

    /// Does `[p, q]` overlap this statement's x-range?
    pub fn overlaps(&self, p: f64, q: f64) -> bool {
        p <= self.end && q >= self.begin
    }

    /// Does `[p, q]` overlap this statement's y-range?
    pub fn overlaps_y(&self, p: f64, q: f64) -> bool {
        p <= self.end_y && q >= self.begin_y
    }

    /// Is this statement's x-range enveloped by `[p, q]`?
    pub fn enveloped_by(&self, p: f64, q: f64) -> bool {
        p <= self.begin && q >= self.end
    }

    /// Does this statement's x-range envelop `[p, q]`?
    pub fn enveloping(&self, p: f64, q: f64) -> bool {
        p >= self.begin && q <= self.end
    }

    pub fn contains_point(&self, p: f64) -> bool {
        self.begin <= p && p <= self.end
    }

    /// Zero if the x-ranges overlap, else the size of the gap between them.
    pub fn distance_to(&self, other: &Statement) -> f64 {
        if self.overlaps(other.begin, other.end) {
            return 0.0;
        }
        if self.begin < other.begin {
            other.begin - self.end
        } else {
            self.begin - other.end
        }
    }

    /// Does the y-range fall outside `[lower, upper]`?
    pub fn exceeds_height(&self, lower: f64, upper: f64) -> bool {
        self.begin_y < lower || self.end_y > upper
    }

    /// Is `self` strictly stronger than `other`: a dominating quality,
    /// covering `other`'s x-range, with a y-range contained in `other`'s (or,
    /// failing that, within an externally supplied height window)?
    pub fn stronger_as(&self, other: &Statement, height: Option<(f64, f64)>) -> bool {
        self.quality.stronger_as(other.quality)
            && self.begin <= other.begin
            && self.end >= other.end
            && ((self.begin_y >= other.begin_y && self.end_y <= other.end_y)
                || height.map_or(false, |(lo, hi)| lo <= self.begin_y && hi >= self.end_y))
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin
            && self.end == other.end
            && self.quality == other.quality
            && self.begin_y == other.begin_y
            && self.end_y == other.end_y
    }
}
impl Eq for Statement {}

impl std::hash::Hash for Statement {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        OrderedFloat(self.begin).hash(state);
        OrderedFloat(self.end).hash(state);
        (self.quality as u8).hash(state);
        OrderedFloat(self.begin_y).hash(state);
        OrderedFloat(self.end_y).hash(state);
    }
}

/// Total ordering: primary by `begin` ascending, secondary by `stronger_as`
/// on quality (the stronger statement sorts first). Note this tie-break is
/// not itself a total order when two qualities are incomparable (`Mono` vs
/// `Anti`) - that mirrors the source container's sort key exactly, and the
/// containers only ever rely on the `begin`-ordering being total.
impl Ord for Statement {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.begin != other.begin {
            return OrderedFloat(self.begin).cmp(&OrderedFloat(other.begin));
        }
        if self.quality == other.quality {
            return Ordering::Equal;
        }
        if self.quality.stronger_as(other.quality) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl PartialOrd for Statement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Statement({}, {}, {:?}, {}, {})",
            self.begin, self.end, self.quality, self.begin_y, self.end_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Quality::*;

    fn st(b: f64, e: f64, q: crate::quality::Quality, by: f64, ey: f64) -> Statement {
        Statement::new(b, e, q, by, ey)
    }

    #[test]
    fn try_new_rejects_bad_x_range() {
        let err = Statement::try_new(5.0, 1.0, Mono, 0.0, 1.0).unwrap_err();
        matches_bad_range_x(&err);
    }

    fn matches_bad_range_x(err: &InfluenceError) {
        match err {
            InfluenceError::BadRange { axis, .. } => assert_eq!(*axis, Axis::X),
            _ => panic!("expected BadRange on X"),
        }
    }

    #[test]
    fn overlaps_is_inclusive_on_touch() {
        let s = st(0.0, 5.0, Mono, 0.0, 1.0);
        assert!(s.overlaps(5.0, 6.0));
        assert!(s.overlaps(-1.0, 0.0));
        assert!(!s.overlaps(5.1, 6.0));
    }

    #[test]
    fn enveloping_and_enveloped_by_are_symmetric_views() {
        let s = st(2.0, 4.0, Mono, 0.0, 1.0);
        assert!(s.enveloping(2.5, 3.5));
        assert!(s.enveloped_by(1.0, 5.0));
        assert!(!s.enveloping(1.0, 5.0));
    }

    #[test]
    fn distance_to_is_zero_on_overlap() {
        let a = st(0.0, 2.0, Mono, 0.0, 1.0);
        let b = st(1.0, 3.0, Mono, 0.0, 1.0);
        assert_eq!(a.distance_to(&b), 0.0);
    }

    #[test]
    fn distance_to_measures_gap() {
        let a = st(0.0, 2.0, Mono, 0.0, 1.0);
        let b = st(5.0, 6.0, Mono, 0.0, 1.0);
        assert_eq!(a.distance_to(&b), 3.0);
        assert_eq!(b.distance_to(&a), 3.0);
    }

    #[test]
    fn stronger_as_requires_covering_x_and_contained_y() {
        let strong = st(0.0, 5.0, Cons, 1.0, 2.0);
        let weak = st(1.0, 4.0, Mono, 0.5, 2.5);
        assert!(strong.stronger_as(&weak, None));
        assert!(!weak.stronger_as(&strong, None));
    }

    #[test]
    fn ordering_is_primarily_by_begin() {
        let a = st(0.0, 1.0, Mono, 0.0, 1.0);
        let b = st(1.0, 2.0, Mono, 0.0, 1.0);
        assert!(a < b);
    }

    #[test]
    fn ordering_ties_break_on_strength() {
        let cons = st(0.0, 1.0, Cons, 0.0, 1.0);
        let mono = st(0.0, 1.0, Mono, 0.0, 1.0);
        assert!(cons < mono);
    }
}

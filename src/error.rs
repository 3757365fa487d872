use failure::Fail;

/// Which axis of a statement a `BadRange` complaint refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Every fallible outcome the solver's public API can produce.
///
/// An unprovable hypothesis is *not* one of these - `Solver::solve` always
/// returns a plain `bool`.
#[derive(Debug, Fail)]
pub enum InfluenceError {
    #[fail(
        display = "adding ({} -> {}) would close a cycle in the dependency graph",
        influencing, influenced
    )]
    CycleRejected {
        influencing: String,
        influenced: String,
    },

    #[fail(display = "bad {} range: begin {} > end {}", axis, begin, end)]
    BadRange { axis: Axis, begin: f64, end: f64 },

    #[fail(display = "unknown quality: {:?}", raw)]
    UnknownQuality { raw: String },

    #[fail(display = "statement was never staged under ({}, {})", influencing, influenced)]
    NotStaged {
        influencing: String,
        influenced: String,
    },
}

//! Qualitative influence reasoner: a solver over statements of the form
//! "while x lies in `[x0, x1]`, y is known to lie in `[y0, y1]` with
//! monotone/anti-monotone/constant/arbitrary relationship Q", composed
//! transitively along a dependency graph of variables.

pub mod boundary;
pub mod containers;
pub mod error;
pub mod graph;
pub mod quality;
pub mod rules;
pub mod solver;
pub mod statement;

pub use error::InfluenceError;
pub use quality::Quality;
pub use solver::Solver;
pub use statement::Statement;

//! Small utilities around `oxidd` Boolean functions that are shared by the
//! arena/solver crate and by its tests: enumerating the cubes of a BDD and
//! formatting them for display, and building random BDDs for property tests.
#![forbid(unsafe_code)]

mod cube_iter;
mod format;
mod random_bdd;

pub use cube_iter::*;
pub use format::*;
pub use random_bdd::*;

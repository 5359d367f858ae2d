//! Small utilities shared across the workspace: the error type, a tagged-index
//! newtype, a timing harness, and test helpers (seeded randomness, a
//! test-scoped logger).
#![forbid(unsafe_code)]

mod error;
mod random_test;
mod tagged_index;
mod test_logger;
mod timing;

pub use error::*;
pub use random_test::*;
pub use tagged_index::*;
pub use test_logger::*;
pub use timing::*;

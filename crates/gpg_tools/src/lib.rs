//! `clap`-based flags shared between command-line tools in this workspace.
pub mod verbosity;

pub use verbosity::*;

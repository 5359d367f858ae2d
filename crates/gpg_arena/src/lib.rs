//! Symbolic BDD-based arenas for generalized parity games: the data model
//! (§3), the attractor kernel and Büchi solvers (§4.2-4.5), the recursive
//! solvers (§4.6-4.7), file-format loaders, and `.dot` display (§6).
#![forbid(unsafe_code)]

mod arena;
mod attractor;
mod automata_input;
mod buchi;
mod dot;
mod generalized_buchi;
mod generalized_zielonka;
mod io;
mod io_gpg;
mod io_pg;
mod player;
mod random_arena;
mod zielonka;

pub use arena::*;
pub use attractor::*;
pub use automata_input::*;
pub use buchi::*;
pub use dot::*;
pub use generalized_buchi::*;
pub use generalized_zielonka::*;
pub use io::*;
pub use io_gpg::*;
pub use io_pg::*;
pub use player::*;
pub use random_arena::*;
pub use zielonka::*;

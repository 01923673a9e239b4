//! Interactive command handling.

pub mod grammar;
pub mod repl;

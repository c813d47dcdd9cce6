//! External process execution

mod runner;

pub use runner::{run, ExecutionResult};

//! Execution wrapper: runs one tool as an isolated child process.

pub mod executor;

pub use executor::{Interpreter, ToolRunner};

//! A small interactive command interpreter with job-control-aware startup.
//!
//! This crate provides the building blocks of a minimal shell: a tokenizer
//! that splits input lines into argument vectors, a set of built-in commands
//! executed in-process, a launcher for external programs that hands them a
//! sane signal disposition, and a [`Session`] that claims the controlling
//! terminal at startup the way an interactive shell must.
//!
//! The main entry point is [`Interpreter`], which dispatches one command per
//! line through a chain of pluggable factories. The public modules expose the
//! pieces individually for embedding and testing.
//!
//! [`Session`]: session::Session

mod builtin;
pub mod command;
pub mod error;
mod external;
mod interpreter;
pub mod lexer;
pub mod session;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

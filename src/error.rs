use std::collections::TryReserveError;
use std::io;

use nix::errno::Errno;
use thiserror::Error;

/// Errors surfaced to the read loop.
///
/// Every variant aborts only the current line; none of them terminates the
/// interpreter. There are no retries: each failure is reported and the loop
/// moves on to the next prompt.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Token storage could not grow while splitting an input line.
    #[error("tokenize: out of memory")]
    OutOfMemory(#[from] TryReserveError),

    /// `cd` could not reach its target; the working directory is unchanged.
    #[error("cd: {0}")]
    DirectoryChange(#[source] io::Error),

    /// The launcher could not create a child process.
    #[error("fork: {}", .0.desc())]
    ProcessCreation(Errno),

    /// A terminal or signal syscall failed while claiming the terminal.
    #[error("terminal: {}", .0.desc())]
    Terminal(Errno),
}

use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::error::ShellError;
use crate::interpreter::Factory;
use crate::session::Session;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::io::Write;
use std::path::PathBuf;

/// Base index for the numbered `history` listing.
const HISTORY_BASE: usize = 1;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Executes the command against the session.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for
    /// failure.
    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode> {
        match T::execute(*self, stdout, session) {
            Ok(code) => Ok(code),
            Err(e) => {
                // Built-in failures never take down the session; they are
                // reported and turned into a non-zero exit code.
                eprintln!("{e}");
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<ExitCode> {
        stdout.write_all(self.output.as_bytes())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _session: &Session,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Terminate the shell with status 0.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored; exit always reports status 0 regardless of arguments
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        // The read loop observes the flag and stops; the process itself
        // exits 0 from main after the session is dropped.
        session.request_exit();
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// With no target, changes to $HOME, falling back to the invoking user's
/// registered home directory when HOME is unset.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; defaults to the home directory when omitted
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => home_dir(session)?,
        };
        env::set_current_dir(&target).map_err(ShellError::DirectoryChange)?;
        Ok(0)
    }
}

/// Resolve the directory `cd` falls back to: $HOME from the session
/// snapshot, else the user database entry for the invoking user.
fn home_dir(session: &Session) -> Result<PathBuf> {
    if let Some(home) = session.var("HOME") {
        return Ok(PathBuf::from(home));
    }
    let user = nix::unistd::User::from_uid(nix::unistd::getuid())?;
    user.map(|u| u.dir)
        .ok_or_else(|| anyhow::anyhow!("cd: cannot determine home directory"))
}

#[derive(FromArgs)]
/// List the commands entered this session, oldest first.
pub struct History {}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        for (i, line) in session.history().iter().enumerate() {
            writeln!(stdout, "{}  {}", HISTORY_BASE + i, line)?;
        }
        Ok(0)
    }
}

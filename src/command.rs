use crate::session::Session;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// A tokenized input line.
///
/// `argv[0]` names the command (built-in or external program); the remaining
/// elements are its arguments. A `Command` is produced fresh per input line
/// and consumed by exactly one dispatch attempt. No element is ever empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
}

impl Command {
    /// Wrap an argument vector, returning `None` for an empty one
    /// (a blank input line names no command).
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    /// The command name, `argv[0]`.
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    /// The arguments after the command name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// The full argument vector including the name.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by the external
/// command launcher.
pub trait ExecutableCommand {
    /// Executes the command, writing user-visible output to `stdout`.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`; the
/// interpreter then asks the next factory in its chain. An unmatched name
/// falling through every built-in factory is what "not a built-in" means.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        session: &Session,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}

#[cfg(test)]
mod tests {
    use super::Command;

    #[test]
    fn empty_argv_is_no_command() {
        assert!(Command::new(Vec::new()).is_none());
    }

    #[test]
    fn name_and_args_split() {
        let cmd = Command::new(vec!["ls".into(), "-l".into(), "/tmp".into()]).unwrap();
        assert_eq!(cmd.name(), "ls");
        assert_eq!(cmd.args(), ["-l".to_string(), "/tmp".to_string()]);
        assert_eq!(cmd.argv().len(), 3);
    }
}

use crate::command::{Command, CommandFactory, ExitCode};
use crate::lexer;
use crate::session::Session;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate — BuiltinCommand and
/// ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell interpreter that executes one command per input line.
///
/// The interpreter owns a [`Session`] and a list of [`CommandFactory`]
/// objects queried in order to create commands by name; built-in factories
/// come first and the external launcher last, so an unrecognized name falls
/// through to a child process. See [`Default`] for the factories included
/// out of the box.
///
/// Example
/// ```
/// use minish::Interpreter;
/// let mut sh = Interpreter::default();
/// let code = sh.run_line("history").unwrap();
/// assert_eq!(code, 0);
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create an interpreter with a custom set of command factories.
    pub fn new(session: Session, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { session, commands }
    }

    /// Create an interpreter with the default factories around an existing
    /// session (typically one that has claimed the terminal).
    pub fn with_session(session: Session) -> Self {
        Self::new(session, Self::default_factories())
    }

    fn default_factories() -> Vec<Box<dyn CommandFactory>> {
        use crate::builtin::{Cd, Exit, History};
        use crate::external::ExternalCommand;
        vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<History>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ]
    }

    /// The interpreter's session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Returns the command's exit code or an error if no factory recognizes
    /// the name or the command fails to execute.
    pub fn run(&mut self, name: &str, args: &[&str]) -> anyhow::Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.session, name, args) {
                return cmd.execute(&mut std::io::stdout(), &mut self.session);
            }
        }
        Err(anyhow::anyhow!("command not found: {}", name))
    }

    /// Tokenize and dispatch one raw input line.
    ///
    /// A blank or all-whitespace line is a successful no-op.
    pub fn run_line(&mut self, line: &str) -> anyhow::Result<ExitCode> {
        let argv = lexer::tokenize(line)?;
        let Some(cmd) = Command::new(argv) else {
            return Ok(0);
        };
        let args: Vec<&str> = cmd.args().iter().map(String::as_str).collect();
        self.run(cmd.name(), &args)
    }

    /// The interactive read loop: prompt, read, dispatch, until `exit`
    /// or end of input.
    ///
    /// Entered lines are recorded both in the line editor and in the
    /// session's mirror, which the `history` builtin reads. Failures are
    /// reported and absorbed; only a broken line editor ends the loop with
    /// an error.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.session.should_exit() {
            match rl.readline(self.session.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                        self.session.push_history(line.trim());
                    }
                    if let Err(e) = self.run_line(&line) {
                        eprintln!("{e}");
                    }
                }
                // SIGINT is ignored process-wide; if the editor still
                // reports an interrupt, just present a fresh prompt.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands —
    /// built-ins `exit`, `cd`, `history`, then the external command
    /// launcher — around a session snapshotting the current environment.
    fn default() -> Self {
        Self::with_session(Session::with_vars(std::env::vars().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::Interpreter;
    use crate::session::Session;
    use std::collections::HashMap;

    fn interpreter() -> Interpreter {
        Interpreter::with_session(Session::with_vars(HashMap::new()))
    }

    #[test]
    fn blank_line_is_a_successful_noop() {
        let mut sh = interpreter();
        assert_eq!(sh.run_line("").unwrap(), 0);
        assert_eq!(sh.run_line("   ").unwrap(), 0);
    }

    #[test]
    fn exit_is_dispatched_as_a_builtin() {
        let mut sh = interpreter();
        assert_eq!(sh.run_line("exit with trailing args").unwrap(), 0);
        assert!(sh.session().should_exit());
    }

    #[test]
    fn cd_failure_is_handled_with_nonzero_code() {
        let mut sh = interpreter();
        let code = sh
            .run_line(&format!("cd /no/such/dir/{}", std::process::id()))
            .unwrap();
        assert_eq!(code, 1);
        assert!(!sh.session().should_exit());
    }

    #[test]
    fn unknown_name_falls_through_to_the_launcher() {
        let mut sh = interpreter();
        // The external factory accepts it; the child fails, the parent
        // discards the status and keeps running.
        let name = format!("no-such-program-{}", std::process::id());
        assert_eq!(sh.run_line(&name).unwrap(), 0);
    }

    #[test]
    fn empty_factory_chain_reports_command_not_found() {
        let mut sh = Interpreter::new(Session::with_vars(HashMap::new()), Vec::new());
        let err = sh.run_line("anything").unwrap_err();
        assert!(err.to_string().contains("command not found"));
    }
}

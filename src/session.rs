use std::collections::HashMap;
use std::env;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, RawFd};

use nix::sys::signal::{killpg, signal, SigHandler, Signal};
use nix::sys::termios::{self, Termios};
use nix::unistd::{self, Pid};

use crate::error::ShellError;

/// Environment variable consulted for the interactive prompt.
pub const PROMPT_VAR: &str = "MY_PROMPT";

const DEFAULT_PROMPT: &str = "shell> ";

/// The terminal-driven signals that coordinate foreground/background
/// process behavior. The interpreter ignores all five while it runs;
/// spawned children get them reset to their default dispositions.
pub(crate) const JOB_CONTROL_SIGNALS: [Signal; 5] = [
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
];

/// Process-wide terminal and signal state, claimed once at startup.
///
/// The foreground-group attribute of the controlling terminal and the
/// signal-disposition table are global OS state; this struct is the only
/// place they are mutated, apart from the child-side reset in the
/// external-command launcher. There is no per-command foreground
/// reassignment: children inherit foreground status through the process
/// group, so concurrent job control is out of scope.
#[derive(Debug)]
pub(crate) struct TerminalState {
    terminal: RawFd,
    interactive: bool,
    pgid: Pid,
    /// Captured when the terminal is claimed. Never restored anywhere;
    /// the shell exits without touching the terminal modes again.
    tmodes: Option<Termios>,
}

impl TerminalState {
    /// Claim the controlling terminal for this process, if there is one.
    ///
    /// When `terminal` is not a TTY this records a non-interactive state
    /// and touches nothing. Otherwise it stops the current process group
    /// with SIGTTIN until the terminal hands it foreground ownership
    /// (covers being launched from a background group), ignores the job
    /// control signals, makes this process its own group leader, installs
    /// that group as the terminal's foreground group, and captures the
    /// terminal modes.
    fn claim(terminal: RawFd) -> Result<Self, ShellError> {
        // SAFETY: `terminal` is the process's stdin, which stays open for
        // the lifetime of the session and is never closed through this fd.
        let fd = unsafe { BorrowedFd::borrow_raw(terminal) };

        if !unistd::isatty(fd).unwrap_or(false) {
            return Ok(Self::detached(terminal));
        }

        loop {
            let pgid = unistd::getpgrp();
            if unistd::tcgetpgrp(fd).map_err(ShellError::Terminal)? == pgid {
                break;
            }
            killpg(pgid, Signal::SIGTTIN).map_err(ShellError::Terminal)?;
        }

        for sig in JOB_CONTROL_SIGNALS {
            // SAFETY: SigIgn installs no handler code, only a disposition.
            unsafe { signal(sig, SigHandler::SigIgn) }.map_err(ShellError::Terminal)?;
        }

        let pgid = unistd::getpid();
        unistd::setpgid(pgid, pgid).map_err(ShellError::Terminal)?;
        unistd::tcsetpgrp(fd, pgid).map_err(ShellError::Terminal)?;
        let tmodes = Some(termios::tcgetattr(fd).map_err(ShellError::Terminal)?);

        Ok(Self {
            terminal,
            interactive: true,
            pgid,
            tmodes,
        })
    }

    /// Terminal state for a session that does not own a terminal.
    fn detached(terminal: RawFd) -> Self {
        Self {
            terminal,
            interactive: false,
            pgid: unistd::getpgrp(),
            tmodes: None,
        }
    }
}

/// One running interpreter instance.
///
/// Owns the claimed terminal state, the resolved prompt, a snapshot of the
/// environment variables, and the mirrored line history that the `history`
/// built-in reads. Created once at startup, dropped at shutdown; the `exit`
/// built-in terminates the session by raising [`Session::should_exit`]
/// rather than killing the process, so teardown stays on the normal path.
#[derive(Debug)]
pub struct Session {
    term: TerminalState,
    prompt: String,
    vars: HashMap<String, String>,
    history: Vec<String>,
    should_exit: bool,
}

impl Session {
    /// Initialize a session on the process's stdin, claiming the terminal
    /// when stdin is one. The prompt is resolved once, from [`PROMPT_VAR`]
    /// with a fixed default, and stays fixed for the session.
    pub fn init() -> Result<Self, ShellError> {
        let vars: HashMap<String, String> = env::vars().collect();
        let term = TerminalState::claim(io::stdin().as_raw_fd())?;
        Ok(Self::assemble(term, vars))
    }

    /// Build a session around an explicit variable snapshot without
    /// touching terminal or signal state. Useful for embedding and for
    /// tests that need deterministic variable lookup.
    pub fn with_vars(vars: HashMap<String, String>) -> Self {
        let term = TerminalState::detached(io::stdin().as_raw_fd());
        Self::assemble(term, vars)
    }

    fn assemble(term: TerminalState, vars: HashMap<String, String>) -> Self {
        let prompt = vars
            .get(PROMPT_VAR)
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());
        Self {
            term,
            prompt,
            vars,
            history: Vec::new(),
            should_exit: false,
        }
    }

    /// The prompt string shown before each input line.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Whether the session owns an interactive terminal.
    pub fn is_interactive(&self) -> bool {
        self.term.interactive
    }

    /// The controlling-terminal file descriptor this session was built on.
    pub fn terminal_fd(&self) -> RawFd {
        self.term.terminal
    }

    /// The session's process group.
    pub fn pgid(&self) -> Pid {
        self.term.pgid
    }

    /// Terminal modes captured when the terminal was claimed, if any.
    /// Stored for a restoration step this shell deliberately does not
    /// perform.
    pub fn saved_terminal_modes(&self) -> Option<&Termios> {
        self.term.tmodes.as_ref()
    }

    /// Look up a variable in the session's snapshot.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Append an entered line to the mirrored history.
    pub fn push_history(&mut self, line: impl Into<String>) {
        self.history.push(line.into());
    }

    /// All lines entered so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Ask the read loop to stop after the current command.
    pub fn request_exit(&mut self) {
        self.should_exit = true;
    }

    /// Whether `exit` has been requested.
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, PROMPT_VAR};
    use std::collections::HashMap;
    use std::io;
    use std::os::fd::AsRawFd;

    #[test]
    fn prompt_defaults_when_var_unset() {
        let session = Session::with_vars(HashMap::new());
        assert_eq!(session.prompt(), "shell> ");
    }

    #[test]
    fn prompt_resolved_from_variable() {
        let mut vars = HashMap::new();
        vars.insert(PROMPT_VAR.to_string(), "% ".to_string());
        let session = Session::with_vars(vars);
        assert_eq!(session.prompt(), "% ");
    }

    #[test]
    fn var_lookup_reads_only_the_snapshot() {
        let mut vars = HashMap::new();
        vars.insert("HOME".to_string(), "/somewhere".to_string());
        let session = Session::with_vars(vars);
        assert_eq!(session.var("HOME"), Some("/somewhere"));
        assert_eq!(session.var("NO_SUCH_VAR_HERE"), None);
    }

    #[test]
    fn history_is_append_only_in_order() {
        let mut session = Session::with_vars(HashMap::new());
        assert!(session.history().is_empty());
        session.push_history("ls");
        session.push_history("pwd");
        assert_eq!(session.history(), ["ls".to_string(), "pwd".to_string()]);
    }

    #[test]
    fn exit_request_is_sticky() {
        let mut session = Session::with_vars(HashMap::new());
        assert!(!session.should_exit());
        session.request_exit();
        assert!(session.should_exit());
    }

    #[test]
    fn detached_session_claims_nothing() {
        let session = Session::with_vars(HashMap::new());
        assert_eq!(session.terminal_fd(), io::stdin().as_raw_fd());
        assert_eq!(session.pgid(), nix::unistd::getpgrp());
        assert!(session.saved_terminal_modes().is_none());
    }
}

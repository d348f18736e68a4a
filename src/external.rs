use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::error::ShellError;
use crate::interpreter::Factory;
use crate::session::{Session, JOB_CONTROL_SIGNALS};
use anyhow::Result;
use nix::libc;
use nix::sys::signal::{signal, SigHandler};
use nix::sys::wait::waitpid;
use nix::unistd::{execvp, fork, ForkResult};
use std::ffi::CString;
use std::io::Write;

/// Command that is not a builtin: launched as a child process image.
///
/// The child replaces itself with the named executable, located through the
/// standard PATH search performed by `execvp`; the parent blocks until the
/// child terminates. The factory accepts any name — "no such program" is
/// diagnosed in the child when image replacement fails, not by a lookup in
/// the parent.
pub struct ExternalCommand {
    argv: Vec<CString>,
}

impl ExternalCommand {
    pub fn new(argv: Vec<CString>) -> Self {
        Self { argv }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        _session: &Session,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let argv: Vec<CString> = std::iter::once(name)
            .chain(args.iter().copied())
            .map(CString::new)
            .collect::<Result<_, _>>()
            .ok()?;
        Some(Box::new(ExternalCommand::new(argv)))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<ExitCode> {
        // SAFETY: the child calls only exec-or-_exit after the fork; no
        // allocation or locking happens on that path beyond the error
        // report, which mirrors what the parent would print.
        match unsafe { fork() }.map_err(ShellError::ProcessCreation)? {
            ForkResult::Child => {
                // Undo the interpreter's ignore-dispositions so the new
                // program behaves normally under terminal signals.
                for sig in JOB_CONTROL_SIGNALS {
                    // SAFETY: SigDfl installs no handler code.
                    let _ = unsafe { signal(sig, SigHandler::SigDfl) };
                }
                if let Err(e) = execvp(&self.argv[0], &self.argv) {
                    eprintln!("execvp: {}", e.desc());
                }
                // Image replacement failed; leave with a status distinct
                // from a normal program exit, without running the parent's
                // atexit machinery.
                unsafe { libc::_exit(libc::EXIT_FAILURE) }
            }
            ForkResult::Parent { child } => {
                // The child's exit status is deliberately discarded; this
                // shell does not propagate it anywhere.
                let _ = waitpid(child, None);
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn session() -> Session {
        Session::with_vars(HashMap::new())
    }

    fn launch(argv: &[&str], session: &mut Session) -> Result<ExitCode> {
        let factory = Factory::<ExternalCommand>::default();
        let cmd = factory
            .try_create(session, argv[0], &argv[1..])
            .expect("external factory accepts any name");
        cmd.execute(&mut Vec::new(), session)
    }

    #[test]
    fn factory_accepts_any_name() {
        let env = session();
        let factory = Factory::<ExternalCommand>::default();
        assert!(factory.try_create(&env, "true", &[]).is_some());
        assert!(factory.try_create(&env, "no-such-program", &[]).is_some());
    }

    #[test]
    fn factory_rejects_interior_nul() {
        let env = session();
        let factory = Factory::<ExternalCommand>::default();
        assert!(factory.try_create(&env, "tr\0ue", &[]).is_none());
    }

    #[test]
    fn launches_and_waits_for_a_real_program() {
        let mut env = session();
        assert_eq!(launch(&["true"], &mut env).unwrap(), 0);
    }

    #[test]
    fn child_exit_status_is_discarded() {
        let mut env = session();
        // `false` exits 1, but the launcher reports success to the loop.
        assert_eq!(launch(&["false"], &mut env).unwrap(), 0);
    }

    #[test]
    fn unknown_program_fails_in_the_child_only() {
        let mut env = session();
        let name = format!("no-such-program-{}", std::process::id());
        // The child exits non-zero after the failed exec; the parent keeps
        // going and can still launch commands afterwards.
        assert_eq!(launch(&[&name], &mut env).unwrap(), 0);
        assert_eq!(launch(&["true"], &mut env).unwrap(), 0);
    }
}

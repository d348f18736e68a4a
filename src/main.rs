use argh::FromArgs;
use minish::session::Session;
use minish::Interpreter;

#[derive(FromArgs)]
/// A small interactive shell.
struct Args {
    /// print the shell version and exit
    #[argh(switch, short = 'v')]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    if args.version {
        println!(
            "Shell Version: {}.{}",
            env!("CARGO_PKG_VERSION_MAJOR"),
            env!("CARGO_PKG_VERSION_MINOR")
        );
        return Ok(());
    }

    let session = Session::init()?;
    let mut sh = Interpreter::with_session(session);
    sh.repl()
}

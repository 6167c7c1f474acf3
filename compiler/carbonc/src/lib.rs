//! Carbon - the command-line interpreter.
//!
//! Ties the front end (`carbon_parse`) to the interpreter (`carbon_eval`):
//! host bindings first, then `--eval` sources, then files, then the
//! prompt if requested.

pub mod cli;
pub mod diagnostics;
pub mod host;
pub mod logging;
pub mod repl;
pub mod session;

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use carbon_eval::{stdout_handler, Interpreter};

pub use cli::Args;
pub use session::{RunError, Session};

/// Run everything `args` asks for.
///
/// The exit code reports failure when any unit failed and the prompt was
/// not entered.
pub fn run(args: &Args) -> ExitCode {
    let color = std::io::stderr().is_terminal();

    let mut builder = Interpreter::builder().print_handler(stdout_handler());
    if let Some(jobs) = args.jobs {
        builder = builder.concurrency(jobs);
    }
    let mut session = Session::new(builder.build());
    session.inject_host(&args.args, &host::process_environment());

    let mut ok = true;
    for (i, source) in args.eval.iter().enumerate() {
        ok &= run_unit(&mut session, &format!("<eval #{}>", i + 1), source, color);
    }
    for path in &args.files {
        ok &= run_file(&mut session, path, color);
    }

    if args.wants_prompt() {
        if let Err(err) = repl::run(&mut session, color) {
            eprintln!("error: prompt failed: {err}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_file(session: &mut Session, path: &Path, color: bool) -> bool {
    match std::fs::read_to_string(path) {
        Ok(source) => run_unit(session, &path.display().to_string(), &source, color),
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", path.display());
            false
        }
    }
}

fn run_unit(session: &mut Session, name: &str, source: &str, color: bool) -> bool {
    let _span = tracing::debug_span!("unit", name).entered();
    match session.run_unit(source) {
        Ok(_) => true,
        Err(err) => {
            eprint!("{}", diagnostics::render(name, source, &err, color));
            false
        }
    }
}

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    carbonc::logging::init_tracing();
    let args = carbonc::Args::parse();
    carbonc::run(&args)
}

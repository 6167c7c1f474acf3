//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Run Carbon scripts, or start an interactive prompt when given none.
#[derive(Parser, Debug, Default)]
#[command(name = "carbon", version, about)]
pub struct Args {
    /// Source files, run in order. Each file is its own unit: a runtime
    /// error stops that file only.
    pub files: Vec<PathBuf>,

    /// Start the prompt after running files and `--eval` sources.
    #[arg(short, long)]
    pub interactive: bool,

    /// Inline source, run before the files. May be repeated.
    #[arg(short = 'e', long = "eval", value_name = "SRC")]
    pub eval: Vec<String>,

    /// Worker threads for `parallel` (default: available parallelism).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Arguments for the script, bound to the global `arguments`.
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Args {
    /// The prompt runs when asked for or when there is nothing else to run.
    pub fn wants_prompt(&self) -> bool {
        self.interactive || (self.files.is_empty() && self.eval.is_empty())
    }
}

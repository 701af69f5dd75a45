mod compile;
mod completions;
mod context;

use clap::{Parser, Subcommand};
use compile::CompileCommand;
use completions::CompletionsCommand;
use context::ContextCommand;
use eyre::Result;

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for exportbridge_core::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "bridge")]
#[command(version)]
#[command(about = "Generate native export bindings from annotated sources")]
pub(crate) struct Cli {
    /// Emit debug logs on stderr (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Compile(cmd) => cmd.run(),
            Commands::Context(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate a package's export manifest, wrapper script and header
    Compile(CompileCommand),

    /// Prepare an ad hoc build of a single source file
    Context(ContextCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

use std::{io, path::PathBuf};

use clap::Args;
use exportbridge_core::{PackageConfig, Platform};
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops::{self, CompileOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CompileCommand {
    /// Package root containing src/ (defaults to current directory)
    #[arg(default_value = ".")]
    pub package_dir: PathBuf,

    /// Package name (overrides bridge.toml and the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Echo every scanned file and export
    #[arg(short, long)]
    pub verbose: bool,

    /// Path separator for generated target paths
    #[arg(long)]
    pub file_sep: Option<String>,
}

impl CompileCommand {
    pub fn run(&self) -> Result<()> {
        let config = PackageConfig::open(&self.package_dir).unwrap_or_exit();

        let mut platform = Platform::host();
        if let Some(sep) = &self.file_sep {
            platform.file_sep = sep.clone();
        }

        let opts = CompileOptions {
            package_dir: &self.package_dir,
            name: self.name.as_deref(),
            verbose: self.verbose,
            platform,
        };
        let report = ops::compile(&config, opts, io::stdout()).unwrap_or_exit();

        // The verbose echo already ends with the status line.
        if !self.verbose {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}

use std::path::PathBuf;

use clap::Args;
use exportbridge_build::{BuildEnv, BuildUnitCache, RandomIds};
use exportbridge_core::Platform;
use eyre::{Context, Result};

use super::UnwrapOrExit;
use crate::{
    ops::{self, ContextOptions},
    reports::{ContextReport, Report, TerminalOutput},
};

#[derive(Args)]
pub struct ContextCommand {
    /// Source file to build
    pub file: PathBuf,

    /// File containing the code the source was written from
    #[arg(long)]
    pub code_file: Option<PathBuf>,

    /// Directory for build directories (defaults to the system temp dir)
    #[arg(long)]
    pub build_root: Option<PathBuf>,

    /// Print the context as JSON
    #[arg(long)]
    pub json: bool,
}

impl ContextCommand {
    pub fn run(&self) -> Result<()> {
        let opts = ContextOptions {
            source_path: &self.file,
            code_file: self.code_file.as_deref(),
            build_root: self
                .build_root
                .clone()
                .unwrap_or_else(BuildEnv::default_build_root),
            platform: Platform::host(),
        };

        let mut cache = BuildUnitCache::new();
        let context = ops::context(&mut cache, &mut RandomIds::new(), opts).unwrap_or_exit();

        if self.json {
            let json =
                serde_json::to_string_pretty(&context).wrap_err("Failed to serialize context")?;
            println!("{}", json);
        } else {
            ContextReport { context }.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}

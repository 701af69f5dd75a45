//! Context operation - ad hoc build preparation for one source file.

use std::path::{Path, PathBuf};

use exportbridge_attrs::CommentScanner;
use exportbridge_build::{
    BuildContext, BuildEnv, BuildRequest, BuildUnitCache, ModuleIds, build_context,
};
use exportbridge_core::{Platform, Result, read_to_string};

/// Options for the context operation.
pub struct ContextOptions<'a> {
    pub source_path: &'a Path,
    /// File holding the code the source was written from; keys the cache by
    /// content when given.
    pub code_file: Option<&'a Path>,
    pub build_root: PathBuf,
    pub platform: Platform,
}

/// Execute the context operation against `cache`.
pub fn context(
    cache: &mut BuildUnitCache,
    ids: &mut dyn ModuleIds,
    opts: ContextOptions<'_>,
) -> Result<BuildContext> {
    let request = match opts.code_file {
        Some(code_file) => BuildRequest::from_code(opts.source_path, read_to_string(code_file)?),
        None => BuildRequest::from_path(opts.source_path),
    };

    let parser = CommentScanner::new();
    let mut env = BuildEnv::new(&opts.platform, opts.build_root, &parser, ids);
    build_context(cache, &request, &mut env)
}

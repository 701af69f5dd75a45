use std::path::PathBuf;

use exportbridge_attrs::AttributeParser;
use exportbridge_core::{Platform, Result};
use serde::Serialize;

use crate::{BuildUnit, BuildUnitCache, CacheKey, ModuleIds};

/// Collaborators a build unit needs to be created and regenerated.
pub struct BuildEnv<'a> {
    pub platform: &'a Platform,
    /// Directory under which each unit gets its own build directory.
    pub build_root: PathBuf,
    pub parser: &'a dyn AttributeParser,
    pub ids: &'a mut dyn ModuleIds,
}

impl<'a> BuildEnv<'a> {
    pub fn new(
        platform: &'a Platform,
        build_root: impl Into<PathBuf>,
        parser: &'a dyn AttributeParser,
        ids: &'a mut dyn ModuleIds,
    ) -> Self {
        Self {
            platform,
            build_root: build_root.into(),
            parser,
            ids,
        }
    }

    /// The system temporary directory.
    pub fn default_build_root() -> PathBuf {
        std::env::temp_dir()
    }
}

/// A request to build one source file ad hoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub source_path: PathBuf,
    /// Source text the file was written from. When present and non-empty the
    /// unit is cached by this text instead of by path.
    pub code: Option<String>,
}

impl BuildRequest {
    pub fn from_path(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            code: None,
        }
    }

    pub fn from_code(source_path: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            code: Some(code.into()),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => CacheKey::Content(code.to_string()),
            _ => CacheKey::Path(self.source_path.clone()),
        }
    }
}

/// Everything a caller needs to compile and load a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildContext {
    pub module_name: String,
    pub source_path: PathBuf,
    pub build_required: bool,
    pub build_directory: PathBuf,
    pub generated_code: String,
    pub exported_function_names: Vec<String>,
    pub generated_source_filename: String,
    pub artifact_filename: String,
    pub artifact_path: PathBuf,
    pub dependency_names: Vec<String>,
}

impl BuildContext {
    fn of(unit: &BuildUnit, build_required: bool) -> Self {
        Self {
            module_name: unit.module_name().to_string(),
            source_path: unit.source_path().to_path_buf(),
            build_required,
            build_directory: unit.build_directory().to_path_buf(),
            generated_code: unit.generated_code().to_string(),
            exported_function_names: unit.exported_function_names().to_vec(),
            generated_source_filename: unit.source_filename().to_string(),
            artifact_filename: unit.artifact_filename(),
            artifact_path: unit.artifact_path(),
            dependency_names: unit.dependency_names().to_vec(),
        }
    }
}

/// Find or create the build unit for `request` and report whether it needs
/// compiling.
///
/// A cached unit whose source changed is regenerated first. A fresh unit
/// always requires a build.
pub fn build_context(
    cache: &mut BuildUnitCache,
    request: &BuildRequest,
    env: &mut BuildEnv<'_>,
) -> Result<BuildContext> {
    let key = request.cache_key();

    if let Some(unit) = cache.lookup(&key) {
        let build_required = if unit.is_source_dirty()? {
            unit.regenerate_source(env.parser)?;
            true
        } else {
            !unit.is_built()?
        };
        return Ok(BuildContext::of(unit, build_required));
    }

    let unit = BuildUnit::create(&request.source_path, env)?;
    let unit = cache.insert(key, unit);
    Ok(BuildContext::of(unit, true))
}

#[cfg(test)]
mod tests {
    use exportbridge_attrs::StaticParser;

    use super::*;

    #[test]
    fn test_cache_key_prefers_code() {
        assert_eq!(
            BuildRequest::from_code("a.cpp", "int f();").cache_key(),
            CacheKey::Content("int f();".to_string())
        );
        assert_eq!(
            BuildRequest::from_code("a.cpp", "").cache_key(),
            CacheKey::Path(PathBuf::from("a.cpp"))
        );
        assert_eq!(
            BuildRequest::from_path("a.cpp").cache_key(),
            CacheKey::Path(PathBuf::from("a.cpp"))
        );
    }

    #[test]
    fn test_missing_source_is_not_cached() {
        let temp = tempfile::TempDir::new().unwrap();
        let platform = Platform::new("/", ".so");
        let parser = StaticParser::new();
        let mut ids = crate::SequentialIds::new("m");
        let mut env = BuildEnv::new(&platform, temp.path(), &parser, &mut ids);
        let mut cache = BuildUnitCache::new();

        let request = BuildRequest::from_path(temp.path().join("missing.cpp"));
        assert!(build_context(&mut cache, &request, &mut env).is_err());
        assert!(cache.is_empty());
    }
}
